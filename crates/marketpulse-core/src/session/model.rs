//! SessionState domain model.

use serde::Serialize;

/// Snapshot of the client's authentication status and basic profile.
///
/// Fields are private so the invariant holds by construction: an
/// authenticated session always carries a non-empty name and email. The only
/// ways to obtain a value are [`SessionState::anonymous`] and
/// [`SessionState::authenticated`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    is_authenticated: bool,
    name: String,
    email: String,
    date_of_birth: Option<String>,
}

impl SessionState {
    /// The empty, unauthenticated session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builds an authenticated session.
    ///
    /// Returns `None` if `name` or `email` is blank after trimming. An empty
    /// date of birth is normalized to `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketpulse_core::session::SessionState;
    ///
    /// let session = SessionState::authenticated("Ada", "ada@example.com", Some("")).unwrap();
    /// assert!(session.is_authenticated());
    /// assert_eq!(session.date_of_birth(), None);
    ///
    /// assert!(SessionState::authenticated("", "ada@example.com", None).is_none());
    /// ```
    pub fn authenticated(
        name: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: Option<&str>,
    ) -> Option<Self> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();
        if name.is_empty() || email.is_empty() {
            return None;
        }

        let date_of_birth = date_of_birth
            .map(str::trim)
            .filter(|dob| !dob.is_empty())
            .map(str::to_string);

        Some(Self {
            is_authenticated: true,
            name,
            email,
            date_of_birth,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn date_of_birth(&self) -> Option<&str> {
        self.date_of_birth.as_deref()
    }

    /// Value persisted under the date-of-birth key (empty when unknown).
    pub fn stored_date_of_birth(&self) -> &str {
        self.date_of_birth.as_deref().unwrap_or("")
    }
}
