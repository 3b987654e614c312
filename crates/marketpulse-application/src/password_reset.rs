//! Forgot-password form state.
//!
//! The form collects an email and, once it validates, switches to a
//! confirmation view. Nothing is sent anywhere; the confirmation never says
//! whether the address belongs to an account.

use marketpulse_core::validation::{FieldError, validate_email};

/// Confirmation shown after a valid submission, whether or not an account
/// exists for the address.
pub const RESET_CONFIRMATION: &str =
    "If an account exists with that email, we've sent instructions to reset your password.";

/// Which view of the reset form is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResetState {
    /// The email field is editable.
    #[default]
    Editing,
    /// The confirmation is showing for the trimmed `email`.
    Submitted { email: String },
}

/// State machine behind the forgot-password form.
///
/// # Example
///
/// ```
/// use marketpulse_application::{PasswordResetFlow, ResetState};
///
/// let mut flow = PasswordResetFlow::new();
/// assert!(flow.submit("not-an-email").is_err());
/// assert_eq!(flow.state(), &ResetState::Editing);
///
/// flow.submit("ada@example.com").unwrap();
/// assert!(flow.confirmation_message().is_some());
/// ```
#[derive(Debug, Default)]
pub struct PasswordResetFlow {
    state: ResetState,
}

impl PasswordResetFlow {
    /// Starts on the editable form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view.
    pub fn state(&self) -> &ResetState {
        &self.state
    }

    /// Accepts `email` and shows the confirmation.
    ///
    /// Resubmitting while the confirmation is shown changes nothing.
    pub fn submit(&mut self, email: &str) -> Result<(), Vec<FieldError>> {
        if matches!(self.state, ResetState::Submitted { .. }) {
            return Ok(());
        }
        if let Some(error) = validate_email(email) {
            return Err(vec![error]);
        }

        let email = email.trim().to_string();
        tracing::info!(%email, "Password reset requested");
        self.state = ResetState::Submitted { email };
        Ok(())
    }

    /// Returns to the form so a different address can be entered.
    pub fn try_another_email(&mut self) {
        self.state = ResetState::Editing;
    }

    /// [`RESET_CONFIRMATION`] once submitted, `None` while editing.
    pub fn confirmation_message(&self) -> Option<&'static str> {
        match self.state {
            ResetState::Submitted { .. } => Some(RESET_CONFIRMATION),
            ResetState::Editing => None,
        }
    }
}
