//! ThemePreference domain model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The colour scheme selected by the user.
///
/// Exactly one value is active at a time. `Light` is the fallback whenever no
/// stored value exists or the stored value is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// String form written to the preference store.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Returns the opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Resolves a raw stored value, falling back to `Light`.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketpulse_core::theme::ThemePreference;
    ///
    /// assert_eq!(ThemePreference::from_stored(Some("dark")), ThemePreference::Dark);
    /// assert_eq!(ThemePreference::from_stored(Some("sepia")), ThemePreference::Light);
    /// assert_eq!(ThemePreference::from_stored(None), ThemePreference::Light);
    /// ```
    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    /// Label for the control that switches away from this theme.
    pub fn toggle_hint(&self) -> &'static str {
        match self {
            ThemePreference::Light => "Switch to Dark Mode",
            ThemePreference::Dark => "Switch to Light Mode",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ThemePreference::Dark)
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is neither `light` nor `dark`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme '{}' (expected 'light' or 'dark')", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for ThemePreference {
    type Err = UnknownTheme;

    // Exact match only: the store holds what `as_str` wrote.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}
