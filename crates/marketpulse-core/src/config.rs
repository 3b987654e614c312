//! Client configuration.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a missing or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the authentication service when nothing is configured.
pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8000";

/// Root configuration structure for config.toml
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the authentication service, without the `/auth` suffix.
    pub auth_base_url: String,

    /// Transport timeout for gateway requests. Unset means the HTTP client's
    /// own default applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Overrides the location of the preference store file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            request_timeout_secs: None,
            preferences_file: None,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Base URL with any trailing slashes removed.
    pub fn normalized_base_url(&self) -> &str {
        self.auth_base_url.trim_end_matches('/')
    }
}
