//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` and applies environment
//! overrides on top.

use marketpulse_core::config::ClientConfig;
use marketpulse_core::error::{PulseError, Result};
use std::path::{Path, PathBuf};

use crate::paths::PulsePaths;
use crate::storage::AtomicTomlFile;

/// Overrides `auth_base_url`.
pub const ENV_AUTH_URL: &str = "MARKETPULSE_AUTH_URL";
/// Overrides `preferences_file`.
pub const ENV_PREFERENCES: &str = "MARKETPULSE_PREFERENCES";

/// Resolves the effective client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `~/.config/marketpulse/config.toml`.
    pub fn new_default() -> Result<Self> {
        Ok(Self {
            path: PulsePaths::config_file()?,
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file (defaults when missing) and applies process
    /// environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load) with an injectable environment lookup.
    pub fn load_with_env<F>(&self, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = AtomicTomlFile::<ClientConfig>::new(self.path.clone());
        let mut config = file
            .load()
            .map_err(|e| PulseError::config(e.to_string()))?
            .unwrap_or_default();

        if let Some(url) = env(ENV_AUTH_URL).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Auth URL overridden by {}", ENV_AUTH_URL);
            config.auth_base_url = url;
        }
        if let Some(path) = env(ENV_PREFERENCES).filter(|v| !v.trim().is_empty()) {
            config.preferences_file = Some(PathBuf::from(path));
        }

        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &ClientConfig) -> Result<()> {
    let url = config.auth_base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(PulseError::config(format!(
            "auth_base_url must be an http(s) URL, got '{}'",
            config.auth_base_url
        )));
    }
    Ok(())
}

/// Preference file to use: the configured override, else the default path.
pub fn resolve_preferences_file(config: &ClientConfig) -> Result<PathBuf> {
    match &config.preferences_file {
        Some(path) => Ok(path.clone()),
        None => Ok(PulsePaths::preferences_file()?),
    }
}
