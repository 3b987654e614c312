//! Unified path management for MarketPulse files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/marketpulse/       # Config directory (dirs::config_dir)
//! ├── config.toml              # Client configuration
//! └── preferences.toml         # Preference store (theme, session fields)
//! ```

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR_NAME: &str = "marketpulse";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// No per-user configuration directory on this platform.
    #[error("Cannot find the user configuration directory")]
    ConfigDirNotFound,
}

impl From<PathError> for marketpulse_core::PulseError {
    fn from(err: PathError) -> Self {
        Self::config(err.to_string())
    }
}

/// Resolves well-known file locations.
pub struct PulsePaths;

impl PulsePaths {
    /// Returns the MarketPulse configuration directory.
    ///
    /// - Linux: `~/.config/marketpulse/`
    /// - macOS: `~/Library/Application Support/marketpulse/`
    /// - Windows: `%APPDATA%\marketpulse\`
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Default location of the preference store.
    pub fn preferences_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("preferences.toml"))
    }
}
