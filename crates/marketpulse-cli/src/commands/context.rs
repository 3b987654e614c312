//! Composition root: builds the controllers a command runs against.

use anyhow::{Context, Result};
use marketpulse_application::{SessionController, ThemeController};
use marketpulse_core::config::ClientConfig;
use marketpulse_core::preference::PreferenceStore;
use marketpulse_infrastructure::config_service::{ENV_AUTH_URL, resolve_preferences_file};
use marketpulse_infrastructure::{ConfigService, FilePreferenceStore, MemoryPreferenceStore};
use marketpulse_interaction::HttpAuthGateway;
use std::sync::Arc;

use crate::GlobalOptions;

pub struct AppContext {
    pub config: ClientConfig,
    pub theme: ThemeController,
    pub session: SessionController,
}

impl AppContext {
    pub fn bootstrap(options: &GlobalOptions) -> Result<Self> {
        Self::bootstrap_with_env(options, |name| std::env::var(name).ok())
    }

    /// Precedence for the auth URL is flag, then environment, then file.
    pub fn bootstrap_with_env<F>(options: &GlobalOptions, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service = match &options.config {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new_default()?,
        };
        let config = service
            .load_with_env(|name| match (name, &options.auth_url) {
                (ENV_AUTH_URL, Some(url)) => Some(url.clone()),
                _ => env(name),
            })
            .with_context(|| format!("Failed to load configuration from {}", service.path().display()))?;

        let store: Arc<dyn PreferenceStore> = if options.ephemeral {
            tracing::debug!("Using in-memory preference store");
            Arc::new(MemoryPreferenceStore::new())
        } else {
            Arc::new(FilePreferenceStore::open(resolve_preferences_file(&config)?))
        };

        let gateway = Arc::new(HttpAuthGateway::from_config(&config)?);
        tracing::debug!(auth_url = gateway.base_url(), "Bootstrapped client");

        Ok(Self {
            theme: ThemeController::new(store.clone()),
            session: SessionController::new(gateway, store),
            config,
        })
    }

    pub fn shutdown(&self) {
        self.session.shutdown();
    }
}
