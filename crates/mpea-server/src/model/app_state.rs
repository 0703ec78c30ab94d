//! Application state shared by every handler

use std::sync::Arc;

use mpea_persistence::PersistenceService;

use super::config::Configuration;
use crate::middleware::rate_limit::{
    AuthRateLimitConfig, AuthRateLimiter, ContactRateLimitConfig, ContactRateLimiter,
};

/// Values read once from the configuration at startup
#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub token_secret_key: String,
    pub token_expire_seconds: i64,
    pub locales: Vec<String>,
}

impl From<&Configuration> for ServerSettings {
    fn from(configuration: &Configuration) -> Self {
        Self {
            token_secret_key: configuration.token_secret_key(),
            token_expire_seconds: configuration.token_expire_seconds(),
            locales: configuration.i18n_locales(),
        }
    }
}

pub struct AppState {
    pub configuration: Configuration,
    pub settings: ServerSettings,
    /// SQL or in-memory backend, chosen by `mpea.persistence.mode`
    pub persistence: Arc<dyn PersistenceService>,
    pub contact_limiter: ContactRateLimiter,
    pub login_limiter: AuthRateLimiter,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("settings", &self.settings)
            .field("storage_mode", &self.persistence.storage_mode())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(configuration: Configuration, persistence: Arc<dyn PersistenceService>) -> Self {
        let contact_limiter = ContactRateLimiter::new(ContactRateLimitConfig {
            interval: configuration.contact_rate_limit_interval(),
            max_entries: configuration.contact_rate_limit_max_entries(),
        });
        let login_limiter = AuthRateLimiter::new(AuthRateLimitConfig {
            max_attempts: configuration.auth_max_attempts(),
            ..Default::default()
        });

        Self {
            settings: ServerSettings::from(&configuration),
            configuration,
            persistence,
            contact_limiter,
            login_limiter,
        }
    }

    pub fn persistence(&self) -> &dyn PersistenceService {
        self.persistence.as_ref()
    }

    pub fn token_secret_key(&self) -> &str {
        &self.settings.token_secret_key
    }

    pub fn locales(&self) -> &[String] {
        &self.settings.locales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpea_persistence::{MemoryPersistService, StorageMode};

    #[test]
    fn test_app_state_from_configuration() {
        let configuration = Configuration::with_overrides(&[
            ("mpea.i18n.locales", "en"),
            ("mpea.auth.jwt.secret", "k"),
        ])
        .unwrap();
        let state = AppState::new(configuration, Arc::new(MemoryPersistService::new()));

        assert_eq!(state.locales(), ["en".to_string()]);
        assert_eq!(state.token_secret_key(), "k");
        assert_eq!(state.persistence().storage_mode(), StorageMode::Memory);
        assert!(state.contact_limiter.is_empty());
    }
}
