//! Application context - dependency injection container

use std::path::PathBuf;
use std::sync::{Arc, Weak};

use mentiq_common::{FileStore, KeyValueStore, KeychainProvider, TokenStore};
use mentiq_domain::{Config, MentiqError, Result, StorageBackend};
use mentiq_infra::api::resources::LiveClassesApi;
use mentiq_infra::api::{ApiClient, ApiClientConfig, ApiResources, AuthFailureHandler};
use mentiq_infra::Session;
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};
use crate::utils::logging::log_api_failure;

/// Directory used by the file backend when none is configured
const DEFAULT_DATA_DIR: &str = ".mentiq";

/// Application context - holds the client, the session and the facades
pub struct AppContext {
    pub config: Config,
    pub storage: Arc<dyn KeyValueStore>,
    pub tokens: Arc<TokenStore>,
    pub client: ApiClient,
    pub api: ApiResources,
    pub session: Arc<Session>,
}

impl AppContext {
    /// Build the context with the storage backend named in `config`
    ///
    /// # Errors
    /// Returns `MentiqError::Config` if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let storage = storage_backend(&config);
        Self::with_storage(config, storage)
    }

    /// Build the context over an explicit storage backend
    ///
    /// # Errors
    /// Returns `MentiqError::Config` if the HTTP client cannot be built.
    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let tokens = Arc::new(TokenStore::new(storage.clone()));

        // The handler is created before the session it resets
        let session_slot: Arc<OnceCell<Weak<Session>>> = Arc::new(OnceCell::new());
        let handler = session_reset_handler(session_slot.clone());

        let client = ApiClient::builder()
            .config(ApiClientConfig::from(&config.api))
            .tokens(tokens.clone())
            .on_auth_failure(handler)
            .build()
            .map_err(|err| MentiqError::Config(err.to_string()))?;

        let mut api = ApiResources::new(&client);
        api.live_classes =
            LiveClassesApi::new(client.clone()).with_conference_domain(&config.conference.domain);

        let session = Arc::new(Session::new(
            api.auth.clone(),
            api.media.clone(),
            tokens.clone(),
            storage.clone(),
        ));
        if session_slot.set(Arc::downgrade(&session)).is_err() {
            warn!("auth-failure handler was already bound to a session");
        }

        info!(
            base_url = %client.config().base_url,
            storage = %config.storage.backend,
            "Application context initialized"
        );

        Ok(Self { config, storage, tokens, client, api, session })
    }

    /// Check the backend and the local session
    pub async fn health_check(&self) -> HealthStatus {
        let backend = match self.api.health.is_healthy().await {
            Ok(true) => ComponentHealth::healthy("backend"),
            Ok(false) => ComponentHealth::unhealthy("backend", "backend reported an error status"),
            Err(err) => {
                log_api_failure("health_check", &err);
                ComponentHealth::unhealthy("backend", err.to_string())
            }
        };

        let credentials = if self.tokens.get().await.is_some() {
            ComponentHealth::healthy("credentials")
        } else {
            ComponentHealth::unhealthy("credentials", "no stored tokens")
        };

        let session = if self.session.is_logged_in() {
            ComponentHealth::healthy("session")
        } else {
            ComponentHealth::unhealthy("session", "not signed in")
        };

        HealthStatus::from_components(vec![backend, credentials, session])
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("client", &self.client)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn storage_backend(config: &Config) -> Arc<dyn KeyValueStore> {
    match config.storage.backend {
        StorageBackend::Keychain => {
            Arc::new(KeychainProvider::new(config.storage.service_name.clone()))
        }
        StorageBackend::File => {
            let root =
                config.storage.data_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
            Arc::new(FileStore::new(root))
        }
    }
}

/// Handler that resets whichever session is bound to `slot`
fn session_reset_handler(slot: Arc<OnceCell<Weak<Session>>>) -> Arc<dyn AuthFailureHandler> {
    Arc::new(move || match slot.get().and_then(Weak::upgrade) {
        Some(session) => session.reset(),
        None => warn!("authentication failed before a session was bound"),
    })
}

#[cfg(test)]
mod tests {
    use mentiq_common::testing::MemoryStore;
    use mentiq_common::TokenPair;

    use super::*;

    #[tokio::test]
    async fn file_backend_uses_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.backend = StorageBackend::File;
        config.storage.data_dir = Some(dir.path().to_path_buf());

        let context = AppContext::new(config).unwrap();
        context.tokens.set(TokenPair::new("a", "r")).await.unwrap();

        assert!(dir.path().join("auth_tokens.json").exists());
    }

    #[tokio::test]
    async fn conference_domain_comes_from_config() {
        let mut config = Config::default();
        config.conference.domain = "meet.school.example".into();

        let context = AppContext::with_storage(config, Arc::new(MemoryStore::new())).unwrap();
        let class = mentiq_domain::LiveClass::from_payload(&serde_json::json!({ "id": 3 }));

        assert_eq!(
            context.api.live_classes.conference_url(&class),
            "https://meet.school.example/mentiq_live_class_3"
        );
    }
}
