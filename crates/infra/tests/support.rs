//! Shared harness for the API integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mentiq_common::testing::MemoryStore;
use mentiq_common::{TokenPair, TokenStore, AUTH_TOKENS_KEY};
use mentiq_infra::api::{ApiClient, ApiClientConfig, AuthFailureHandler};
use wiremock::MockServer;

/// Mock backend plus a client wired to it
pub struct Harness {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenStore>,
    pub auth_failures: Arc<AtomicUsize>,
    pub client: ApiClient,
}

impl Harness {
    /// Harness with an empty token store
    pub async fn new() -> Self {
        init_tracing();

        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenStore::new(store.clone()));

        let auth_failures = Arc::new(AtomicUsize::new(0));
        let counter = auth_failures.clone();
        let handler: Arc<dyn AuthFailureHandler> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let config = ApiClientConfig { base_url: server.uri(), ..ApiClientConfig::default() };
        let client = ApiClient::builder()
            .config(config)
            .tokens(tokens.clone())
            .on_auth_failure(handler)
            .build()
            .expect("client should build");

        Self { server, store, tokens, auth_failures, client }
    }

    /// Harness with `{access, refresh}` already stored
    pub async fn with_tokens(access: &str, refresh: &str) -> Self {
        let harness = Self::new().await;
        harness
            .tokens
            .set(TokenPair::new(access, refresh))
            .await
            .expect("tokens should be stored");
        harness
    }

    pub fn auth_failure_count(&self) -> usize {
        self.auth_failures.load(Ordering::SeqCst)
    }

    /// Token pair as persisted in durable storage
    pub fn stored_tokens(&self) -> Option<TokenPair> {
        self.store
            .value(AUTH_TOKENS_KEY)
            .map(|raw| serde_json::from_str(&raw).expect("stored tokens should be valid JSON"))
    }

    /// Number of requests the server saw on `path`
    pub async fn hits(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == path)
            .count()
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
