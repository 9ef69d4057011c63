//! Token store with an in-memory cache
//!
//! - Reads hit the cache first and fall back to durable storage
//! - Writes go to durable storage first, then the cache
//! - Unreadable or malformed stored data reads as "no tokens"
//! - A cleared store stays empty even if the durable entry could not be
//!   removed, until the next successful `set`

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::storage::{KeyValueStore, StorageResult};

/// Durable storage key for the serialized token pair
pub const AUTH_TOKENS_KEY: &str = "auth_tokens";

/// Access/refresh token pair issued by the backend
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self { access: access.into(), refresh: refresh.into() }
    }

    /// Same refresh token, new access token
    #[must_use]
    pub fn with_access(&self, access: impl Into<String>) -> Self {
        Self { access: access.into(), refresh: self.refresh.clone() }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// What the cache knows about the durable entry
#[derive(Debug, Clone, Default)]
enum Cached {
    /// Not loaded yet; consult durable storage
    #[default]
    Unknown,
    /// Cleared in this process; durable storage is not consulted
    Cleared,
    Present(TokenPair),
}

/// Cached, durable token pair
///
/// All writers take the cache write lock for the whole durable write, so
/// a successful call leaves the cache and the stored entry in agreement.
pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    cache: RwLock<Cached>,
}

impl TokenStore {
    /// Store backed by `backend` under [`AUTH_TOKENS_KEY`]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, AUTH_TOKENS_KEY)
    }

    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { backend, key: key.into(), cache: RwLock::new(Cached::Unknown) }
    }

    /// Current token pair, if any
    pub async fn get(&self) -> Option<TokenPair> {
        match &*self.cache.read().await {
            Cached::Present(pair) => return Some(pair.clone()),
            Cached::Cleared => return None,
            Cached::Unknown => {}
        }

        let mut cache = self.cache.write().await;
        // Another task may have loaded or cleared it while we waited for the lock
        match &*cache {
            Cached::Present(pair) => return Some(pair.clone()),
            Cached::Cleared => return None,
            Cached::Unknown => {}
        }

        let raw = match self.backend.get_item(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "Failed to read stored tokens");
                return None;
            }
        };

        match serde_json::from_str::<TokenPair>(&raw) {
            Ok(pair) => {
                debug!(key = %self.key, "Loaded tokens from storage");
                *cache = Cached::Present(pair.clone());
                Some(pair)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Ignoring malformed stored tokens");
                None
            }
        }
    }

    /// Current access token, if any
    pub async fn access_token(&self) -> Option<String> {
        self.get().await.map(|pair| pair.access)
    }

    /// Current refresh token, if any
    pub async fn refresh_token(&self) -> Option<String> {
        self.get().await.map(|pair| pair.refresh)
    }

    /// Persist `pair` and make it visible to subsequent reads
    ///
    /// # Errors
    /// Returns the storage error; the cache is left untouched in that case.
    pub async fn set(&self, pair: TokenPair) -> StorageResult<()> {
        let serialized = serde_json::to_string(&pair)?;

        let mut cache = self.cache.write().await;
        self.backend.set_item(&self.key, &serialized).await?;
        *cache = Cached::Present(pair);

        info!("Tokens stored successfully");
        Ok(())
    }

    /// Forget the token pair
    ///
    /// The pair is gone for this store even when removing the durable entry
    /// fails; the error is returned so callers can log it.
    pub async fn clear(&self) -> StorageResult<()> {
        let mut cache = self.cache.write().await;
        *cache = Cached::Cleared;
        self.backend.remove_item(&self.key).await?;

        info!("Tokens cleared");
        Ok(())
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore").field("key", &self.key).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    fn store_with(backend: &Arc<MemoryStore>) -> TokenStore {
        TokenStore::new(backend.clone())
    }

    #[tokio::test]
    async fn empty_storage_reads_as_none() {
        let backend = Arc::new(MemoryStore::new());
        assert_eq!(store_with(&backend).get().await, None);
    }

    #[tokio::test]
    async fn cache_hit_skips_storage() {
        let backend = Arc::new(MemoryStore::new());
        backend.insert(AUTH_TOKENS_KEY, r#"{"access":"a1","refresh":"r1"}"#);
        let store = store_with(&backend);

        assert_eq!(store.get().await, Some(TokenPair::new("a1", "r1")));
        assert_eq!(store.get().await, Some(TokenPair::new("a1", "r1")));
        assert_eq!(backend.read_count(), 1);
    }

    #[tokio::test]
    async fn set_is_visible_and_persisted() {
        let backend = Arc::new(MemoryStore::new());
        let store = store_with(&backend);

        store.set(TokenPair::new("a2", "r2")).await.unwrap();
        assert_eq!(store.access_token().await.as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().await.as_deref(), Some("r2"));
        assert_eq!(backend.read_count(), 0);

        let stored: TokenPair =
            serde_json::from_str(&backend.value(AUTH_TOKENS_KEY).unwrap()).unwrap();
        assert_eq!(stored, TokenPair::new("a2", "r2"));

        // A fresh store over the same storage sees the pair too
        assert_eq!(store_with(&backend).get().await, Some(TokenPair::new("a2", "r2")));
    }

    #[tokio::test]
    async fn clear_removes_cache_and_storage() {
        let backend = Arc::new(MemoryStore::new());
        let store = store_with(&backend);
        store.set(TokenPair::new("a", "r")).await.unwrap();

        store.clear().await.unwrap();
        assert_eq!(store.get().await, None);
        assert_eq!(backend.value(AUTH_TOKENS_KEY), None);
    }

    #[tokio::test]
    async fn failed_removal_does_not_resurrect_tokens() {
        let backend = Arc::new(MemoryStore::new());
        let store = store_with(&backend);
        store.set(TokenPair::new("a", "r")).await.unwrap();

        backend.fail_writes(true);
        assert!(store.clear().await.is_err());
        assert!(backend.value(AUTH_TOKENS_KEY).is_some());
        assert_eq!(store.get().await, None);
        assert_eq!(store.refresh_token().await, None);

        backend.fail_writes(false);
        store.set(TokenPair::new("b", "r2")).await.unwrap();
        assert_eq!(store.access_token().await.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn malformed_storage_reads_as_none() {
        let backend = Arc::new(MemoryStore::new());
        backend.insert(AUTH_TOKENS_KEY, "not json");
        assert_eq!(store_with(&backend).get().await, None);

        backend.insert(AUTH_TOKENS_KEY, r#"{"access":"only"}"#);
        assert_eq!(store_with(&backend).get().await, None);
    }

    #[tokio::test]
    async fn read_failure_reads_as_none() {
        let backend = Arc::new(MemoryStore::new());
        backend.insert(AUTH_TOKENS_KEY, r#"{"access":"a","refresh":"r"}"#);
        backend.fail_reads(true);
        assert_eq!(store_with(&backend).get().await, None);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_pair() {
        let backend = Arc::new(MemoryStore::new());
        let store = store_with(&backend);
        store.set(TokenPair::new("old", "r")).await.unwrap();

        backend.fail_writes(true);
        assert!(store.set(TokenPair::new("new", "r")).await.is_err());
        assert_eq!(store.access_token().await.as_deref(), Some("old"));
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let rendered = format!("{:?}", TokenPair::new("secret-access", "secret-refresh"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn with_access_keeps_refresh() {
        let pair = TokenPair::new("a", "r").with_access("b");
        assert_eq!(pair, TokenPair::new("b", "r"));
    }
}
