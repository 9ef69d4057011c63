//! Durable key-value storage
//!
//! The token store and the session cache persist small string values under
//! fixed keys. [`KeyValueStore`] is the seam; [`FileStore`] writes one file
//! per key and the platform keychain (`security::KeychainProvider`) stores
//! each key as a credential.

mod error;
mod file;

use async_trait::async_trait;
pub use error::{StorageError, StorageResult};
pub use file::FileStore;

/// Async string storage addressed by key
///
/// Implementations must treat a missing key as `Ok(None)` on read and as a
/// no-op on removal.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key` (idempotent)
    async fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Checks that a key is safe to use as a file name or credential account
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_keys() {
        assert!(validate_key("auth_tokens").is_ok());
        assert!(validate_key("current-user.v1").is_ok());
    }

    #[test]
    fn rejects_path_like_keys() {
        for key in ["", "../secrets", "a/b", ".hidden", "with space"] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }
}
