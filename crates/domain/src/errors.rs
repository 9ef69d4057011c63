//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Mentiq
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MentiqError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Mentiq operations
pub type Result<T> = std::result::Result<T, MentiqError>;

impl MentiqError {
    /// Whether the operation may succeed if attempted again
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let value = serde_json::to_value(MentiqError::Auth("expired".into())).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "Auth", "message": "expired" }));
    }

    #[test]
    fn transient_errors() {
        assert!(MentiqError::Timeout("read".into()).is_transient());
        assert!(MentiqError::Network("reset".into()).is_transient());
        assert!(!MentiqError::InvalidInput("bad".into()).is_transient());
    }
}
