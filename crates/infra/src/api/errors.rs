//! API-specific error types
//!
//! Every non-2xx response becomes [`ApiError::Http`] carrying the status,
//! a human-readable message and the parsed payload. Transport failures keep
//! their own variants so callers can tell "the server said no" apart from
//! "the server was never reached".

use mentiq_common::StorageError;
use mentiq_domain::utils::payload::field;
use mentiq_domain::MentiqError;
use serde_json::Value;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401 / 403
    Authentication,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx and undecodable responses
    Client,
    /// Connection failures and timeouts
    Network,
    /// Misconfiguration of the client itself
    Config,
    /// Local token or session storage
    Storage,
}

/// API operation errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String, payload: Value },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid response body: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ApiError {
    /// Build the error for a non-2xx response.
    pub fn from_response(status: u16, payload: Value) -> Self {
        let message = error_message(status, &payload);
        Self::Http { status, message, payload }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Http { status, .. } => match status {
                401 | 403 => ApiErrorCategory::Authentication,
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Client,
            },
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Serialization(_) => ApiErrorCategory::Client,
            Self::Storage(_) | Self::Io(_) => ApiErrorCategory::Storage,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// HTTP status of the failed response, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed response payload, `Value::Null` for transport errors.
    pub fn payload(&self) -> &Value {
        static NULL: Value = Value::Null;
        match self {
            Self::Http { payload, .. } => payload,
            _ => &NULL,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the same request may succeed if sent again later
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }
}

/// Pick the message for a failed response.
///
/// Priority: `error.message`, `detail`, `message`, the JSON dump of an
/// object or array payload, then a generic status message.
pub fn error_message(status: u16, payload: &Value) -> String {
    if let Some(found) = field(payload, &["error.message", "detail", "message"]) {
        return match found {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
    }

    match payload {
        Value::Object(_) | Value::Array(_) => payload.to_string(),
        _ => format!("Request failed with status {status}"),
    }
}

impl From<MentiqError> for ApiError {
    fn from(err: MentiqError) -> Self {
        match err {
            MentiqError::Network(message) => Self::Network(message),
            MentiqError::NotFound(message) => {
                Self::Http { status: 404, message, payload: Value::Null }
            }
            MentiqError::Timeout(message) => Self::Timeout(message),
            MentiqError::Storage(message) => Self::Storage(message),
            MentiqError::Config(message)
            | MentiqError::InvalidInput(message)
            | MentiqError::Internal(message) => Self::Config(message),
            MentiqError::Auth(message) => {
                Self::Http { status: 401, message, payload: Value::Null }
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ApiError> for MentiqError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { status, message, .. } => match status {
                401 | 403 => MentiqError::Auth(message),
                404 => MentiqError::NotFound(message),
                400..=499 => MentiqError::InvalidInput(message),
                _ => MentiqError::Network(message),
            },
            ApiError::Network(message) => MentiqError::Network(message),
            ApiError::Timeout(message) => MentiqError::Timeout(message),
            ApiError::Serialization(message) => MentiqError::Internal(message),
            ApiError::Storage(message) | ApiError::Io(message) => MentiqError::Storage(message),
            ApiError::Config(message) => MentiqError::Config(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_prefers_nested_error_message() {
        let payload = json!({
            "error": { "message": "Quiz is closed" },
            "detail": "ignored",
            "message": "ignored too"
        });
        assert_eq!(error_message(400, &payload), "Quiz is closed");
    }

    #[test]
    fn message_falls_back_through_detail_and_message() {
        assert_eq!(error_message(403, &json!({ "detail": "Forbidden" })), "Forbidden");
        assert_eq!(error_message(409, &json!({ "message": "Already enrolled" })), "Already enrolled");
    }

    #[test]
    fn message_dumps_unrecognized_objects() {
        let payload = json!({ "email": ["This field is required."] });
        assert_eq!(error_message(400, &payload), r#"{"email":["This field is required."]}"#);
    }

    #[test]
    fn message_is_generic_without_payload() {
        assert_eq!(error_message(502, &Value::Null), "Request failed with status 502");
        assert_eq!(error_message(500, &json!("oops")), "Request failed with status 500");
    }

    #[test]
    fn http_errors_are_categorized_by_status() {
        let cases = [
            (401, ApiErrorCategory::Authentication),
            (403, ApiErrorCategory::Authentication),
            (429, ApiErrorCategory::RateLimit),
            (503, ApiErrorCategory::Server),
            (404, ApiErrorCategory::Client),
        ];
        for (status, expected) in cases {
            assert_eq!(ApiError::from_response(status, Value::Null).category(), expected);
        }
    }

    #[test]
    fn test_should_retry() {
        assert!(ApiError::from_response(503, Value::Null).should_retry());
        assert!(ApiError::Network("reset".into()).should_retry());
        assert!(ApiError::Timeout("30s".into()).should_retry());
        assert!(!ApiError::from_response(400, Value::Null).should_retry());
        assert!(!ApiError::from_response(401, Value::Null).should_retry());
        assert!(!ApiError::Config("bad url".into()).should_retry());
    }

    #[test]
    fn http_error_keeps_status_and_payload() {
        let err = ApiError::from_response(401, json!({ "detail": "Token expired" }));
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.payload()["detail"], "Token expired");
        assert_eq!(err.to_string(), "Token expired");
    }

    #[test]
    fn converts_into_domain_error() {
        let err: MentiqError = ApiError::from_response(404, Value::Null).into();
        assert!(matches!(err, MentiqError::NotFound(_)));

        let err: MentiqError = ApiError::Timeout("slow".into()).into();
        assert!(matches!(err, MentiqError::Timeout(_)));
    }
}
