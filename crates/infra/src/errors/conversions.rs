//! Conversions from transport errors into domain errors.

use mentiq_domain::MentiqError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MentiqError);

impl From<InfraError> for MentiqError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MentiqError> for InfraError {
    fn from(value: MentiqError) -> Self {
        Self(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MentiqError */
/* -------------------------------------------------------------------------- */

// Status errors never reach this point: responses are inspected by the
// dispatcher, which does not call `error_for_status`.
impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let mapped = if value.is_timeout() {
            MentiqError::Timeout("HTTP request timed out".into())
        } else if value.is_connect() {
            MentiqError::Network(format!("HTTP connection failure: {value}"))
        } else if value.is_builder() {
            MentiqError::InvalidInput(format!("invalid HTTP request: {value}"))
        } else {
            MentiqError::Network(value.to_string())
        };
        Self(mapped)
    }
}
