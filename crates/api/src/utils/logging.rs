use mentiq_infra::api::{ApiError, ApiErrorCategory};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Switches the subscriber to JSON output when set to `1` or `true`
pub const ENV_LOG_JSON: &str = "MENTIQ_LOG_JSON";

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Calling this
/// twice is harmless; the second call keeps the first subscriber.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = json_requested(std::env::var(ENV_LOG_JSON).ok().as_deref());

    let installed = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    if installed.is_ok() {
        info!(json_logs = json, "Tracing initialized");
    }
}

fn json_requested(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some(v) if v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Stable label for an API error, safe to use as a log field.
pub fn error_label(error: &ApiError) -> &'static str {
    match error.category() {
        ApiErrorCategory::Authentication => "authentication",
        ApiErrorCategory::RateLimit => "rate_limit",
        ApiErrorCategory::Server => "server",
        ApiErrorCategory::Client => "client",
        ApiErrorCategory::Network => "network",
        ApiErrorCategory::Config => "config",
        ApiErrorCategory::Storage => "storage",
    }
}

/// Log a failed API operation without leaking request payloads.
pub fn log_api_failure(operation: &str, error: &ApiError) {
    warn!(
        operation,
        category = error_label(error),
        status = ?error.status(),
        error = %error,
        "api_operation_failure"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_accepts_one_and_true() {
        assert!(json_requested(Some("1")));
        assert!(json_requested(Some(" TRUE ")));
        assert!(!json_requested(Some("0")));
        assert!(!json_requested(Some("yes")));
        assert!(!json_requested(None));
    }

    #[test]
    fn labels_follow_status_category() {
        let forbidden = ApiError::from_response(403, serde_json::Value::Null);
        let busy = ApiError::from_response(503, serde_json::Value::Null);
        let missing = ApiError::from_response(404, serde_json::Value::Null);

        assert_eq!(error_label(&forbidden), "authentication");
        assert_eq!(error_label(&busy), "server");
        assert_eq!(error_label(&missing), "client");
        assert_eq!(error_label(&ApiError::Config("bad".into())), "config");
    }
}
