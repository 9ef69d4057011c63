//! Configuration loader
//!
//! Loads client configuration from a file and environment overrides.
//!
//! ## Loading Strategy
//! 1. Probe the standard locations for a config file (JSON or TOML)
//! 2. Fall back to built-in defaults when none is found
//! 3. Apply `MENTIQ_*` environment overrides on top
//!
//! ## Environment Variables
//! - `MENTIQ_ENV`: `development` or `production`, selects the default base URL
//! - `MENTIQ_API_BASE_URL`: explicit backend base URL
//! - `MENTIQ_API_TIMEOUT_SECS`: request timeout in seconds
//! - `MENTIQ_USER_AGENT`: user agent sent with every request
//! - `MENTIQ_STORAGE_BACKEND`: `keychain` or `file`
//! - `MENTIQ_DATA_DIR`: directory for the file storage backend
//! - `MENTIQ_KEYCHAIN_SERVICE`: keychain service name
//! - `MENTIQ_CONFERENCE_DOMAIN`: live-class conference host
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./mentiq.json` or `./mentiq.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use mentiq_domain::{Config, Environment, MentiqError, Result, StorageBackend};

pub const ENV_ENVIRONMENT: &str = "MENTIQ_ENV";
pub const ENV_BASE_URL: &str = "MENTIQ_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MENTIQ_API_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "MENTIQ_USER_AGENT";
pub const ENV_STORAGE_BACKEND: &str = "MENTIQ_STORAGE_BACKEND";
pub const ENV_DATA_DIR: &str = "MENTIQ_DATA_DIR";
pub const ENV_KEYCHAIN_SERVICE: &str = "MENTIQ_KEYCHAIN_SERVICE";
pub const ENV_CONFERENCE_DOMAIN: &str = "MENTIQ_CONFERENCE_DOMAIN";

/// Load configuration with automatic fallback strategy
///
/// Reads the first config file found by [`probe_config_paths`], or starts
/// from defaults, then applies environment overrides.
///
/// # Errors
/// Returns `MentiqError::Config` if the file is malformed or an override
/// has an invalid value.
pub fn load() -> Result<Config> {
    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    let config = apply_env_overrides(base)?;
    tracing::info!(
        environment = %config.api.environment,
        base_url = %config.api.resolved_base_url(),
        storage = %config.storage.backend,
        "Configuration loaded"
    );
    Ok(config)
}

/// Defaults with environment overrides applied
///
/// # Errors
/// Returns `MentiqError::Config` if an override has an invalid value.
pub fn load_from_env() -> Result<Config> {
    apply_env_overrides(Config::default())
}

/// Apply `MENTIQ_*` overrides to `config`
///
/// Unset or blank variables leave the corresponding field alone.
///
/// # Errors
/// Returns `MentiqError::Config` for unparseable values.
pub fn apply_env_overrides(mut config: Config) -> Result<Config> {
    if let Some(value) = env_var(ENV_ENVIRONMENT) {
        config.api.environment = value.parse::<Environment>().map_err(MentiqError::Config)?;
    }
    if let Some(value) = env_var(ENV_BASE_URL) {
        config.api.base_url = Some(value);
    }
    if let Some(value) = env_var(ENV_TIMEOUT_SECS) {
        config.api.timeout_secs = value
            .parse::<u64>()
            .map_err(|e| MentiqError::Config(format!("Invalid request timeout: {}", e)))?;
    }
    if let Some(value) = env_var(ENV_USER_AGENT) {
        config.api.user_agent = Some(value);
    }
    if let Some(value) = env_var(ENV_STORAGE_BACKEND) {
        config.storage.backend = value.parse::<StorageBackend>().map_err(MentiqError::Config)?;
    }
    if let Some(value) = env_var(ENV_DATA_DIR) {
        config.storage.data_dir = Some(PathBuf::from(value));
    }
    if let Some(value) = env_var(ENV_KEYCHAIN_SERVICE) {
        config.storage.service_name = value;
    }
    if let Some(value) = env_var(ENV_CONFERENCE_DOMAIN) {
        config.conference.domain = value;
    }

    if config.api.timeout_secs == 0 {
        return Err(MentiqError::Config("Request timeout must be greater than zero".to_string()));
    }
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MentiqError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MentiqError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MentiqError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MentiqError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MentiqError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MentiqError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(MentiqError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("mentiq.json"),
        dir.join("mentiq.toml"),
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
    ]
}

/// Non-blank environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
