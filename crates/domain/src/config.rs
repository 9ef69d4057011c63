//! Configuration structures
//!
//! Plain data loaded by `mentiq_infra::config::loader`. Every section has a
//! `Default` so partial JSON/TOML files deserialize.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONFERENCE_DOMAIN, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_TIMEOUT_SECS,
    DEVELOPMENT_BASE_URL, PRODUCTION_BASE_URL,
};
use crate::impl_domain_status_conversions;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub conference: ConferenceConfig,
}

/// Deployment environment; selects the default backend base URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl_domain_status_conversions!(Environment {
    Development => "development",
    Production => "production",
});

impl Environment {
    /// Base URL used when no explicit override is configured
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// REST backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub environment: Environment,
    /// Explicit base URL; overrides the environment default when set
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ApiConfig {
    /// Effective base URL without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        let url = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.environment.default_base_url());
        url.trim_end_matches('/').to_string()
    }
}

/// Where the token pair is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Keychain,
    File,
}

impl_domain_status_conversions!(StorageBackend {
    Keychain => "keychain",
    File => "file",
});

/// Durable storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the file backend; platform data dir when `None`
    pub data_dir: Option<PathBuf>,
    /// Keychain service name
    pub service_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: None,
            service_name: DEFAULT_KEYCHAIN_SERVICE.to_string(),
        }
    }
}

/// Live-class conference settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceConfig {
    pub domain: String,
}

impl Default for ConferenceConfig {
    fn default() -> Self {
        Self { domain: DEFAULT_CONFERENCE_DOMAIN.to_string() }
    }
}
