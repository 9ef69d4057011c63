//! Configuration loading
//!
//! Reads [`mentiq_domain::Config`] from a JSON/TOML file and `MENTIQ_*`
//! environment overrides.

pub mod loader;

pub use loader::{apply_env_overrides, load, load_from_env, load_from_file, probe_config_paths};
