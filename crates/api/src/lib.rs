//! # Mentiq App
//!
//! Application shell around the Mentiq API client.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Logging setup and health reporting
//! - The `mentiq` binary entry point
//!
//! ## Architecture
//! - Depends on `common`, `domain`, and `infra`
//! - Wires the token store, the API client and the session together

pub mod context;
pub mod utils;

pub use context::AppContext;
pub use utils::health::{ComponentHealth, HealthStatus};
