//! # Mentiq Domain
//!
//! Business domain types and models for the Mentiq API client.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Configuration structures
//! - View models (courses, lessons, quizzes, live classes, ...) and the
//!   normalization that maps raw REST payloads onto them
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Mentiq crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
