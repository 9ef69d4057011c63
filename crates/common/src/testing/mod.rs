//! Testing utilities and helpers
//!
//! - **[`mocks`]**: in-memory implementations of storage traits
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use std::sync::Arc;
//!
//! use mentiq_common::testing::MemoryStore;
//! use mentiq_common::TokenStore;
//!
//! let backend = Arc::new(MemoryStore::new());
//! let tokens = TokenStore::new(backend.clone());
//! # }
//! ```

pub mod mocks;

pub use mocks::MemoryStore;
