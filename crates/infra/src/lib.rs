//! # Mentiq Infrastructure
//!
//! I/O side of the Mentiq client.
//!
//! This crate contains:
//! - The authenticated REST client, token refresh and endpoint facades
//! - The session service that tracks the signed-in user
//! - The retrying HTTP transport
//! - Configuration loading
//!
//! ## Architecture
//! - Depends on `mentiq-domain` for models and `mentiq-common` for storage
//! - Contains all network and file I/O

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiClientConfig, ApiError, ApiResources, AuthFailureHandler,
    MultipartForm, RequestDescriptor, Session, SessionError,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
