//! Authenticated client for the Mentiq REST backend
//!
//! # Architecture
//!
//! - [`client::ApiClient`] dispatches requests over [`crate::http::HttpClient`]
//!   and owns the bearer token attachment
//! - [`auth`] refreshes the access token once on 401, single-flighted across
//!   concurrent requests, and reports definitive failures to an injected
//!   [`AuthFailureHandler`]
//! - [`resources`] holds the endpoint tables, one facade per backend area
//! - [`session`] keeps the signed-in user in sync with the token store
//!
//! Bearer tokens are never logged.

pub mod auth;
pub mod client;
pub mod errors;
pub mod request;
pub mod resources;
pub mod session;

pub use auth::{AuthFailureHandler, RefreshCoordinator, RefreshFailure, RefreshOutcome};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig, ApiResponse};
pub use errors::{error_message, ApiError, ApiErrorCategory};
pub use request::{MultipartForm, RequestBody, RequestDescriptor};
pub use resources::ApiResources;
pub use session::{Session, SessionError};
