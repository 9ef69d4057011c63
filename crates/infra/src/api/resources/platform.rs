//! Health, payments and analytics

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::segment;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::request::RequestDescriptor;

/// `GET /health/`
#[derive(Debug, Clone)]
pub struct HealthApi {
    client: ApiClient,
}

impl HealthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Raw health payload; never sends credentials
    pub async fn check(&self) -> Result<Value, ApiError> {
        self.client.request_as(RequestDescriptor::get("/health/").skip_auth()).await
    }

    /// `true` if the backend answered 2xx
    ///
    /// Unhealthy statuses are reported as `Ok(false)`; transport failures
    /// are errors.
    #[instrument(skip(self))]
    pub async fn is_healthy(&self) -> Result<bool, ApiError> {
        match self.check().await {
            Ok(_) => {
                info!("API is healthy");
                Ok(true)
            }
            Err(err @ ApiError::Http { .. }) => {
                warn!(status = ?err.status(), "API returned non-success status");
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, "Health check failed");
                Err(err)
            }
        }
    }
}

/// `/v1/payments/*`
#[derive(Debug, Clone)]
pub struct PaymentsApi {
    client: ApiClient,
}

impl PaymentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Start a checkout session for a paid course
    pub async fn checkout(&self, course_id: &str) -> Result<Value, ApiError> {
        self.client.post("/v1/payments/checkout/", &json!({ "course_id": course_id })).await
    }

    pub async fn history(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/payments/history/").await
    }
}

/// `/v1/analytics/*`
#[derive(Debug, Clone)]
pub struct AnalyticsApi {
    client: ApiClient,
}

impl AnalyticsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn platform(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/analytics/platform/").await
    }

    pub async fn platform_history(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/analytics/platform/history/").await
    }

    pub async fn course(&self, course_id: &str) -> Result<Value, ApiError> {
        self.client.get(&format!("/v1/analytics/course/{}/", segment(course_id))).await
    }
}
