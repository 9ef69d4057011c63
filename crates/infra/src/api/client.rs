//! Request dispatcher
//!
//! [`ApiClient`] sends one [`RequestDescriptor`] to the backend: it resolves
//! the URL, attaches the bearer token, encodes the body, parses JSON
//! responses and turns non-2xx statuses into [`ApiError::Http`]. A 401 on
//! an authenticated call triggers exactly one token refresh and one retry.

use std::sync::Arc;
use std::time::Duration;

use mentiq_common::TokenStore;
use mentiq_domain::constants::{DEFAULT_TIMEOUT_SECS, DEVELOPMENT_BASE_URL};
use mentiq_domain::{ApiConfig, MentiqError};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::auth::{refresh_session, AuthFailureHandler, RefreshCoordinator, RefreshOutcome};
use super::errors::ApiError;
use super::request::{MultipartForm, RequestBody, RequestDescriptor};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL, e.g. `http://localhost:8000/api`
    pub base_url: String,
    /// Timeout for a single request
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEVELOPMENT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.resolved_base_url(),
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl ApiClientConfig {
    /// Absolute `http…` endpoints are used as-is; anything else is appended
    /// to the base URL.
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            return endpoint.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        if endpoint.starts_with('/') {
            format!("{base}{endpoint}")
        } else {
            format!("{base}/{endpoint}")
        }
    }
}

/// Successful response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub ok: bool,
}

/// The part of the client that talks HTTP. Cheap to clone; the refresh
/// future owns a copy.
#[derive(Clone)]
pub(crate) struct Transport {
    http: HttpClient,
    config: Arc<ApiClientConfig>,
}

impl Transport {
    /// Send one request with the given bearer token.
    pub(crate) async fn dispatch(
        &self,
        request: &RequestDescriptor,
        token: Option<&str>,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let url = self.config.resolve_url(&request.endpoint);
        let headers = build_headers(request, token)?;
        let send_body = request.method != Method::GET;

        debug!(method = %request.method, %url, authenticated = token.is_some(), "dispatching request");

        let builder = self.http.request(request.method.clone(), url.as_str()).headers(headers);
        let builder = match &request.body {
            Some(RequestBody::Json(body)) if send_body => builder.json(body),
            Some(RequestBody::Multipart(form)) if send_body => builder.multipart(form.to_form()),
            _ => builder,
        };
        let response = self.http.send(builder).await?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        let body = response.text().await.map_err(transport_error)?;

        let data = if is_json && !body.trim().is_empty() {
            match serde_json::from_str::<Value>(&body) {
                Ok(parsed) => parsed,
                Err(err) if status.is_success() => return Err(err.into()),
                Err(_) => Value::Null,
            }
        } else {
            Value::Null
        };

        debug!(method = %request.method, %url, %status, "received response");

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), data));
        }

        Ok(ApiResponse { data, status: status.as_u16(), ok: true })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    let infra: InfraError = err.into();
    ApiError::from(MentiqError::from(infra))
}

/// Caller headers first, then the dispatcher's `Content-Type` and
/// `Authorization`, which replace caller values of the same name.
fn build_headers(request: &RequestDescriptor, token: Option<&str>) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();

    for (name, value) in &request.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| ApiError::Config(format!("invalid header name {name:?}: {err}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| ApiError::Config(format!("invalid value for header {name}: {err}")))?;
        headers.insert(header_name, header_value);
    }

    // reqwest writes the multipart boundary itself.
    if request.is_form_data() {
        headers.remove(CONTENT_TYPE);
    } else {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if let Some(token) = token.filter(|token| !token.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::Config("access token is not a valid header value".into()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Authenticated API client
///
/// Cloning is cheap and clones share the token store and the refresh slot.
#[derive(Clone)]
pub struct ApiClient {
    transport: Transport,
    tokens: Arc<TokenStore>,
    on_auth_failure: Option<Arc<dyn AuthFailureHandler>>,
    refresh: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Create a client without an auth-failure handler
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be created
    pub fn new(config: ApiClientConfig, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        Self::with_parts(config, tokens, None)
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    fn with_parts(
        config: ApiClientConfig,
        tokens: Arc<TokenStore>,
        on_auth_failure: Option<Arc<dyn AuthFailureHandler>>,
    ) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut http = HttpClient::builder()
            .timeout(config.timeout)
            .default_headers(default_headers);
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Ok(Self {
            transport: Transport { http, config: Arc::new(config) },
            tokens,
            on_auth_failure,
            refresh: Arc::new(RefreshCoordinator::new()),
        })
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.transport.config
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Send a request, refreshing the access token once on 401.
    ///
    /// When the refresh fails the original 401 is returned. A retried
    /// request that is rejected again is returned as-is.
    ///
    /// A 401 for a token that is no longer the stored one does not start a
    /// refresh: a newer stored token is retried directly, and an emptied
    /// store means the session was already cleared.
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    pub async fn request(&self, request: RequestDescriptor) -> Result<ApiResponse<Value>, ApiError> {
        let sent = if request.skip_auth { None } else { self.tokens.access_token().await };
        let sent = sent.filter(|token| !token.is_empty());

        let err = match self.transport.dispatch(&request, sent.as_deref()).await {
            Err(err) if err.is_unauthorized() && !request.skip_auth => err,
            other => return other,
        };

        let current = self.tokens.access_token().await.filter(|token| !token.is_empty());
        if let Some(current) = current.as_deref().filter(|c| sent.as_deref() != Some(*c)) {
            debug!("access token changed while the request was in flight, retrying");
            return self.transport.dispatch(&request, Some(current)).await;
        }
        if sent.is_some() && current.is_none() {
            debug!("session was cleared while the request was in flight");
            return Err(err);
        }

        debug!("access token rejected, attempting refresh");
        match self.refresh_access_token().await {
            Ok(access) => self.transport.dispatch(&request, Some(&access)).await,
            Err(failure) => {
                debug!(reason = %failure.reason, "refresh failed, returning original error");
                Err(err)
            }
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Concurrent callers share one in-flight refresh. On failure the
    /// tokens are cleared and the auth-failure handler is notified once.
    pub async fn refresh_access_token(&self) -> RefreshOutcome {
        let transport = self.transport.clone();
        let tokens = self.tokens.clone();
        let handler = self.on_auth_failure.clone();
        self.refresh.run(move || refresh_session(transport, tokens, handler)).await
    }

    /// Send a request and decode its data into `T`
    ///
    /// An empty or non-JSON body decodes as `null`, so `()` and `Option<_>`
    /// accept it.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T, ApiError> {
        let response = self.request(request).await?;
        Ok(serde_json::from_value(response.data)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request_as(RequestDescriptor::get(endpoint)).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request_as(RequestDescriptor::post(endpoint).json(body)).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request_as(RequestDescriptor::put(endpoint).json(body)).await
    }

    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request_as(RequestDescriptor::patch(endpoint).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request_as(RequestDescriptor::delete(endpoint)).await
    }

    /// POST a multipart form
    pub async fn upload<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: MultipartForm,
    ) -> Result<T, ApiError> {
        self.request_as(RequestDescriptor::post(endpoint).multipart(form)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.transport.config)
            .field("has_auth_failure_handler", &self.on_auth_failure.is_some())
            .field("refresh", &self.refresh)
            .finish()
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    tokens: Option<Arc<TokenStore>>,
    on_auth_failure: Option<Arc<dyn AuthFailureHandler>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn tokens(mut self, tokens: Arc<TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Handler notified when a token refresh definitively fails
    pub fn on_auth_failure(mut self, handler: Arc<dyn AuthFailureHandler>) -> Self {
        self.on_auth_failure = Some(handler);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the token store is missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let tokens =
            self.tokens.ok_or_else(|| ApiError::Config("Token store not set".to_string()))?;

        ApiClient::with_parts(config, tokens, self.on_auth_failure)
    }
}
