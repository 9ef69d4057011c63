//! Authentication, profile and role dashboards

use mentiq_domain::utils::payload::normalize_list;
use mentiq_domain::{Course, Enrollment, Role};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

use super::segment;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::request::RequestDescriptor;

/// Body of `POST /v1/auth/register/`
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: String,
    pub role: Role,
}

impl Registration {
    /// Registration where the confirmation repeats `password`
    pub fn new(email: &str, password: &str, name: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: password.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// Body of `PUT /v1/auth/profile/`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// `/v1/auth/*`
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in; the response carries the token pair and the account
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let request = RequestDescriptor::post("/v1/auth/login/")
            .json(json!({ "email": email, "password": password }))
            .skip_auth();
        self.client.request_as(request).await
    }

    #[instrument(skip(self, registration), fields(email = %registration.email, role = %registration.role))]
    pub async fn register(&self, registration: &Registration) -> Result<Value, ApiError> {
        let request = RequestDescriptor::post("/v1/auth/register/")
            .json(serde_json::to_value(registration)?)
            .skip_auth();
        self.client.request_as(request).await
    }

    /// Blacklist the refresh token on the server
    pub async fn logout(&self, refresh_token: &str) -> Result<Value, ApiError> {
        self.client.post("/v1/auth/logout/", &json!({ "refresh": refresh_token })).await
    }

    /// Exchange a refresh token without touching the token store
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Value, ApiError> {
        let request = RequestDescriptor::post("/v1/auth/token/refresh/")
            .json(json!({ "refresh": refresh_token }))
            .skip_auth();
        self.client.request_as(request).await
    }

    pub async fn profile(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/auth/profile/").await
    }

    pub async fn update_profile(&self, changes: &ProfileChanges) -> Result<Value, ApiError> {
        self.client.put("/v1/auth/profile/", changes).await
    }

    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({ "old_password": old_password, "new_password": new_password });
        self.client.post("/v1/auth/change-password/", &body).await
    }

    /// Register the device's push token
    pub async fn update_fcm_token(&self, fcm_token: &str) -> Result<Value, ApiError> {
        self.client.post("/v1/auth/fcm-token/", &json!({ "fcm_token": fcm_token })).await
    }
}

/// `/v1/students/*`
#[derive(Debug, Clone)]
pub struct StudentsApi {
    client: ApiClient,
}

impl StudentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/students/dashboard/").await
    }

    /// Courses the student is enrolled in
    pub async fn courses(&self) -> Result<Vec<Course>, ApiError> {
        let raw: Value = self.client.get("/v1/students/courses/").await?;
        Ok(normalize_list(&raw, Course::from_payload))
    }

    /// The same listing read as enrollment records
    pub async fn enrollments(&self) -> Result<Vec<Enrollment>, ApiError> {
        let raw: Value = self.client.get("/v1/students/courses/").await?;
        Ok(normalize_list(&raw, Enrollment::from_payload))
    }

    /// Published courses open for enrollment
    pub async fn browse(&self) -> Result<Vec<Course>, ApiError> {
        let raw: Value = self.client.get("/v1/students/browse/").await?;
        Ok(normalize_list(&raw, Course::from_payload))
    }

    pub async fn progress(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/students/progress/").await
    }

    pub async fn quiz_history(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/students/quiz-history/").await
    }
}

/// `/v1/teachers/*`
#[derive(Debug, Clone)]
pub struct TeachersApi {
    client: ApiClient,
}

impl TeachersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/teachers/dashboard/").await
    }

    /// Courses taught by the signed-in teacher
    pub async fn courses(&self) -> Result<Vec<Course>, ApiError> {
        let raw: Value = self.client.get("/v1/teachers/courses/").await?;
        Ok(normalize_list(&raw, Course::from_payload))
    }

    /// Students across all of the teacher's courses, with their progress
    pub async fn students(&self) -> Result<Value, ApiError> {
        self.client.get("/v1/teachers/students/").await
    }

    pub async fn course_students(&self, course_id: &str) -> Result<Value, ApiError> {
        let endpoint = format!("/v1/teachers/courses/{}/students/", segment(course_id));
        self.client.get(&endpoint).await
    }
}
