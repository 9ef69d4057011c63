//! Live classes and their chat

use mentiq_domain::constants::DEFAULT_CONFERENCE_DOMAIN;
use mentiq_domain::utils::payload::normalize_list;
use mentiq_domain::{ChatMessage, LiveClass, Participant};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::segment;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::request::RequestDescriptor;

/// Body of `POST /v1/live-classes/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewLiveClass {
    pub course: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// RFC 3339 timestamp
    pub scheduled_start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u64>,
}

/// Body of `PUT /v1/live-classes/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct LiveClassChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u64>,
}

/// `/v1/live-classes/*`
///
/// The client only builds the conference room URL; joining the room's
/// media session happens elsewhere.
#[derive(Debug, Clone)]
pub struct LiveClassesApi {
    client: ApiClient,
    conference_domain: String,
}

impl LiveClassesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client, conference_domain: DEFAULT_CONFERENCE_DOMAIN.to_string() }
    }

    /// Conference server used when a class does not name its own
    pub fn with_conference_domain(mut self, domain: impl Into<String>) -> Self {
        self.conference_domain = domain.into();
        self
    }

    /// Room URL for `class`
    pub fn conference_url(&self, class: &LiveClass) -> String {
        class.conference_url(&self.conference_domain)
    }

    fn class_path(id: &str, action: &str) -> String {
        format!("/v1/live-classes/{}/{action}", segment(id))
    }

    pub async fn list(&self) -> Result<Vec<LiveClass>, ApiError> {
        let raw: Value = self.client.get("/v1/live-classes/").await?;
        Ok(normalize_list(&raw, LiveClass::from_payload))
    }

    pub async fn get(&self, id: &str) -> Result<LiveClass, ApiError> {
        let raw: Value = self.client.get(&Self::class_path(id, "")).await?;
        Ok(LiveClass::from_payload(&raw))
    }

    #[instrument(skip(self, class), fields(title = %class.title))]
    pub async fn create(&self, class: &NewLiveClass) -> Result<LiveClass, ApiError> {
        let raw: Value = self.client.post("/v1/live-classes/", class).await?;
        Ok(LiveClass::from_payload(&raw))
    }

    pub async fn update(&self, id: &str, changes: &LiveClassChanges) -> Result<Value, ApiError> {
        self.client.put(&Self::class_path(id, ""), changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.client.delete(&Self::class_path(id, "")).await?;
        Ok(())
    }

    /// Start the class (teacher); the returned class is active
    #[instrument(skip(self))]
    pub async fn start(&self, id: &str) -> Result<LiveClass, ApiError> {
        let raw = self.action(id, "start/").await?;
        info!(class_id = %id, "live class started");
        Ok(LiveClass::from_session_payload(&raw, id))
    }

    #[instrument(skip(self))]
    pub async fn end(&self, id: &str) -> Result<(), ApiError> {
        self.action(id, "end/").await?;
        info!(class_id = %id, "live class ended");
        Ok(())
    }

    /// Join the class (student); the returned class is active
    #[instrument(skip(self))]
    pub async fn join(&self, id: &str) -> Result<LiveClass, ApiError> {
        let raw = self.action(id, "join/").await?;
        Ok(LiveClass::from_session_payload(&raw, id))
    }

    pub async fn leave(&self, id: &str) -> Result<(), ApiError> {
        self.action(id, "leave/").await?;
        Ok(())
    }

    pub async fn participants(&self, id: &str) -> Result<Vec<Participant>, ApiError> {
        let raw: Value = self.client.get(&Self::class_path(id, "participants/")).await?;
        Ok(normalize_list(&raw, Participant::from_payload))
    }

    pub async fn chat(&self, id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let raw: Value = self.client.get(&Self::class_path(id, "chat/")).await?;
        Ok(normalize_list(&raw, ChatMessage::from_payload))
    }

    /// Post a chat message; returns the stored message
    pub async fn send_chat(&self, id: &str, message: &str) -> Result<ChatMessage, ApiError> {
        let raw: Value =
            self.client.post(&Self::class_path(id, "chat/"), &json!({ "message": message })).await?;
        Ok(ChatMessage::from_payload(&raw))
    }

    /// Body-less POST on a class action
    async fn action(&self, id: &str, action: &str) -> Result<Value, ApiError> {
        self.client.request_as(RequestDescriptor::post(Self::class_path(id, action))).await
    }
}
