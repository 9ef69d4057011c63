//! Announcements and notifications

use mentiq_domain::utils::payload::normalize_list;
use mentiq_domain::{unread_count, Announcement, Attachments, Notification};
use serde::Serialize;
use serde_json::Value;

use super::segment;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::request::RequestDescriptor;

/// Body of `POST /v1/announcements/`; no course means platform-wide
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Attachments>,
}

/// Body of `PUT /v1/announcements/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnouncementChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Attachments>,
}

/// `/v1/announcements/*`
#[derive(Debug, Clone)]
pub struct AnnouncementsApi {
    client: ApiClient,
}

impl AnnouncementsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every announcement visible to the user
    pub async fn list(&self) -> Result<Vec<Announcement>, ApiError> {
        let raw: Value = self.client.get("/v1/announcements/").await?;
        Ok(normalize_list(&raw, Announcement::from_payload))
    }

    /// Announcements of one course
    pub async fn for_course(&self, course_id: &str) -> Result<Vec<Announcement>, ApiError> {
        let all = self.list().await?;
        Ok(all.into_iter().filter(|a| a.course_id.as_deref() == Some(course_id)).collect())
    }

    /// Platform-wide announcements (no course)
    pub async fn platform_wide(&self) -> Result<Vec<Announcement>, ApiError> {
        let all = self.list().await?;
        Ok(all.into_iter().filter(|a| a.course_id.is_none()).collect())
    }

    /// Announcements attached to any course
    pub async fn course_wide(&self) -> Result<Vec<Announcement>, ApiError> {
        let all = self.list().await?;
        Ok(all.into_iter().filter(|a| a.course_id.is_some()).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Announcement, ApiError> {
        let raw: Value = self.client.get(&format!("/v1/announcements/{}/", segment(id))).await?;
        Ok(Announcement::from_payload(&raw))
    }

    pub async fn create(&self, announcement: &NewAnnouncement) -> Result<Value, ApiError> {
        self.client.post("/v1/announcements/", announcement).await
    }

    pub async fn update(
        &self,
        id: &str,
        changes: &AnnouncementChanges,
    ) -> Result<Value, ApiError> {
        self.client.put(&format!("/v1/announcements/{}/", segment(id)), changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.client.delete(&format!("/v1/announcements/{}/", segment(id))).await?;
        Ok(())
    }
}

/// `/v1/notifications/*`
#[derive(Debug, Clone)]
pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        let raw: Value = self.client.get("/v1/notifications/").await?;
        Ok(normalize_list(&raw, Notification::from_payload))
    }

    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        let raw: Value = self.client.get("/v1/notifications/unread-count/").await?;
        Ok(unread_count(&raw))
    }

    pub async fn mark_read(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("/v1/notifications/{}/read/", segment(id));
        let _: Value = self.client.request_as(RequestDescriptor::post(endpoint)).await?;
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        let request = RequestDescriptor::post("/v1/notifications/mark-all-read/");
        let _: Value = self.client.request_as(request).await?;
        Ok(())
    }
}
