//! In-app notifications

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::payload::{flag, opt_string, string_or_empty, u64_or_zero};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: Option<String>,
    pub is_read: bool,
    pub created_at: Option<String>,
}

impl Notification {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: string_or_empty(raw, &["id"]),
            title: string_or_empty(raw, &["title"]),
            message: string_or_empty(raw, &["message", "body"]),
            kind: opt_string(raw, &["type", "notification_type"]),
            is_read: flag(raw, &["is_read", "isRead"]),
            created_at: opt_string(raw, &["created_at", "createdAt"]),
        }
    }
}

/// Unread count from `unread_count` or `count`
pub fn unread_count(raw: &Value) -> u64 {
    u64_or_zero(raw, &["unread_count", "count"])
}
