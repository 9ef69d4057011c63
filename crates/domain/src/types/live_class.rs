//! Live classes, participants and in-class chat

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEFAULT_CONFERENCE_DOMAIN, LIVE_CLASS_ROOM_PREFIX};
use crate::impl_domain_status_conversions;
use crate::utils::payload::{flag, opt_string, opt_u64, string_or_empty, u64_or_zero};

/// Lifecycle: `scheduled -> active -> completed | cancelled`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveClassStatus {
    #[default]
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl_domain_status_conversions!(LiveClassStatus {
    Scheduled => "scheduled",
    Active => "active",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl LiveClassStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveClass {
    pub id: String,
    pub course_id: Option<String>,
    pub teacher_id: Option<String>,
    pub teacher_name: String,
    pub title: String,
    pub description: String,
    pub room_id: String,
    pub channel_name: String,
    pub status: LiveClassStatus,
    pub scheduled_start_time: Option<String>,
    pub actual_start_time: Option<String>,
    pub end_time: Option<String>,
    pub max_participants: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub participant_count: u64,
    pub jitsi_domain: Option<String>,
    pub meeting_url: Option<String>,
    pub is_class_host: bool,
}

impl LiveClass {
    /// Unknown or missing status reads as `scheduled`
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: string_or_empty(raw, &["id"]),
            course_id: opt_string(raw, &["course_id", "courseId", "course"]),
            teacher_id: opt_string(raw, &["teacher_id", "teacherId", "teacher"]),
            teacher_name: string_or_empty(raw, &["teacher_name", "teacherName"]),
            title: string_or_empty(raw, &["title"]),
            description: string_or_empty(raw, &["description"]),
            room_id: string_or_empty(raw, &["room_id", "roomId", "channel_name"]),
            channel_name: string_or_empty(raw, &["channel_name", "channelName"]),
            status: opt_string(raw, &["status"])
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            scheduled_start_time: opt_string(
                raw,
                &["scheduled_start_time", "scheduledStartTime"],
            ),
            actual_start_time: opt_string(raw, &["actual_start_time", "actualStartTime"]),
            end_time: opt_string(raw, &["end_time", "endTime"]),
            max_participants: opt_u64(raw, &["max_participants", "maxParticipants"]),
            created_at: opt_string(raw, &["created_at", "createdAt"]),
            updated_at: opt_string(raw, &["updated_at", "updatedAt"]),
            participant_count: u64_or_zero(raw, &["participant_count", "participantCount"]),
            jitsi_domain: opt_string(raw, &["jitsi_domain", "jitsiDomain"]),
            meeting_url: opt_string(raw, &["meeting_url", "meetingUrl"]),
            is_class_host: flag(raw, &["is_class_host", "isClassHost"]),
        }
    }

    /// Live class from a start/join response
    ///
    /// The class details sit under `data`; the id is the one requested and
    /// the class is active by definition.
    pub fn from_session_payload(raw: &Value, class_id: &str) -> Self {
        let mut merged = raw.get("data").and_then(Value::as_object).cloned().unwrap_or_else(Map::new);
        merged.insert("id".into(), Value::String(class_id.to_string()));
        merged.insert("status".into(), Value::String(LiveClassStatus::Active.as_str().into()));
        Self::from_payload(&Value::Object(merged))
    }

    /// Conference room name for this class
    pub fn room_name(&self) -> String {
        room_name(&self.id)
    }

    /// URL of the conference room
    ///
    /// Prefers the URL the backend issued, then the class's own domain,
    /// then `default_domain`.
    pub fn conference_url(&self, default_domain: &str) -> String {
        if let Some(url) = self.meeting_url.as_deref().filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        let domain = self.jitsi_domain.as_deref().unwrap_or(default_domain);
        meeting_url(&self.room_name(), domain)
    }
}

/// Room name for a class id
pub fn room_name(class_id: &str) -> String {
    format!("{LIVE_CLASS_ROOM_PREFIX}{class_id}")
}

/// `https://<domain>/<room>`; an empty domain falls back to the public server
pub fn meeting_url(room: &str, domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    let domain = if domain.is_empty() { DEFAULT_CONFERENCE_DOMAIN } else { domain };
    format!("https://{domain}/{room}")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    #[default]
    Joined,
    Left,
    Idle,
}

impl_domain_status_conversions!(ParticipantStatus {
    Joined => "joined",
    Left => "left",
    Idle => "idle",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub class_id: Option<String>,
    pub student_id: Option<String>,
    pub student_name: String,
    pub joined_at: Option<String>,
    pub left_at: Option<String>,
    pub status: ParticipantStatus,
}

impl Participant {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: string_or_empty(raw, &["id"]),
            class_id: opt_string(raw, &["class_id", "classId", "live_class"]),
            student_id: opt_string(raw, &["student_id", "studentId", "user.id", "student"]),
            student_name: string_or_empty(raw, &["student_name", "studentName", "user.name"]),
            joined_at: opt_string(raw, &["joined_at", "joinedAt"]),
            left_at: opt_string(raw, &["left_at", "leftAt"]),
            status: opt_string(raw, &["status"])
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub class_id: Option<String>,
    pub sender_id: Option<String>,
    pub sender_name: String,
    pub message: String,
    pub timestamp: Option<String>,
    pub is_system_message: bool,
}

impl ChatMessage {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: string_or_empty(raw, &["id"]),
            class_id: opt_string(raw, &["class_id", "classId", "live_class"]),
            sender_id: opt_string(raw, &["sender_id", "senderId", "user.id", "sender"]),
            sender_name: opt_string(raw, &["sender_name", "senderName", "user.name"])
                .unwrap_or_else(|| "Unknown".to_string()),
            message: string_or_empty(raw, &["message", "content"]),
            timestamp: opt_string(raw, &["timestamp", "created_at", "createdAt"]),
            is_system_message: flag(raw, &["is_system_message", "isSystemMessage"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn live_class_defaults() {
        let class = LiveClass::from_payload(&json!({ "id": 8, "title": "Office hours", "channel_name": "ch-8" }));
        assert_eq!(class.status, LiveClassStatus::Scheduled);
        assert_eq!(class.room_id, "ch-8");
        assert_eq!(class.channel_name, "ch-8");
        assert_eq!(class.participant_count, 0);
        assert!(!class.is_class_host);
    }

    #[test]
    fn session_payload_is_active_with_requested_id() {
        let raw = json!({ "message": "started", "data": { "id": 99, "status": "scheduled", "room_id": "r" } });
        let class = LiveClass::from_session_payload(&raw, "12");
        assert_eq!(class.id, "12");
        assert_eq!(class.status, LiveClassStatus::Active);
        assert_eq!(class.room_id, "r");

        let bare = LiveClass::from_session_payload(&json!({}), "3");
        assert_eq!(bare.id, "3");
        assert_eq!(bare.status, LiveClassStatus::Active);
    }

    #[test]
    fn conference_url_resolution() {
        assert_eq!(room_name("42"), "mentiq_live_class_42");
        assert_eq!(meeting_url("room", ""), "https://meet.jit.si/room");

        let mut class = LiveClass::from_payload(&json!({ "id": 42 }));
        assert_eq!(class.conference_url("meet.example.org"), "https://meet.example.org/mentiq_live_class_42");

        class.jitsi_domain = Some("jitsi.school.edu".into());
        assert_eq!(class.conference_url("meet.example.org"), "https://jitsi.school.edu/mentiq_live_class_42");

        class.meeting_url = Some("https://issued.example/abc".into());
        assert_eq!(class.conference_url("meet.example.org"), "https://issued.example/abc");
    }

    #[test]
    fn terminal_states() {
        assert!(LiveClassStatus::Completed.is_terminal());
        assert!(LiveClassStatus::Cancelled.is_terminal());
        assert!(!LiveClassStatus::Active.is_terminal());
    }

    #[test]
    fn chat_message_sender_fallbacks() {
        let nested = ChatMessage::from_payload(&json!({
            "id": 1, "live_class": 4, "user": { "id": 5, "name": "Sam" }, "content": "hi", "created_at": "t"
        }));
        assert_eq!(nested.class_id.as_deref(), Some("4"));
        assert_eq!(nested.sender_id.as_deref(), Some("5"));
        assert_eq!(nested.sender_name, "Sam");
        assert_eq!(nested.message, "hi");
        assert_eq!(nested.timestamp.as_deref(), Some("t"));

        let anon = ChatMessage::from_payload(&json!({ "id": 2, "message": "x" }));
        assert_eq!(anon.sender_name, "Unknown");
        assert!(!anon.is_system_message);
    }

    #[test]
    fn participant_status_parses() {
        let p = Participant::from_payload(&json!({ "id": 1, "status": "left", "user": { "id": 3, "name": "Kim" } }));
        assert_eq!(p.status, ParticipantStatus::Left);
        assert_eq!(p.student_id.as_deref(), Some("3"));
        assert_eq!(p.student_name, "Kim");
    }
}
