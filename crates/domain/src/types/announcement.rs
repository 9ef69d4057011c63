//! Course and platform announcements

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::payload::{field, opt_string, string_or_empty};

/// Named file reference inside an announcement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachments {
    pub links: Vec<String>,
    pub pdfs: Vec<AttachmentFile>,
    pub images: Vec<AttachmentFile>,
}

impl Attachments {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.pdfs.is_empty() && self.images.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    /// `None` for platform-wide announcements
    pub course_id: Option<String>,
    pub teacher_id: Option<String>,
    pub title: String,
    pub content: String,
    pub attachments: Option<Attachments>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Announcement {
    /// Malformed attachments are dropped rather than failing the record
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: string_or_empty(raw, &["id"]),
            course_id: opt_string(raw, &["course_id", "courseId", "course"]),
            teacher_id: opt_string(raw, &["teacher_id", "teacherId", "teacher"]),
            title: string_or_empty(raw, &["title"]),
            content: string_or_empty(raw, &["content"]),
            attachments: field(raw, &["attachments"])
                .and_then(|value| serde_json::from_value(value.clone()).ok()),
            created_at: opt_string(raw, &["created_at", "createdAt"]),
            updated_at: opt_string(raw, &["updated_at", "updatedAt"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn platform_announcement_has_no_course() {
        let a = Announcement::from_payload(&json!({ "id": 1, "title": "Maintenance", "course": null }));
        assert_eq!(a.course_id, None);
        assert_eq!(a.content, "");
        assert_eq!(a.attachments, None);
    }

    #[test]
    fn attachments_are_parsed() {
        let a = Announcement::from_payload(&json!({
            "id": 2, "course_id": 5, "teacher": 7,
            "attachments": {
                "links": ["https://x.io"],
                "pdfs": [{ "name": "syllabus.pdf", "uri": "https://cdn/s.pdf" }]
            }
        }));
        assert_eq!(a.course_id.as_deref(), Some("5"));
        assert_eq!(a.teacher_id.as_deref(), Some("7"));
        let attachments = a.attachments.unwrap();
        assert_eq!(attachments.links, vec!["https://x.io".to_string()]);
        assert_eq!(attachments.pdfs[0].name, "syllabus.pdf");
        assert!(attachments.images.is_empty());
        assert!(!attachments.is_empty());
    }

    #[test]
    fn malformed_attachments_are_dropped() {
        let a = Announcement::from_payload(&json!({ "id": 3, "attachments": "oops" }));
        assert_eq!(a.attachments, None);
    }
}
