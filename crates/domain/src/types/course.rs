//! Courses and lessons

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::payload::{id_string, opt_string, string_or_empty, u64_or_zero};

/// Course as shown in catalogs and dashboards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub teacher_id: Option<String>,
    pub teacher_name: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub cover_image: String,
    pub duration: String,
    pub level: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Course {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: id_string(raw),
            teacher_id: opt_string(raw, &["teacher_id", "teacherId", "teacher"]),
            teacher_name: string_or_empty(raw, &["teacher_name", "teacherName"]),
            title: string_or_empty(raw, &["title"]),
            description: string_or_empty(raw, &["description"]),
            category: string_or_empty(raw, &["category"]),
            cover_image: string_or_empty(raw, &["cover_image", "coverImage"]),
            duration: string_or_empty(raw, &["duration"]),
            level: string_or_empty(raw, &["level"]),
            created_at: opt_string(raw, &["created_at", "createdAt"]),
            updated_at: opt_string(raw, &["updated_at", "updatedAt"]),
        }
    }
}

/// Lesson within a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub course_id: Option<String>,
    pub title: String,
    pub description: String,
    pub content: String,
    pub video_url: String,
    pub file_url: String,
    pub file_type: String,
    /// Minutes
    pub duration: u64,
    pub sequence_number: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Lesson {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: id_string(raw),
            course_id: opt_string(raw, &["course_id", "courseId", "course"]),
            title: string_or_empty(raw, &["title"]),
            description: string_or_empty(raw, &["description"]),
            content: string_or_empty(raw, &["content"]),
            video_url: string_or_empty(raw, &["video_url", "videoUrl"]),
            file_url: string_or_empty(raw, &["file_url", "fileUrl"]),
            file_type: string_or_empty(raw, &["file_type", "fileType"]),
            duration: u64_or_zero(raw, &["duration"]),
            sequence_number: u64_or_zero(raw, &["sequence_number", "sequenceNumber"]),
            created_at: opt_string(raw, &["created_at", "createdAt"]),
            updated_at: opt_string(raw, &["updated_at", "updatedAt"]),
        }
    }
}
