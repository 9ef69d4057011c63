//! Media upload descriptors

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_BINARY_MIME, DEFAULT_IMAGE_MIME, DEFAULT_VIDEO_MIME};
use crate::impl_domain_status_conversions;
use crate::utils::payload::{opt_string, string_or_empty};

/// Kind of media being uploaded; sent as the `type` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    File,
}

impl_domain_status_conversions!(MediaKind {
    Image => "image",
    Video => "video",
    File => "file",
});

impl MediaKind {
    /// MIME type for an unrecognized extension
    pub const fn fallback_mime(self) -> &'static str {
        match self {
            Self::Image => DEFAULT_IMAGE_MIME,
            Self::Video => DEFAULT_VIDEO_MIME,
            Self::File => DEFAULT_BINARY_MIME,
        }
    }
}

/// Where an upload is used; sent as the `category` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaCategory {
    Profile,
    CourseCover,
    LessonVideo,
    CourseFile,
    Announcement,
}

impl_domain_status_conversions!(MediaCategory {
    Profile => "profile",
    CourseCover => "course-cover",
    LessonVideo => "lesson-video",
    CourseFile => "course-file",
    Announcement => "announcement",
});

/// Lowercased extension of `path`; `jpg` when there is none
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map_or_else(|| "jpg".to_string(), str::to_ascii_lowercase)
}

/// MIME type for a lowercased extension
pub fn mime_for(extension: &str, kind: MediaKind) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => kind.fallback_mime(),
    }
}

/// Server-side file name: `<category>_<unix-millis>.<ext>`
pub fn upload_file_name(category: MediaCategory, unix_millis: u128, extension: &str) -> String {
    format!("{category}_{unix_millis}.{extension}")
}

/// Stored media record as returned by upload and list calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
    pub id: Option<String>,
    /// Public URL; empty when the backend did not report one
    pub url: String,
    pub category: Option<String>,
    pub kind: Option<String>,
}

impl UploadedMedia {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: opt_string(raw, &["id"]),
            url: string_or_empty(raw, &["url", "file_url", "file"]),
            category: opt_string(raw, &["category"]),
            kind: opt_string(raw, &["type", "media_type"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn known_extensions_map_to_mime() {
        assert_eq!(mime_for("png", MediaKind::File), "image/png");
        assert_eq!(mime_for("mov", MediaKind::Image), "video/quicktime");
        assert!(mime_for("docx", MediaKind::File).ends_with("wordprocessingml.document"));
    }

    #[test]
    fn unknown_extension_uses_kind() {
        assert_eq!(mime_for("webm", MediaKind::Video), "video/mp4");
        assert_eq!(mime_for("heic", MediaKind::Image), "image/jpeg");
        assert_eq!(mime_for("zip", MediaKind::File), "application/octet-stream");
    }

    #[test]
    fn extension_is_lowercased_with_default() {
        assert_eq!(file_extension(Path::new("/tmp/Cover.PNG")), "png");
        assert_eq!(file_extension(Path::new("/tmp/noext")), "jpg");
    }

    #[test]
    fn file_name_format() {
        assert_eq!(
            upload_file_name(MediaCategory::CourseCover, 1_700_000_000_000, "png"),
            "course-cover_1700000000000.png"
        );
    }

    #[test]
    fn uploaded_url_fallbacks() {
        assert_eq!(UploadedMedia::from_payload(&json!({ "url": "u" })).url, "u");
        assert_eq!(UploadedMedia::from_payload(&json!({ "file_url": "f" })).url, "f");
        assert_eq!(UploadedMedia::from_payload(&json!({ "file": "x" })).url, "x");
        assert_eq!(UploadedMedia::from_payload(&json!({})).url, "");
    }
}
