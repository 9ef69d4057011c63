//! Enrollments and lesson progress

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_status_conversions;
use crate::utils::payload::{
    f64_or_zero, field, flag, opt_string, string_or_empty, truthy, u64_or_zero,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Dropped,
}

impl_domain_status_conversions!(EnrollmentStatus {
    Active => "active",
    Completed => "completed",
    Dropped => "dropped",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    pub enrolled_at: Option<String>,
    pub completion_percentage: f64,
    pub status: EnrollmentStatus,
}

impl Enrollment {
    /// Unknown or missing status reads as `active`
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: string_or_empty(raw, &["id"]),
            student_id: opt_string(raw, &["student_id", "studentId", "student"]),
            course_id: opt_string(raw, &["course_id", "courseId", "course"]),
            enrolled_at: opt_string(raw, &["enrolled_at", "enrolledAt"]),
            completion_percentage: f64_or_zero(
                raw,
                &["completion_percentage", "completionPercentage"],
            ),
            status: opt_string(raw, &["status"])
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Enrollment from a status lookup; `None` unless `is_enrolled` is set
    pub fn from_status(raw: &Value) -> Option<Self> {
        flag(raw, &["is_enrolled"]).then(|| Self::from_payload(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub id: String,
    pub lesson_id: String,
    pub is_completed: bool,
    pub completed_at: Option<String>,
    /// Seconds
    pub time_spent: u64,
}

impl LessonProgress {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: string_or_empty(raw, &["id", "lesson_id"]),
            lesson_id: string_or_empty(raw, &["lesson_id", "lessonId", "lesson"]),
            is_completed: flag(raw, &["is_completed", "isCompleted"]),
            completed_at: opt_string(raw, &["completed_at", "completedAt"]),
            time_spent: u64_or_zero(raw, &["time_spent", "timeSpent"]),
        }
    }

    /// Per-lesson entries of a course-progress response
    ///
    /// Entries live under `lesson_progress`, then `results`, else the
    /// payload itself is expected to be the list.
    pub fn list_from_course_progress(raw: &Value) -> Vec<Self> {
        let items = field(raw, &["lesson_progress", "results"]).unwrap_or(raw);
        items.as_array().map(|list| list.iter().map(Self::from_payload).collect()).unwrap_or_default()
    }
}

/// Course completion percentage from a course-progress response
pub fn course_completion(raw: &Value) -> f64 {
    if !truthy(raw) {
        return 0.0;
    }
    f64_or_zero(raw, &["completion_percentage", "completionPercentage"])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_defaults_to_active() {
        let e = Enrollment::from_payload(&json!({ "id": 1, "course": 3 }));
        assert_eq!(e.status, EnrollmentStatus::Active);
        assert_eq!(e.course_id.as_deref(), Some("3"));
        assert_eq!(e.completion_percentage, 0.0);

        let done = Enrollment::from_payload(&json!({ "id": 1, "status": "completed" }));
        assert_eq!(done.status, EnrollmentStatus::Completed);
    }

    #[test]
    fn status_lookup_requires_is_enrolled() {
        assert!(Enrollment::from_status(&json!({ "is_enrolled": false })).is_none());
        let e = Enrollment::from_status(&json!({
            "is_enrolled": true, "id": 4, "completion_percentage": 37.5
        }));
        assert_eq!(e.map(|e| e.completion_percentage), Some(37.5));
    }

    #[test]
    fn course_progress_lists_lessons() {
        let raw = json!({
            "completion_percentage": 50,
            "lesson_progress": [
                { "lesson_id": 11, "is_completed": true, "time_spent": 120 },
                { "id": 2, "lesson": 12 }
            ]
        });
        let lessons = LessonProgress::list_from_course_progress(&raw);
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].id, "11");
        assert_eq!(lessons[0].lesson_id, "11");
        assert!(lessons[0].is_completed);
        assert_eq!(lessons[0].time_spent, 120);
        assert_eq!(lessons[1].lesson_id, "12");
        assert!(!lessons[1].is_completed);
        assert_eq!(course_completion(&raw), 50.0);
    }

    #[test]
    fn missing_progress_is_zero() {
        assert_eq!(course_completion(&Value::Null), 0.0);
        assert!(LessonProgress::list_from_course_progress(&json!({})).is_empty());
    }
}
