//! Domain types and models
//!
//! View models returned by the resource facades. Each one is built from the
//! raw backend payload by a `from_payload` constructor that tolerates both
//! snake_case and camelCase keys.

pub mod announcement;
pub mod auth;
pub mod course;
pub mod enrollment;
pub mod live_class;
pub mod media;
pub mod notification;
pub mod quiz;

pub use announcement::{Announcement, AttachmentFile, Attachments};
pub use auth::{Role, User};
pub use course::{Course, Lesson};
pub use enrollment::{course_completion, Enrollment, EnrollmentStatus, LessonProgress};
pub use live_class::{
    meeting_url, room_name, ChatMessage, LiveClass, LiveClassStatus, Participant, ParticipantStatus,
};
pub use media::{MediaCategory, MediaKind, UploadedMedia};
pub use notification::{unread_count, Notification};
pub use quiz::{Quiz, QuizAttempt, QuizQuestion};
