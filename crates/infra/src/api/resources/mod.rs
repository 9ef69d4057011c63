//! Endpoint tables of the Mentiq backend
//!
//! One facade per backend area. Facades are thin: they pick the verb and the
//! path, serialize the body, and normalize list and record payloads into the
//! view models of `mentiq_domain::types`. Free-form payloads (dashboards,
//! analytics, payments) are returned as JSON.

use std::borrow::Cow;

use urlencoding::encode;

use super::client::ApiClient;

pub mod academics;
pub mod account;
pub mod communication;
pub mod live_classes;
pub mod media;
pub mod platform;

pub use academics::{
    CourseChanges, CourseProgress, CoursesApi, EnrollmentsApi, LessonChanges, LessonsApi,
    NewCourse, NewLesson, NewQuestion, NewQuiz, ProgressApi, QuizChanges, QuizzesApi,
};
pub use account::{AuthApi, ProfileChanges, Registration, StudentsApi, TeachersApi};
pub use communication::{
    AnnouncementChanges, AnnouncementsApi, NewAnnouncement, NotificationsApi,
};
pub use live_classes::{LiveClassChanges, LiveClassesApi, NewLiveClass};
pub use media::{upload_form, MediaApi};
pub use platform::{AnalyticsApi, HealthApi, PaymentsApi};

/// Escape an id for use as one path segment
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    encode(id)
}

/// `?course_id=<id>` when a course filter is given
pub(crate) fn course_query(course_id: Option<&str>) -> String {
    match course_id.filter(|id| !id.is_empty()) {
        Some(id) => format!("?course_id={}", encode(id)),
        None => String::new(),
    }
}

/// Every facade over one shared client
#[derive(Debug, Clone)]
pub struct ApiResources {
    pub health: HealthApi,
    pub auth: AuthApi,
    pub students: StudentsApi,
    pub teachers: TeachersApi,
    pub courses: CoursesApi,
    pub lessons: LessonsApi,
    pub quizzes: QuizzesApi,
    pub enrollments: EnrollmentsApi,
    pub progress: ProgressApi,
    pub live_classes: LiveClassesApi,
    pub announcements: AnnouncementsApi,
    pub notifications: NotificationsApi,
    pub payments: PaymentsApi,
    pub analytics: AnalyticsApi,
    pub media: MediaApi,
}

impl ApiResources {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            health: HealthApi::new(client.clone()),
            auth: AuthApi::new(client.clone()),
            students: StudentsApi::new(client.clone()),
            teachers: TeachersApi::new(client.clone()),
            courses: CoursesApi::new(client.clone()),
            lessons: LessonsApi::new(client.clone()),
            quizzes: QuizzesApi::new(client.clone()),
            enrollments: EnrollmentsApi::new(client.clone()),
            progress: ProgressApi::new(client.clone()),
            live_classes: LiveClassesApi::new(client.clone()),
            announcements: AnnouncementsApi::new(client.clone()),
            notifications: NotificationsApi::new(client.clone()),
            payments: PaymentsApi::new(client.clone()),
            analytics: AnalyticsApi::new(client.clone()),
            media: MediaApi::new(client.clone()),
        }
    }
}
