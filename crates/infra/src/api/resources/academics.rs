//! Courses, lessons, quizzes, enrollments and progress

use std::collections::BTreeMap;

use mentiq_domain::utils::payload::normalize_list;
use mentiq_domain::{
    course_completion, Course, Enrollment, Lesson, LessonProgress, Quiz, QuizAttempt, QuizQuestion,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::{course_query, segment};
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;

/// Body of `POST /v1/courses/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewCourse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

/// Body of `PUT /v1/courses/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

/// Body of `POST /v1/lessons/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewLesson {
    pub course: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub sequence_number: u64,
}

/// Body of `PUT /v1/lessons/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct LessonChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
}

/// Body of `POST /v1/quizzes/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewQuiz {
    pub course: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_questions: u64,
    pub passing_score: u64,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u64>,
}

/// Body of `PUT /v1/quizzes/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuizChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u64>,
}

/// Body of `POST /v1/quizzes/{id}/questions/`
#[derive(Debug, Clone, Serialize)]
pub struct NewQuestion {
    pub question_text: String,
    /// `multiple_choice`, `true_false` or `short_answer`
    pub question_type: String,
    /// Encoded option list for multiple choice questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    pub correct_answer: String,
    pub sequence_number: u64,
}

/// `/v1/courses/*`
#[derive(Debug, Clone)]
pub struct CoursesApi {
    client: ApiClient,
}

impl CoursesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Course>, ApiError> {
        let raw: Value = self.client.get("/v1/courses/").await?;
        let courses = normalize_list(&raw, Course::from_payload);
        debug!(count = courses.len(), "courses listed");
        Ok(courses)
    }

    pub async fn get(&self, id: &str) -> Result<Course, ApiError> {
        let raw: Value = self.client.get(&format!("/v1/courses/{}/", segment(id))).await?;
        Ok(Course::from_payload(&raw))
    }

    #[instrument(skip(self, course), fields(title = %course.title))]
    pub async fn create(&self, course: &NewCourse) -> Result<Value, ApiError> {
        self.client.post("/v1/courses/", course).await
    }

    pub async fn update(&self, id: &str, changes: &CourseChanges) -> Result<Value, ApiError> {
        self.client.put(&format!("/v1/courses/{}/", segment(id)), changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.client.delete(&format!("/v1/courses/{}/", segment(id))).await?;
        Ok(())
    }
}

/// `/v1/lessons/*`
#[derive(Debug, Clone)]
pub struct LessonsApi {
    client: ApiClient,
}

impl LessonsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lessons, optionally only those of one course
    pub async fn list(&self, course_id: Option<&str>) -> Result<Vec<Lesson>, ApiError> {
        let endpoint = format!("/v1/lessons/{}", course_query(course_id));
        let raw: Value = self.client.get(&endpoint).await?;
        Ok(normalize_list(&raw, Lesson::from_payload))
    }

    pub async fn get(&self, id: &str) -> Result<Lesson, ApiError> {
        let raw: Value = self.client.get(&format!("/v1/lessons/{}/", segment(id))).await?;
        Ok(Lesson::from_payload(&raw))
    }

    pub async fn create(&self, lesson: &NewLesson) -> Result<Value, ApiError> {
        self.client.post("/v1/lessons/", lesson).await
    }

    pub async fn update(&self, id: &str, changes: &LessonChanges) -> Result<Value, ApiError> {
        self.client.put(&format!("/v1/lessons/{}/", segment(id)), changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.client.delete(&format!("/v1/lessons/{}/", segment(id))).await?;
        Ok(())
    }

    /// Persist a new lesson order
    pub async fn reorder(&self, lesson_ids: &[String]) -> Result<Value, ApiError> {
        self.client.post("/v1/lessons/reorder/", &json!({ "lesson_ids": lesson_ids })).await
    }
}

/// `/v1/quizzes/*`
#[derive(Debug, Clone)]
pub struct QuizzesApi {
    client: ApiClient,
}

impl QuizzesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, course_id: Option<&str>) -> Result<Vec<Quiz>, ApiError> {
        let endpoint = format!("/v1/quizzes/{}", course_query(course_id));
        let raw: Value = self.client.get(&endpoint).await?;
        Ok(normalize_list(&raw, Quiz::from_payload))
    }

    pub async fn get(&self, id: &str) -> Result<Quiz, ApiError> {
        let raw: Value = self.client.get(&format!("/v1/quizzes/{}/", segment(id))).await?;
        Ok(Quiz::from_payload(&raw))
    }

    pub async fn create(&self, quiz: &NewQuiz) -> Result<Value, ApiError> {
        self.client.post("/v1/quizzes/", quiz).await
    }

    pub async fn update(&self, id: &str, changes: &QuizChanges) -> Result<Value, ApiError> {
        self.client.put(&format!("/v1/quizzes/{}/", segment(id)), changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.client.delete(&format!("/v1/quizzes/{}/", segment(id))).await?;
        Ok(())
    }

    pub async fn questions(&self, quiz_id: &str) -> Result<Vec<QuizQuestion>, ApiError> {
        let endpoint = format!("/v1/quizzes/{}/questions/", segment(quiz_id));
        let raw: Value = self.client.get(&endpoint).await?;
        Ok(normalize_list(&raw, QuizQuestion::from_payload))
    }

    pub async fn add_question(
        &self,
        quiz_id: &str,
        question: &NewQuestion,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("/v1/quizzes/{}/questions/", segment(quiz_id));
        self.client.post(&endpoint, question).await
    }

    /// Submit answers keyed by question id
    #[instrument(skip(self, answers), fields(answers = answers.len()))]
    pub async fn submit(
        &self,
        quiz_id: &str,
        answers: &BTreeMap<String, String>,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("/v1/quizzes/{}/submit/", segment(quiz_id));
        self.client.post(&endpoint, &json!({ "answers": answers })).await
    }

    pub async fn attempts(&self, quiz_id: &str) -> Result<Vec<QuizAttempt>, ApiError> {
        let endpoint = format!("/v1/quizzes/{}/attempts/", segment(quiz_id));
        let raw: Value = self.client.get(&endpoint).await?;
        Ok(normalize_list(&raw, QuizAttempt::from_payload))
    }
}

/// `/v1/enrollments/*`
#[derive(Debug, Clone)]
pub struct EnrollmentsApi {
    client: ApiClient,
}

impl EnrollmentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn enroll(&self, course_id: &str) -> Result<Value, ApiError> {
        self.client.post("/v1/enrollments/enroll/", &json!({ "course_id": course_id })).await
    }

    pub async fn unenroll(&self, course_id: &str) -> Result<Value, ApiError> {
        self.client.post("/v1/enrollments/unenroll/", &json!({ "course_id": course_id })).await
    }

    /// The enrollment in `course_id`, if the student has one
    pub async fn status(&self, course_id: &str) -> Result<Option<Enrollment>, ApiError> {
        let endpoint = format!("/v1/enrollments/status/{}/", segment(course_id));
        let raw: Value = self.client.get(&endpoint).await?;
        Ok(Enrollment::from_status(&raw))
    }
}

/// Course progress: completion percentage plus per-lesson entries
#[derive(Debug, Clone, PartialEq)]
pub struct CourseProgress {
    pub completion_percentage: f64,
    pub lessons: Vec<LessonProgress>,
}

/// `/v1/progress/*`
#[derive(Debug, Clone)]
pub struct ProgressApi {
    client: ApiClient,
}

impl ProgressApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn complete_lesson(&self, lesson_id: &str) -> Result<Value, ApiError> {
        self.client.post("/v1/progress/complete/", &json!({ "lesson_id": lesson_id })).await
    }

    pub async fn course(&self, course_id: &str) -> Result<CourseProgress, ApiError> {
        let endpoint = format!("/v1/progress/course/{}/", segment(course_id));
        let raw: Value = self.client.get(&endpoint).await?;
        Ok(CourseProgress {
            completion_percentage: course_completion(&raw),
            lessons: LessonProgress::list_from_course_progress(&raw),
        })
    }
}
