//! Quizzes, questions and attempts

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::payload::{
    f64_or_zero, field, id_string, opt_string, opt_u64, string_or_empty, u64_or_zero,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub course_id: Option<String>,
    pub title: String,
    pub description: String,
    pub total_questions: u64,
    pub passing_score: u64,
    /// Minutes; `None` means untimed
    pub time_limit: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Quiz {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: id_string(raw),
            course_id: opt_string(raw, &["course_id", "courseId", "course"]),
            title: string_or_empty(raw, &["title"]),
            description: string_or_empty(raw, &["description"]),
            total_questions: u64_or_zero(raw, &["total_questions", "totalQuestions"]),
            passing_score: u64_or_zero(raw, &["passing_score", "passingScore"]),
            time_limit: opt_u64(raw, &["time_limit", "timeLimit"]),
            created_at: opt_string(raw, &["created_at", "createdAt"]),
            updated_at: opt_string(raw, &["updated_at", "updatedAt"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub quiz_id: Option<String>,
    pub question_text: String,
    pub question_type: String,
    /// Options as sent by the backend (array or encoded string)
    pub options: Value,
    pub correct_answer: String,
    pub sequence_number: u64,
    pub created_at: Option<String>,
}

impl QuizQuestion {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: id_string(raw),
            quiz_id: opt_string(raw, &["quiz_id", "quizId", "quiz"]),
            question_text: string_or_empty(raw, &["question_text", "questionText"]),
            question_type: string_or_empty(raw, &["question_type", "questionType"]),
            options: field(raw, &["options"]).cloned().unwrap_or_else(|| Value::String(String::new())),
            correct_answer: string_or_empty(raw, &["correct_answer", "correctAnswer"]),
            sequence_number: u64_or_zero(raw, &["sequence_number", "sequenceNumber"]),
            created_at: opt_string(raw, &["created_at", "createdAt"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub student_id: Option<String>,
    pub quiz_id: Option<String>,
    pub score: f64,
    pub total_questions: u64,
    pub correct_answers: u64,
    pub attempted_at: Option<String>,
    /// Seconds
    pub time_spent: Option<u64>,
}

impl QuizAttempt {
    pub fn from_payload(raw: &Value) -> Self {
        Self {
            id: id_string(raw),
            student_id: opt_string(raw, &["student_id", "studentId", "student"]),
            quiz_id: opt_string(raw, &["quiz_id", "quizId", "quiz"]),
            score: f64_or_zero(raw, &["score"]),
            total_questions: u64_or_zero(raw, &["total_questions", "totalQuestions"]),
            correct_answers: u64_or_zero(raw, &["correct_answers", "correctAnswers"]),
            attempted_at: opt_string(raw, &["attempted_at", "attemptedAt"]),
            time_spent: opt_u64(raw, &["time_spent", "timeSpent"]),
        }
    }
}
