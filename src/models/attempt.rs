// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{question::GeneratedQuestion, settings::QuestionSettings};

/// One displayed question plus the user's eventual answer.
/// `user_answer` and `is_correct` are set together, exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub settings: QuestionSettings,

    pub question: GeneratedQuestion,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,

    pub timestamp: DateTime<Utc>,
}

impl Attempt {
    pub fn new(settings: QuestionSettings, question: GeneratedQuestion, timestamp: DateTime<Utc>) -> Self {
        Self {
            settings,
            question,
            user_answer: None,
            is_correct: None,
            timestamp,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.is_correct.is_some()
    }
}

/// DTO for submitting an answer to the current attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub answer: String,
}
