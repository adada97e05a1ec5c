// src/models/analysis.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    attempt::Attempt,
    settings::{Difficulty, QuestionType},
};

/// One answered question as presented to the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub question: String,
    pub difficulty: Difficulty,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

impl ActivityRecord {
    /// Builds a record from an answered attempt; unanswered attempts yield `None`.
    pub fn from_attempt(attempt: &Attempt) -> Option<Self> {
        let is_correct = attempt.is_correct?;
        Some(Self {
            question: attempt.question.question.clone(),
            difficulty: attempt.settings.difficulty,
            question_type: attempt.settings.question_type,
            user_answer: attempt.user_answer.clone(),
            correct_answer: attempt.question.answer.clone(),
            is_correct,
            timestamp: attempt.timestamp,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_next_difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_next_type: Option<QuestionType>,
}

/// Shape of the collaborator's structured output.
/// The recommendation fields stay strings here and are parsed leniently.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnalysis {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub suggested_next_difficulty: Option<String>,
    #[serde(default)]
    pub suggested_next_type: Option<String>,
}

/// DTO for the "end & analyze" action.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub desired_focus: Option<String>,
}
