// src/models/settings.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Algebra,
    Calculus,
    Geometry,
    Trigonometry,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Algebra => "algebra",
            QuestionType::Calculus => "calculus",
            QuestionType::Geometry => "geometry",
            QuestionType::Trigonometry => "trigonometry",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "algebra" => Ok(QuestionType::Algebra),
            "calculus" => Ok(QuestionType::Calculus),
            "geometry" => Ok(QuestionType::Geometry),
            "trigonometry" => Ok(QuestionType::Trigonometry),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

/// The parameters a question is generated from.
/// Two settings are "the same" only when every field, optional ones included, is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionSettings {
    pub difficulty: Difficulty,

    /// Mapped from the JSON field 'type' since `type` is a reserved keyword in Rust.
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_type: Option<String>,
}

/// DTO for the settings form.
///
/// The form uses the string `"none"` for "not selected"; that sentinel (and blank input)
/// is turned into `None` here and never reaches `QuestionSettings`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateQuestionRequest {
    pub difficulty: Difficulty,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    #[serde(default, deserialize_with = "none_sentinel")]
    #[validate(length(min = 1, max = 50))]
    pub student_class: Option<String>,

    #[serde(default, deserialize_with = "none_sentinel")]
    #[validate(length(min = 1, max = 50))]
    pub exam_type: Option<String>,
}

impl From<GenerateQuestionRequest> for QuestionSettings {
    fn from(req: GenerateQuestionRequest) -> Self {
        Self {
            difficulty: req.difficulty,
            question_type: req.question_type,
            student_class: req.student_class,
            exam_type: req.exam_type,
        }
    }
}

fn none_sentinel<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none")))
}
