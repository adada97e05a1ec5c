// src/models/question.rs

use serde::{Deserialize, Serialize};

/// A multiple-choice question produced by the generator.
/// At least one option is equivalent to `answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,

    /// A bare numeric or symbolic token (e.g. "12", "-3", "2x+5"), never prose.
    pub answer: String,

    pub options: Vec<String>,

    pub explanation: String,
}

/// Shape of the collaborator's structured output before local clean-up.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
    pub explanation: String,
}
