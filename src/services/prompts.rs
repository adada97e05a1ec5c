// src/services/prompts.rs

use serde_json::{Value, json};

use crate::models::{analysis::ActivityRecord, settings::QuestionSettings};

use super::llm::StructuredPrompt;

const QUESTION_SYSTEM: &str = "You are a math tutor writing multiple-choice practice questions. \
Reply with JSON only. Provide exactly 4 options. The answer must be a bare numeric or symbolic \
value (for example 12, -3/4, 2x+5, x^2), never a sentence, and it must appear verbatim among the options. \
Keep the explanation short and step by step.";

const ANALYSIS_SYSTEM: &str = "You are a math tutor reviewing a student's recent practice. \
Reply with JSON only. Summarize their performance in two or three sentences, list strengths and \
weaknesses by topic, and give short actionable suggestions (under 150 characters each). \
Recommend the next difficulty (easy, medium, hard) and type (algebra, calculus, geometry, trigonometry).";

pub fn question_prompt(settings: &QuestionSettings) -> StructuredPrompt {
    let mut user = format!(
        "Write one {} {} question.",
        settings.difficulty, settings.question_type
    );
    if let Some(class) = &settings.student_class {
        user.push_str(&format!(" The student is in class {}.", class));
    }
    if let Some(exam) = &settings.exam_type {
        user.push_str(&format!(" Match the style of the {} exam.", exam));
    }

    StructuredPrompt {
        name: "math_question",
        system: QUESTION_SYSTEM.to_string(),
        user,
        schema: question_schema(),
    }
}

pub fn analysis_prompt(history: &[ActivityRecord], desired_focus: Option<&str>) -> StructuredPrompt {
    let activity = serde_json::to_string(history).unwrap_or_else(|_| "[]".to_string());
    let mut user = format!("Recent activity (JSON): {}", activity);
    if let Some(focus) = desired_focus {
        user.push_str(&format!("\nThe student wants to focus on: {}", focus));
    }

    StructuredPrompt {
        name: "performance_analysis",
        system: ANALYSIS_SYSTEM.to_string(),
        user,
        schema: analysis_schema(),
    }
}

fn question_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "question": {"type": "string"},
            "answer": {"type": "string"},
            "options": {
                "type": "array",
                "items": {"type": "string"},
                "minItems": 4,
                "maxItems": 4
            },
            "explanation": {"type": "string"}
        },
        "required": ["question", "answer", "options", "explanation"],
        "additionalProperties": false
    })
}

fn analysis_schema() -> Value {
    let list = json!({"type": "array", "items": {"type": "string"}});
    json!({
        "type": "object",
        "properties": {
            "summary": {"type": "string"},
            "strengths": list,
            "weaknesses": list,
            "suggestions": list,
            "suggested_next_difficulty": {"type": ["string", "null"], "enum": ["easy", "medium", "hard", null]},
            "suggested_next_type": {
                "type": ["string", "null"],
                "enum": ["algebra", "calculus", "geometry", "trigonometry", null]
            }
        },
        "required": [
            "summary", "strengths", "weaknesses", "suggestions",
            "suggested_next_difficulty", "suggested_next_type"
        ],
        "additionalProperties": false
    })
}
