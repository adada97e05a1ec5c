// src/services/generator.rs

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{
    config::OPTION_COUNT,
    error::AppError,
    models::{
        question::{GeneratedQuestion, RawQuestion},
        settings::QuestionSettings,
    },
    utils::{answer::equivalent, text::clean_answer},
};

use super::{llm::TextGenerator, prompts::question_prompt};

/// Asks the collaborator for a question and cleans up what comes back.
#[derive(Clone)]
pub struct QuestionGenerator {
    backend: Arc<dyn TextGenerator>,
}

impl QuestionGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    /// Generates one question for `settings`. No retry: the caller decides.
    pub async fn generate(&self, settings: &QuestionSettings) -> Result<GeneratedQuestion, AppError> {
        let prompt = question_prompt(settings);

        let output = self
            .backend
            .generate_structured(&prompt)
            .await
            .map_err(|e| AppError::GenerationFailure(e.to_string()))?
            .ok_or_else(|| AppError::GenerationFailure("no structured output".to_string()))?;

        let raw: RawQuestion = serde_json::from_value(output)
            .map_err(|e| AppError::GenerationFailure(format!("unexpected output shape: {}", e)))?;

        let question = postprocess(raw, &mut rand::thread_rng())?;

        tracing::info!(
            "Generated {} {} question",
            settings.difficulty,
            settings.question_type
        );

        Ok(question)
    }
}

/// Normalizes a raw question and guarantees the answer is among the options.
pub fn postprocess<R: Rng>(raw: RawQuestion, rng: &mut R) -> Result<GeneratedQuestion, AppError> {
    if raw.options.len() != OPTION_COUNT {
        return Err(AppError::GenerationFailure(format!(
            "expected {} options, got {}",
            OPTION_COUNT,
            raw.options.len()
        )));
    }

    let answer = clean_answer(&raw.answer);
    if answer.is_empty() {
        return Err(AppError::GenerationFailure("empty answer".to_string()));
    }

    let mut options: Vec<String> = raw.options.iter().map(|o| o.trim().to_string()).collect();

    if !options.iter().any(|o| equivalent(o, &answer)) {
        tracing::debug!("Answer '{}' missing from options, inserting it", answer);

        let mut idx = rng.gen_range(0..options.len());
        if options[idx] == answer {
            idx = (idx + 1) % options.len();
        }
        options[idx] = answer.clone();
        options.shuffle(rng);
    }

    Ok(GeneratedQuestion {
        question: raw.question.trim().to_string(),
        answer,
        options,
        explanation: raw.explanation.trim().to_string(),
    })
}
