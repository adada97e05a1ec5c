// src/services/analyzer.rs

use std::sync::Arc;

use crate::{
    config::SUGGESTION_MAX_CHARS,
    error::AppError,
    models::{
        analysis::{ActivityRecord, AnalysisResult, RawAnalysis},
        settings::{Difficulty, QuestionType},
    },
    utils::text::truncate_with_ellipsis,
};

use super::{llm::TextGenerator, prompts::analysis_prompt};

/// Turns the attempt history into a natural-language performance review.
#[derive(Clone)]
pub struct PerformanceAnalyzer {
    backend: Arc<dyn TextGenerator>,
}

impl PerformanceAnalyzer {
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    pub async fn analyze(
        &self,
        history: &[ActivityRecord],
        desired_focus: Option<&str>,
    ) -> Result<AnalysisResult, AppError> {
        if history.is_empty() {
            return Ok(not_enough_activity());
        }

        let prompt = analysis_prompt(history, desired_focus);

        let output = self
            .backend
            .generate_structured(&prompt)
            .await
            .map_err(|e| AppError::AnalysisFailure(e.to_string()))?
            .ok_or_else(|| AppError::AnalysisFailure("no structured output".to_string()))?;

        let raw: RawAnalysis = serde_json::from_value(output)
            .map_err(|e| AppError::AnalysisFailure(format!("unexpected output shape: {}", e)))?;

        tracing::info!("Analyzed {} activity records", history.len());

        Ok(finalize(raw))
    }
}

/// Canned answer for an empty history; no external call is made.
pub fn not_enough_activity() -> AnalysisResult {
    AnalysisResult {
        summary: "Not enough activity yet. Answer a few questions to get a personalized analysis."
            .to_string(),
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        suggestions: vec!["Start with an easy question to warm up.".to_string()],
        suggested_next_difficulty: None,
        suggested_next_type: None,
    }
}

fn finalize(raw: RawAnalysis) -> AnalysisResult {
    let suggested_next_difficulty = raw.suggested_next_difficulty.and_then(|s| {
        s.parse::<Difficulty>()
            .map_err(|e| tracing::debug!("Dropping suggested difficulty: {}", e))
            .ok()
    });
    let suggested_next_type = raw.suggested_next_type.and_then(|s| {
        s.parse::<QuestionType>()
            .map_err(|e| tracing::debug!("Dropping suggested type: {}", e))
            .ok()
    });

    AnalysisResult {
        summary: raw.summary.trim().to_string(),
        strengths: raw.strengths,
        weaknesses: raw.weaknesses,
        suggestions: raw
            .suggestions
            .iter()
            .map(|s| truncate_with_ellipsis(s, SUGGESTION_MAX_CHARS))
            .collect(),
        suggested_next_difficulty,
        suggested_next_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm::StructuredPrompt;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        output: Option<Value>,
    }

    #[async_trait]
    impl TextGenerator for Counting {
        async fn generate_structured(&self, _: &StructuredPrompt) -> Result<Option<Value>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    fn record() -> ActivityRecord {
        ActivityRecord {
            question: "d/dx x^2".to_string(),
            difficulty: Difficulty::Medium,
            question_type: QuestionType::Calculus,
            user_answer: Some("x".to_string()),
            correct_answer: "2x".to_string(),
            is_correct: false,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn empty_history_short_circuits() {
        let backend = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            output: None,
        });
        let analyzer = PerformanceAnalyzer::new(backend.clone());

        let result = analyzer.analyze(&[], Some("calculus")).await.unwrap();
        assert_eq!(result, not_enough_activity());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn long_suggestions_are_truncated() {
        let long = "x".repeat(151);
        let backend = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            output: Some(json!({
                "summary": " Solid algebra, shaky derivatives. ",
                "strengths": ["algebra"],
                "weaknesses": ["power rule"],
                "suggestions": [long, "Review the power rule."],
                "suggested_next_difficulty": "Easy",
                "suggested_next_type": "statistics"
            })),
        });
        let analyzer = PerformanceAnalyzer::new(backend.clone());

        let result = analyzer.analyze(&[record()], None).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.summary, "Solid algebra, shaky derivatives.");
        assert_eq!(result.suggestions[0].chars().count(), 150);
        assert!(result.suggestions[0].ends_with("..."));
        assert_eq!(result.suggestions[1], "Review the power rule.");
        assert_eq!(result.suggested_next_difficulty, Some(Difficulty::Easy));
        assert_eq!(result.suggested_next_type, None);
    }

    #[tokio::test]
    async fn missing_output_is_analysis_failure() {
        let analyzer = PerformanceAnalyzer::new(Arc::new(Counting {
            calls: AtomicUsize::new(0),
            output: None,
        }));
        let err = analyzer.analyze(&[record()], None).await.unwrap_err();
        assert!(matches!(err, AppError::AnalysisFailure(_)));
    }
}
