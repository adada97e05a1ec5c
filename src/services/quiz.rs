// src/services/quiz.rs

use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::{
    error::AppError,
    models::{
        analysis::AnalysisResult, attempt::Attempt, profile::ProfileResponse,
        settings::QuestionSettings,
    },
    session::{QuizSession, SessionView},
    storage::SessionStore,
};

use super::{analyzer::PerformanceAnalyzer, generator::QuestionGenerator};

/// Drives the quiz session: every transition goes through here, and every
/// transition that changes history or profile is flushed to the store.
///
/// The session lock is never held while waiting on the text-generation backend.
#[derive(Clone)]
pub struct QuizService {
    session: Arc<Mutex<QuizSession>>,
    store: Arc<dyn SessionStore>,
    generator: QuestionGenerator,
    analyzer: PerformanceAnalyzer,
}

impl QuizService {
    pub fn new(
        session: QuizSession,
        store: Arc<dyn SessionStore>,
        generator: QuestionGenerator,
        analyzer: PerformanceAnalyzer,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            store,
            generator,
            analyzer,
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub async fn view(&self) -> SessionView {
        self.session.lock().await.view()
    }

    pub async fn history(&self) -> Vec<Attempt> {
        self.session.lock().await.history().to_vec()
    }

    pub async fn profile(&self) -> ProfileResponse {
        self.session.lock().await.profile_summary()
    }

    /// Shows a new question for `settings`, reusing a matching preload when there is one.
    pub async fn generate(&self, settings: QuestionSettings) -> Result<SessionView, AppError> {
        let cached = self.session.lock().await.take_preload(&settings);

        let question = match cached {
            Some(question) => {
                tracing::info!("Using preloaded question");
                question
            }
            None => self.generator.generate(&settings).await?,
        };

        let mut session = self.session.lock().await;
        session.start_attempt(settings, question, Utc::now());
        self.flush(&session).await;
        Ok(session.view())
    }

    /// Grades the answer to the current question, then preloads the next one
    /// in the background with the same settings.
    pub async fn submit(&self, answer: &str) -> Result<SessionView, AppError> {
        let (view, preload_settings) = {
            let mut session = self.session.lock().await;
            let settings = session.submit(answer, Self::today())?.settings.clone();
            self.flush(&session).await;
            (session.view(), settings)
        };

        let service = self.clone();
        tokio::spawn(async move {
            service.preload(preload_settings).await;
        });

        Ok(view)
    }

    /// Generates and caches a question for `settings` unless a preload is already
    /// running or cached. Returns whether a request was made.
    pub async fn preload(&self, settings: QuestionSettings) -> bool {
        if !self.session.lock().await.begin_preload(&settings) {
            tracing::debug!("Preload skipped: one is already running or cached");
            return false;
        }

        let result = self.generator.generate(&settings).await;
        if result.is_ok() {
            tracing::debug!("Preloaded next {} {} question", settings.difficulty, settings.question_type);
        }
        self.session.lock().await.finish_preload(settings, result);
        true
    }

    pub async fn previous(&self) -> SessionView {
        let mut session = self.session.lock().await;
        session.previous();
        session.view()
    }

    pub async fn next(&self) -> SessionView {
        let mut session = self.session.lock().await;
        session.next();
        session.view()
    }

    pub async fn latest(&self) -> SessionView {
        let mut session = self.session.lock().await;
        session.latest();
        session.view()
    }

    /// Analyzes every answered attempt so far.
    pub async fn analyze(&self, desired_focus: Option<&str>) -> Result<AnalysisResult, AppError> {
        let activity = self.session.lock().await.activity();
        self.analyzer.analyze(&activity, desired_focus).await
    }

    /// Write failures are logged, never surfaced: the in-memory session stays authoritative.
    async fn flush(&self, session: &QuizSession) {
        if let Err(e) = session.persist(self.store.as_ref()).await {
            tracing::error!("Failed to persist session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{HISTORY_KEY, PROFILE_KEY},
        models::settings::{Difficulty, QuestionType},
        services::llm::{StructuredPrompt, TextGenerator},
        storage::MemoryStore,
    };
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every question with "7" and counts requests.
    #[derive(Default)]
    struct Sevens {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for Sevens {
        async fn generate_structured(&self, _: &StructuredPrompt) -> Result<Option<Value>, AppError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(json!({
                "question": format!("Question #{}: what is 3 + 4?", n),
                "answer": "7",
                "options": ["5", "6", "7", "8"],
                "explanation": "3 + 4 = 7"
            })))
        }
    }

    fn settings(difficulty: Difficulty) -> QuestionSettings {
        QuestionSettings {
            difficulty,
            question_type: QuestionType::Algebra,
            student_class: None,
            exam_type: None,
        }
    }

    fn service() -> (QuizService, Arc<Sevens>, Arc<MemoryStore>) {
        let backend = Arc::new(Sevens::default());
        let store = Arc::new(MemoryStore::new());
        let service = QuizService::new(
            QuizSession::default(),
            store.clone(),
            QuestionGenerator::new(backend.clone()),
            PerformanceAnalyzer::new(backend.clone()),
        );
        (service, backend, store)
    }

    #[tokio::test]
    async fn matching_preload_is_reused_without_a_request() {
        let (service, backend, _) = service();
        let s1 = settings(Difficulty::Easy);

        assert!(service.preload(s1.clone()).await);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        let view = service.generate(s1).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            view.current.unwrap().question.question,
            "Question #0: what is 3 + 4?"
        );
        assert!(!view.preload_ready);
    }

    #[tokio::test]
    async fn preload_for_other_settings_is_discarded() {
        let (service, backend, _) = service();
        let s1 = settings(Difficulty::Easy);
        let s2 = settings(Difficulty::Hard);

        service.preload(s1.clone()).await;
        let view = service.generate(s2.clone()).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(view.current.unwrap().settings, s2);
        assert!(!view.preload_ready);

        // The S1 preload is gone, so S1 needs a fresh request too.
        service.generate(s1).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn submit_persists_and_preloads_next_question() {
        let (service, backend, store) = service();
        service.generate(settings(Difficulty::Medium)).await.unwrap();

        let view = service.submit("7.0").await.unwrap();
        let current = view.current.unwrap();
        assert_eq!(current.is_correct, Some(true));
        assert_eq!(view.profile.questions_answered, 1);
        assert_eq!(view.profile.streak, 1);

        let history = store.read(HISTORY_KEY).await.unwrap().unwrap();
        assert!(history.contains("\"is_correct\":true"));
        assert!(store.read(PROFILE_KEY).await.unwrap().is_some());

        for _ in 0..100 {
            if service.view().await.preload_ready {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(service.view().await.preload_ready);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);

        service.generate(settings(Difficulty::Medium)).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn double_submit_is_rejected() {
        let (service, _, _) = service();
        service.generate(settings(Difficulty::Easy)).await.unwrap();
        service.submit("5").await.unwrap();

        let err = service.submit("7").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let current = service.view().await.current.unwrap();
        assert_eq!(current.user_answer.as_deref(), Some("5"));
        assert_eq!(current.is_correct, Some(false));
    }

    #[tokio::test]
    async fn analyze_with_no_answers_makes_no_request() {
        let (service, backend, _) = service();
        let result = service.analyze(None).await.unwrap();
        assert!(result.summary.starts_with("Not enough activity"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
