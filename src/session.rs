// src/session.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    config::{HISTORY_KEY, PROFILE_KEY},
    error::AppError,
    models::{
        analysis::ActivityRecord,
        attempt::Attempt,
        profile::{ProfileResponse, UserProfile},
        question::GeneratedQuestion,
        settings::QuestionSettings,
    },
    storage::SessionStore,
    utils::answer::equivalent,
};

/// A speculatively generated next question and the settings it was made for.
#[derive(Debug, Clone)]
struct Preload {
    settings: QuestionSettings,
    question: GeneratedQuestion,
}

/// The single quiz session: attempt history, a cursor into it, the profile,
/// and the preload slot.
///
/// Only `start_attempt`, `submit` and the preload methods mutate it; navigation
/// only moves the cursor.
#[derive(Debug, Default)]
pub struct QuizSession {
    history: Vec<Attempt>,
    cursor: Option<usize>,
    profile: UserProfile,
    preload: Option<Preload>,
    preload_in_flight: bool,
}

/// Snapshot of the session as the front-end renders it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub current: Option<Attempt>,
    pub cursor: Option<usize>,
    pub total_attempts: usize,
    pub is_viewing_history: bool,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub can_answer: bool,
    pub preload_ready: bool,
    pub profile: UserProfile,
}

impl QuizSession {
    pub fn new(history: Vec<Attempt>, mut profile: UserProfile, today: NaiveDate) -> Self {
        profile.decay_streak(today);
        let cursor = history.len().checked_sub(1);
        Self {
            history,
            cursor,
            profile,
            preload: None,
            preload_in_flight: false,
        }
    }

    /// Loads history and profile from `store`.
    ///
    /// Unreadable or malformed entries are logged, returned as notices, and replaced
    /// with defaults so the app stays usable.
    pub async fn hydrate(store: &dyn SessionStore, today: NaiveDate) -> (Self, Vec<AppError>) {
        let mut notices = Vec::new();

        let profile: UserProfile = load_or_default(store, PROFILE_KEY, &mut notices).await;
        let history: Vec<Attempt> = load_or_default(store, HISTORY_KEY, &mut notices).await;

        tracing::info!(
            "Hydrated session: {} attempts, streak {}",
            history.len(),
            profile.streak
        );

        (Self::new(history, profile, today), notices)
    }

    /// Serializes history and profile to `store`.
    pub async fn persist(&self, store: &dyn SessionStore) -> Result<(), AppError> {
        let profile = serde_json::to_string(&self.profile)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        let history = serde_json::to_string(&self.history)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        store.write(PROFILE_KEY, &profile).await?;
        store.write(HISTORY_KEY, &history).await?;
        Ok(())
    }

    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn current(&self) -> Option<&Attempt> {
        self.cursor.and_then(|i| self.history.get(i))
    }

    fn latest_index(&self) -> Option<usize> {
        self.history.len().checked_sub(1)
    }

    fn is_at_latest(&self) -> bool {
        self.cursor.is_some() && self.cursor == self.latest_index()
    }

    /// Settings of the newest attempt, used for the next preload.
    pub fn latest_settings(&self) -> Option<&QuestionSettings> {
        self.history.last().map(|a| &a.settings)
    }

    /// Appends a freshly displayed question and moves the cursor to it.
    pub fn start_attempt(
        &mut self,
        settings: QuestionSettings,
        question: GeneratedQuestion,
        now: DateTime<Utc>,
    ) -> &Attempt {
        self.history.push(Attempt::new(settings, question, now));
        let idx = self.history.len() - 1;
        self.cursor = Some(idx);
        &self.history[idx]
    }

    /// Grades `user_answer` against the current attempt and records it.
    ///
    /// Only the latest attempt can be answered, and only once.
    pub fn submit(&mut self, user_answer: &str, today: NaiveDate) -> Result<&Attempt, AppError> {
        let user_answer = user_answer.trim();
        if user_answer.is_empty() {
            return Err(AppError::Validation("Please select an answer".to_string()));
        }

        let idx = self
            .cursor
            .ok_or_else(|| AppError::NotFound("No question to answer".to_string()))?;

        if !self.is_at_latest() {
            return Err(AppError::Conflict(
                "Previous questions cannot be answered".to_string(),
            ));
        }

        let attempt = &mut self.history[idx];
        if attempt.is_answered() {
            return Err(AppError::Conflict(
                "This question has already been answered".to_string(),
            ));
        }

        let is_correct = equivalent(user_answer, &attempt.question.answer);
        attempt.user_answer = Some(user_answer.to_string());
        attempt.is_correct = Some(is_correct);

        self.profile.record_answer(today);

        tracing::info!(
            "Answer recorded: correct={} streak={} answered={}",
            is_correct,
            self.profile.streak,
            self.profile.questions_answered
        );

        Ok(&self.history[idx])
    }

    /// Moves the cursor one attempt back; stays put at the first attempt.
    pub fn previous(&mut self) -> Option<&Attempt> {
        if let Some(i) = self.cursor {
            self.cursor = Some(i.saturating_sub(1));
        }
        self.current()
    }

    /// Moves the cursor one attempt forward; stays put at the latest attempt.
    pub fn next(&mut self) -> Option<&Attempt> {
        if let (Some(i), Some(last)) = (self.cursor, self.latest_index()) {
            self.cursor = Some((i + 1).min(last));
        }
        self.current()
    }

    /// Jumps back to the newest attempt without touching its state.
    pub fn latest(&mut self) -> Option<&Attempt> {
        self.cursor = self.latest_index();
        self.current()
    }

    /// Takes the cached preload if it was made for exactly `settings`.
    /// A preload for any other settings is stale and dropped.
    pub fn take_preload(&mut self, settings: &QuestionSettings) -> Option<GeneratedQuestion> {
        match self.preload.take() {
            Some(p) if &p.settings == settings => Some(p.question),
            Some(p) => {
                tracing::debug!(
                    "Discarding preload for {}/{}: settings changed",
                    p.settings.difficulty,
                    p.settings.question_type
                );
                None
            }
            None => None,
        }
    }

    /// Claims the preload guard. Returns `false` if a preload is already running
    /// or a usable one for `settings` is already cached.
    pub fn begin_preload(&mut self, settings: &QuestionSettings) -> bool {
        if self.preload_in_flight {
            return false;
        }
        if self.preload.as_ref().is_some_and(|p| &p.settings == settings) {
            return false;
        }
        self.preload_in_flight = true;
        true
    }

    /// Releases the preload guard and caches a successful result.
    pub fn finish_preload(
        &mut self,
        settings: QuestionSettings,
        result: Result<GeneratedQuestion, AppError>,
    ) {
        self.preload_in_flight = false;
        match result {
            Ok(question) => self.preload = Some(Preload { settings, question }),
            Err(e) => {
                tracing::warn!("Preload failed, nothing cached: {}", e);
                self.preload = None;
            }
        }
    }

    /// Answered attempts in chronological order, as analyzer input.
    pub fn activity(&self) -> Vec<ActivityRecord> {
        self.history
            .iter()
            .filter_map(ActivityRecord::from_attempt)
            .collect()
    }

    pub fn view(&self) -> SessionView {
        let current = self.current().cloned();
        let at_latest = self.is_at_latest();
        SessionView {
            can_answer: at_latest && current.as_ref().is_some_and(|a| !a.is_answered()),
            current,
            cursor: self.cursor,
            total_attempts: self.history.len(),
            is_viewing_history: self.cursor.is_some() && !at_latest,
            can_go_previous: self.cursor.is_some_and(|i| i > 0),
            can_go_next: self.cursor.is_some() && !at_latest,
            preload_ready: self.preload.is_some(),
            profile: self.profile.clone(),
        }
    }

    pub fn profile_summary(&self) -> ProfileResponse {
        let answered = self.history.iter().filter(|a| a.is_answered()).count();
        let correct = self
            .history
            .iter()
            .filter(|a| a.is_correct == Some(true))
            .count();
        let accuracy = if answered == 0 {
            0.0
        } else {
            correct as f64 / answered as f64
        };

        ProfileResponse {
            profile: self.profile.clone(),
            attempts: self.history.len(),
            correct_answers: correct,
            accuracy,
        }
    }
}

async fn load_or_default<T>(store: &dyn SessionStore, key: &str, notices: &mut Vec<AppError>) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    let raw = match store.read(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!("Could not read '{}', starting fresh: {}", key, e);
            notices.push(e);
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring malformed '{}': {}", key, e);
            notices.push(AppError::Hydration(format!("malformed '{}': {}", key, e)));
            T::default()
        }
    }
}
