use std::sync::Arc;

use axum::extract::FromRef;

use crate::services::quiz::QuizService;

#[derive(Clone)]
pub struct AppState {
    pub quiz: QuizService,
    /// Problems met while restoring saved state at startup, shown as a non-blocking notice.
    pub hydration_notices: Arc<Vec<String>>,
}

impl FromRef<AppState> for QuizService {
    fn from_ref(state: &AppState) -> Self {
        state.quiz.clone()
    }
}
