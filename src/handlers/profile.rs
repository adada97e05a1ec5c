// src/handlers/profile.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{services::quiz::QuizService, state::AppState};

/// Get the user's streak, answered count, and accuracy.
pub async fn get_profile(State(quiz): State<QuizService>) -> impl IntoResponse {
    Json(quiz.profile().await)
}

/// Liveness check. Also reports any problems met while restoring saved state.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "hydration_notices": state.hydration_notices.as_ref(),
    }))
}
