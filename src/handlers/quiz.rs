// src/handlers/quiz.rs

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        analysis::AnalyzeRequest, attempt::SubmitAnswerRequest,
        settings::GenerateQuestionRequest,
    },
    services::quiz::QuizService,
};

/// Returns the current session view (displayed attempt and navigation flags).
pub async fn get_session(State(quiz): State<QuizService>) -> impl IntoResponse {
    Json(quiz.view().await)
}

/// Generates a new question for the submitted settings form.
///
/// * Reuses the background preload if it was made for exactly these settings.
/// * Otherwise asks the text-generation backend; failures surface as 502 with no state change.
pub async fn generate_question(
    State(quiz): State<QuizService>,
    Json(req): Json<GenerateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let view = quiz.generate(req.into()).await?;
    Ok(Json(view))
}

/// Submits an answer for the latest question.
///
/// * Grades it with the approximate answer comparison.
/// * Updates streak and answered count.
/// * Starts preloading the next question in the background.
pub async fn submit_answer(
    State(quiz): State<QuizService>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = quiz.submit(&req.answer).await?;
    Ok(Json(view))
}

pub async fn previous_question(State(quiz): State<QuizService>) -> impl IntoResponse {
    Json(quiz.previous().await)
}

pub async fn next_question(State(quiz): State<QuizService>) -> impl IntoResponse {
    Json(quiz.next().await)
}

/// Returns to the newest question without resetting it.
pub async fn latest_question(State(quiz): State<QuizService>) -> impl IntoResponse {
    Json(quiz.latest().await)
}

/// Full attempt history, oldest first.
pub async fn get_history(State(quiz): State<QuizService>) -> impl IntoResponse {
    Json(quiz.history().await)
}

/// "End & analyze": reviews every answered question so far.
pub async fn analyze_performance(
    State(quiz): State<QuizService>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let focus = req
        .desired_focus
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());

    let result = quiz.analyze(focus).await?;
    Ok(Json(result))
}
