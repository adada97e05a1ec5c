// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{profile, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges the quiz and profile sub-routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (quiz service, config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/session", get(quiz::get_session))
        .route("/generate", post(quiz::generate_question))
        .route("/submit", post(quiz::submit_answer))
        .route("/previous", post(quiz::previous_question))
        .route("/next", post(quiz::next_question))
        .route("/latest", post(quiz::latest_question))
        .route("/history", get(quiz::get_history))
        .route("/analyze", post(quiz::analyze_performance));

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .route("/api/profile", get(profile::get_profile))
        .route("/api/health", get(profile::health))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
