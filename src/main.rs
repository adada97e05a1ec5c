// src/main.rs

use std::sync::Arc;

use chrono::Local;
use dotenvy::dotenv;
use math_quest::config::Config;
use math_quest::routes;
use math_quest::services::{
    analyzer::PerformanceAnalyzer, generator::QuestionGenerator, llm::OpenAiClient,
    quiz::QuizService,
};
use math_quest::session::QuizSession;
use math_quest::state::AppState;
use math_quest::storage::{FileStore, SessionStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "math-quest.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Hydrate the session from local storage; bad data only produces notices
    let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(&config.storage_dir));
    let (session, notices) = QuizSession::hydrate(store.as_ref(), Local::now().date_naive()).await;
    for notice in &notices {
        tracing::warn!("{}", notice);
    }

    if config.llm_api_key.is_empty() {
        tracing::warn!("LLM_API_KEY is not set, generation requests will likely be rejected");
    }
    let backend = Arc::new(OpenAiClient::new(&config)?);
    tracing::info!("Using model '{}' at {}", config.llm_model, config.llm_base_url);

    let quiz = QuizService::new(
        session,
        store,
        QuestionGenerator::new(backend.clone()),
        PerformanceAnalyzer::new(backend),
    );

    // Create AppState
    let state = AppState {
        quiz,
        hydration_notices: Arc::new(notices.iter().map(|n| n.to_string()).collect()),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    tracing::info!("Math Quest listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
