// tests/profile_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use math_quest::{
    config::{HISTORY_KEY, PROFILE_KEY},
    error::AppError,
    routes,
    services::{
        analyzer::PerformanceAnalyzer,
        generator::QuestionGenerator,
        llm::{StructuredPrompt, TextGenerator},
        quiz::QuizService,
    },
    session::QuizSession,
    state::AppState,
    storage::{FileStore, MemoryStore, SessionStore},
};
use serde_json::{Value, json};

struct StubBackend;

#[async_trait]
impl TextGenerator for StubBackend {
    async fn generate_structured(&self, _: &StructuredPrompt) -> Result<Option<Value>, AppError> {
        Ok(Some(json!({
            "question": "Solve x + 2 = 5",
            "answer": "3",
            "options": ["1", "2", "3", "4"],
            "explanation": "Subtract 2 from both sides."
        })))
    }
}

async fn spawn_app(store: Arc<dyn SessionStore>) -> String {
    let (session, notices) = QuizSession::hydrate(store.as_ref(), Local::now().date_naive()).await;

    let backend = Arc::new(StubBackend);
    let quiz = QuizService::new(
        session,
        store,
        QuestionGenerator::new(backend.clone()),
        PerformanceAnalyzer::new(backend),
    );
    let state = AppState {
        quiz,
        hydration_notices: Arc::new(notices.iter().map(|n| n.to_string()).collect()),
    };

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn days_ago(n: u64) -> NaiveDate {
    Local::now().date_naive().checked_sub_days(Days::new(n)).unwrap()
}

fn stored_profile(last_active: NaiveDate, streak: u32) -> Arc<dyn SessionStore> {
    let profile = json!({
        "last_active_date": last_active,
        "streak": streak,
        "questions_answered": 10
    });
    Arc::new(MemoryStore::with_entries([(PROFILE_KEY, profile.to_string())]))
}

async fn answer_one(client: &reqwest::Client, address: &str, answer: &str) -> Value {
    client
        .post(&format!("{}/api/quiz/generate", address))
        .json(&json!({"difficulty": "easy", "type": "algebra"}))
        .send()
        .await
        .unwrap();

    client
        .post(&format!("{}/api/quiz/submit", address))
        .json(&json!({"answer": answer}))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap()
}

async fn get_profile(client: &reqwest::Client, address: &str) -> Value {
    client
        .get(&format!("{}/api/profile", address))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap()
}

#[tokio::test]
async fn answering_the_day_after_extends_streak() {
    let address = spawn_app(stored_profile(days_ago(1), 3)).await;
    let client = reqwest::Client::new();

    assert_eq!(get_profile(&client, &address).await["streak"], 3);

    answer_one(&client, &address, "3").await;

    let profile = get_profile(&client, &address).await;
    assert_eq!(profile["streak"], 4);
    assert_eq!(profile["questions_answered"], 11);
    assert_eq!(profile["correct_answers"], 1);
    assert_eq!(profile["accuracy"], 1.0);
}

#[tokio::test]
async fn answering_after_a_gap_restarts_streak() {
    let address = spawn_app(stored_profile(days_ago(3), 8)).await;
    let client = reqwest::Client::new();

    // Decay on hydration
    assert_eq!(get_profile(&client, &address).await["streak"], 0);

    answer_one(&client, &address, "4").await;

    let profile = get_profile(&client, &address).await;
    assert_eq!(profile["streak"], 1);
    assert_eq!(profile["correct_answers"], 0);
    assert_eq!(profile["accuracy"], 0.0);
}

#[tokio::test]
async fn malformed_storage_is_reported_but_not_fatal() {
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::with_entries([
        (PROFILE_KEY, "{\"streak\": \"many\"}"),
        (HISTORY_KEY, "not json at all"),
    ]));
    let address = spawn_app(store).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(&format!("{}/api/health", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["hydration_notices"].as_array().unwrap().len(), 2);

    let view = answer_one(&client, &address, "3").await;
    assert_eq!(view["current"]["is_correct"], true);
    assert_eq!(view["total_attempts"], 1);
}

#[tokio::test]
async fn state_survives_a_restart() {
    let dir = std::env::temp_dir().join(format!("math-quest-{}", uuid::Uuid::new_v4()));
    let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(&dir));

    let address = spawn_app(store.clone()).await;
    let client = reqwest::Client::new();
    answer_one(&client, &address, "3").await;
    answer_one(&client, &address, "1").await;

    // A fresh app over the same directory sees the same history and profile
    let restarted = spawn_app(Arc::new(FileStore::new(&dir))).await;
    let history: Vec<Value> = client
        .get(&format!("{}/api/quiz/history", restarted))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["is_correct"], true);
    assert_eq!(history[1]["is_correct"], false);

    let profile = get_profile(&client, &restarted).await;
    assert_eq!(profile["questions_answered"], 2);
    assert_eq!(profile["streak"], 1);

    let session: Value = client
        .get(&format!("{}/api/quiz/session", restarted))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["cursor"], 1);

    let _ = std::fs::remove_dir_all(&dir);
}
