// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use dotenvy::dotenv;
use url::Url;

use crate::error::AppError;

/// Every generated question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Suggestions longer than this are truncated by the analyzer.
pub const SUGGESTION_MAX_CHARS: usize = 150;

/// Absolute tolerance when comparing two numeric answers.
pub const NUMERIC_TOLERANCE: f64 = 1e-6;

/// Storage key for the serialized `UserProfile`.
pub const PROFILE_KEY: &str = "math-quest-profile";

/// Storage key for the serialized attempt history.
pub const HISTORY_KEY: &str = "math-quest-history";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1/`.
    pub llm_base_url: Url,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    /// Directory holding one JSON document per storage key.
    pub storage_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let raw_base_url =
            env::var("LLM_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1/".to_string());
        let llm_base_url = parse_base_url(&raw_base_url)?;

        let llm_api_key = env::var("LLM_API_KEY").unwrap_or_default();

        let llm_model = env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let llm_timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .map(|v| {
                v.parse::<u64>().map_err(|e| {
                    AppError::InternalServerError(format!("Invalid LLM_TIMEOUT_SECS '{}': {}", v, e))
                })
            })
            .transpose()?
            .unwrap_or(60);

        let storage_dir = env::var("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let raw_bind = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = raw_bind.parse::<SocketAddr>().map_err(|e| {
            AppError::InternalServerError(format!("Invalid BIND_ADDR '{}': {}", raw_bind, e))
        })?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            llm_base_url,
            llm_api_key,
            llm_model,
            llm_timeout_secs,
            storage_dir,
            bind_addr,
            rust_log,
        })
    }
}

/// Parses the collaborator base URL, forcing a trailing slash so that
/// `Url::join("chat/completions")` keeps the version path segment.
pub fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&normalized).map_err(|e| {
        AppError::InternalServerError(format!("Invalid LLM_BASE_URL '{}': {}", raw, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InternalServerError(format!(
            "LLM_BASE_URL must be http(s), got '{}'",
            url.scheme()
        )));
    }

    Ok(url)
}
