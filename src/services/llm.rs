// src/services/llm.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

use crate::{config::Config, error::AppError};

/// A request for schema-constrained output.
#[derive(Debug, Clone)]
pub struct StructuredPrompt {
    /// Schema name reported to the backend (e.g. "math_question").
    pub name: &'static str,
    pub system: String,
    pub user: String,
    /// JSON Schema the output must follow.
    pub schema: Value,
}

/// The external text-generation collaborator.
///
/// Returns `Ok(None)` when the backend answered but produced no structured output.
/// Decoding into typed results happens in the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_structured(&self, prompt: &StructuredPrompt) -> Result<Option<Value>, AppError>;
}

/// Client for any OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;
        let endpoint = config
            .llm_base_url
            .join("chat/completions")
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    fn payload(&self, prompt: &StructuredPrompt) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": prompt.name,
                    "strict": true,
                    "schema": prompt.schema
                }
            },
            "temperature": 0.7
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate_structured(&self, prompt: &StructuredPrompt) -> Result<Option<Value>, AppError> {
        tracing::debug!("Requesting '{}' from {}", prompt.name, self.endpoint);

        let res = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&self.payload(prompt))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!("{}: {}", status, text)));
        }

        let body: Value = res.json().await?;
        Ok(extract_structured_content(&body))
    }
}

/// Pulls the JSON document out of `choices[0].message.content`.
fn extract_structured_content(body: &Value) -> Option<Value> {
    let content = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())?;

    match serde_json::from_str::<Value>(content) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Model content is not JSON: {}", e);
            None
        }
    }
}
