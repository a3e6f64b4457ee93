// src/llm/client.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{config::Config, error::AppError};

pub const MAX_TOKENS: u32 = 4000;
pub const TEMPERATURE: f64 = 0.9;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a non-streaming chat-completion request.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,
}

/// Sends chat messages to a language model and returns the decoded JSON body.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Value, AppError>;
}

/// Bearer-authenticated client for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            url: config.completion_url.clone(),
            api_key: config.completion_api_key.clone(),
            model: config.completion_model.clone(),
        }
    }
}

#[async_trait]
impl ChatCompletion for CompletionClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Value, AppError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        };

        tracing::info!(model = %self.model, url = %self.url, "Calling completion API");

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {:?}", e);
                AppError::from(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "Completion API returned an error status");
            return Err(AppError::Upstream {
                error: "Upstream API error".to_string(),
                message: text,
                raw: None,
            });
        }

        serde_json::from_str(&text).map_err(|e| AppError::Upstream {
            error: "Failed to parse completion content".to_string(),
            message: e.to_string(),
            raw: Some(Value::String(text)),
        })
    }
}
