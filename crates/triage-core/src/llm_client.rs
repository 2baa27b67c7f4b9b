//! OpenAI-compatible chat client backing both the classifier and the generative fallback.
//! One attempt per call; the request timeout is set on the underlying reqwest client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::classifier::TextClassifier;
use crate::fallback::TextGenerator;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const CLASSIFY_MAX_TOKENS: u32 = 10;
const CLASSIFY_TEMPERATURE: f32 = 0.0;
const GENERATE_MAX_TOKENS: u32 = 400;
const GENERATE_TEMPERATURE: f32 = 0.2;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response parse failed: {0}")]
    Parse(String),
    #[error("empty completion")]
    Empty,
}

/// Chat-completions client for any OpenAI-compatible endpoint (OpenAI, OpenRouter, local proxies).
#[derive(Clone)]
pub struct OpenAiCompatClient {
    api_base: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(api_base: &str, api_key: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// System + user turn; returns the trimmed content of the first choice.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        tracing::debug!(target: "triage::llm", model = %self.model, max_tokens, "chat completion requested");

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::Empty);
        }
        Ok(content)
    }
}

#[async_trait]
impl TextClassifier for OpenAiCompatClient {
    async fn classify_label(&self, instructions: &str, ticket: &str) -> Result<String, LlmError> {
        self.complete(instructions, ticket, CLASSIFY_TEMPERATURE, CLASSIFY_MAX_TOKENS)
            .await
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatClient {
    async fn generate(&self, instructions: &str, ticket: &str) -> Result<String, LlmError> {
        self.complete(instructions, ticket, GENERATE_TEMPERATURE, GENERATE_MAX_TOKENS)
            .await
    }
}
