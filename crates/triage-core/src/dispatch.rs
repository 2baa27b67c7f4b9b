//! Dispatch prediction: suggests an assignee for a ticket subject.
//! The placeholder is the default; the HTTP predictor talks to the dispatch model service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::DispatchSuggestion;

pub const DEFAULT_PLACEHOLDER_TECH: &str = "Unassigned";

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("dispatch request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("dispatch service error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("dispatch response parse failed: {0}")]
    Parse(String),
}

#[async_trait]
pub trait DispatchPredictor: Send + Sync {
    async fn predict(&self, subject: &str) -> Result<DispatchSuggestion, DispatchError>;
}

/// Always suggests the same tech with no confidence.
#[derive(Debug, Clone)]
pub struct PlaceholderDispatch {
    tech: String,
}

impl PlaceholderDispatch {
    pub fn new(tech: &str) -> Self {
        let tech = tech.trim();
        Self {
            tech: if tech.is_empty() {
                DEFAULT_PLACEHOLDER_TECH.to_string()
            } else {
                tech.to_string()
            },
        }
    }

    pub fn suggestion(&self) -> DispatchSuggestion {
        DispatchSuggestion {
            tech: self.tech.clone(),
            confidence: None,
        }
    }
}

impl Default for PlaceholderDispatch {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_TECH)
    }
}

#[async_trait]
impl DispatchPredictor for PlaceholderDispatch {
    async fn predict(&self, _subject: &str) -> Result<DispatchSuggestion, DispatchError> {
        Ok(self.suggestion())
    }
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    subject: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    tech: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
}

/// Client for `POST {base}/predict/dispatch`.
pub struct HttpDispatchPredictor {
    url: String,
    client: reqwest::Client,
}

impl HttpDispatchPredictor {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            url: format!("{}/predict/dispatch", base_url.trim_end_matches('/')),
            client,
        }
    }
}

#[async_trait]
impl DispatchPredictor for HttpDispatchPredictor {
    async fn predict(&self, subject: &str) -> Result<DispatchSuggestion, DispatchError> {
        let res = self
            .client
            .post(&self.url)
            .json(&PredictRequest { subject })
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: PredictResponse =
            serde_json::from_str(&text).map_err(|e| DispatchError::Parse(e.to_string()))?;
        let tech = parsed
            .tech
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DispatchError::Parse("missing tech".to_string()))?;

        Ok(DispatchSuggestion {
            tech,
            confidence: parsed.confidence,
        })
    }
}
