//! Category classifier. Delegates to a [`TextClassifier`] and never fails: a missing
//! backend, a remote error or an out-of-set label all become [`Category::Undetermined`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::llm_client::LlmError;
use crate::types::{Category, UNDETERMINED_LABEL};

/// Fixed instruction prompt: closed category set, `TBD` escape, label-only output.
pub const CLASSIFIER_PROMPT: &str = "You are an expert IT support classifier. \
Given a support ticket or a question about IT topics, classify it into one of these categories: \
['M365 & Productivity', 'Cybersecurity', 'Network & Connectivity']. \
If the ticket or question does not fit any category, respond with 'TBD'. \
Respond ONLY with the category name or 'TBD'. Do not provide any explanation. \
Examples:\n\
Q: What is VPN?\nA: Network & Connectivity\n\
Q: How do I reset my Outlook password?\nA: M365 & Productivity\n\
Q: How do I enable MFA?\nA: Cybersecurity\n";

/// Capability that turns (instructions, ticket) into a single label string.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify_label(&self, instructions: &str, ticket: &str) -> Result<String, LlmError>;
}

pub struct Classifier {
    backend: Option<Arc<dyn TextClassifier>>,
}

impl Classifier {
    /// `None` means no credential is configured; every ticket is `Undetermined`.
    pub fn new(backend: Option<Arc<dyn TextClassifier>>) -> Self {
        Self { backend }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn classify(&self, ticket: &str) -> Category {
        let Some(backend) = &self.backend else {
            tracing::debug!(target: "triage::classifier", "no classifier configured; category undetermined");
            return Category::Undetermined;
        };

        match backend.classify_label(CLASSIFIER_PROMPT, ticket).await {
            Ok(label) => {
                let category = Category::from_label(&label);
                if category.is_undetermined() && label.trim() != UNDETERMINED_LABEL {
                    tracing::warn!(
                        target: "triage::classifier",
                        label = %label.trim(),
                        "classifier returned a label outside the category set"
                    );
                }
                category
            }
            Err(e) => {
                tracing::warn!(target: "triage::classifier", error = %e, "classification failed; category undetermined");
                Category::Undetermined
            }
        }
    }
}

/// Offline classifier over per-category keyword lists. First category (declaration order)
/// with any hit wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    fn keywords(category: Category) -> &'static [&'static str] {
        match category {
            Category::M365Productivity => &[
                "microsoft", "office", "email", "outlook", "teams", "sharepoint", "onedrive",
                "collaboration", "document", "word", "excel", "powerpoint",
            ],
            Category::Cybersecurity => &[
                "security", "compliance", "cyber", "breach", "phish", "ransomware", "regulatory",
                "data protection", "access", "gdpr", "hipaa", "mfa", "2fa", "password", "encryption",
            ],
            Category::NetworkConnectivity => &[
                "network", "vpn", "hardware", "server", "router", "switch", "latency",
                "performance", "connectivity", "internet", "wifi", "system down", "crash", "slow",
                "printer",
            ],
            Category::Undetermined => &[],
        }
    }

    pub fn label_for(ticket: &str) -> Category {
        let lower = ticket.to_lowercase();
        Category::CONCRETE
            .into_iter()
            .find(|c| Self::keywords(*c).iter().any(|k| lower.contains(k)))
            .unwrap_or(Category::Undetermined)
    }
}

#[async_trait]
impl TextClassifier for KeywordClassifier {
    async fn classify_label(&self, _instructions: &str, ticket: &str) -> Result<String, LlmError> {
        Ok(Self::label_for(ticket).label().to_string())
    }
}
