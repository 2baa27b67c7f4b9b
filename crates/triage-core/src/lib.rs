//! Helpdesk triage core.
//! Priority heuristic, category classification, knowledge-base lookup with LLM fallback,
//! specialist routing and dispatch suggestion for free-text support tickets.

pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod knowledge;
pub mod llm_client;
pub mod pipeline;
pub mod priority;
pub mod routing;
pub mod types;

pub use classifier::{Classifier, KeywordClassifier, TextClassifier};
pub use config::{ClassifierMode, TriageConfig};
pub use dispatch::{DispatchError, DispatchPredictor, HttpDispatchPredictor, PlaceholderDispatch};
pub use error::{ConfigError, TriageError};
pub use fallback::{Fallback, GeneratedAnswer, TextGenerator, UNAVAILABLE_MARKER};
pub use knowledge::{KnowledgeBase, KnowledgeEntry, Lookup};
pub use llm_client::{LlmError, OpenAiCompatClient};
pub use pipeline::TriagePipeline;
pub use priority::assess_priority;
pub use routing::{justify, route_specialist};
pub use types::{AnswerSource, Category, DispatchSuggestion, Priority, TriageResult};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #[test]
    fn version_matches_manifest() {
        assert_eq!(super::version(), env!("CARGO_PKG_VERSION"));
        assert!(!super::version().is_empty());
    }
}
