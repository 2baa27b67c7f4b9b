//! Triage pipeline: priority → category → routing → justification → knowledge base →
//! generative fallback on miss → dispatch suggestion → result.
//!
//! Built from an explicit [`TriageConfig`] or from injected capabilities; holds no mutable
//! state, so one instance is shared across concurrent requests.

use std::sync::Arc;

use crate::classifier::{Classifier, KeywordClassifier, TextClassifier};
use crate::config::{ClassifierMode, TriageConfig};
use crate::dispatch::{DispatchPredictor, HttpDispatchPredictor, PlaceholderDispatch};
use crate::error::TriageError;
use crate::fallback::{Fallback, TextGenerator};
use crate::knowledge::{KnowledgeBase, Lookup};
use crate::llm_client::OpenAiCompatClient;
use crate::priority::assess_priority;
use crate::routing::{justify, route_specialist};
use crate::types::{AnswerSource, TriageResult};

pub struct TriagePipeline {
    classifier: Classifier,
    knowledge: KnowledgeBase,
    fallback: Fallback,
    dispatcher: Arc<dyn DispatchPredictor>,
    placeholder: PlaceholderDispatch,
}

impl TriagePipeline {
    /// No remote capabilities: every category is undetermined and every miss is unavailable.
    pub fn new(knowledge: KnowledgeBase) -> Self {
        let placeholder = PlaceholderDispatch::default();
        Self {
            classifier: Classifier::new(None),
            knowledge,
            fallback: Fallback::new(None),
            dispatcher: Arc::new(placeholder.clone()),
            placeholder,
        }
    }

    pub fn from_config(config: &TriageConfig) -> Self {
        let mut pipeline = Self::new(KnowledgeBase::new(&config.kb_dir))
            .with_placeholder(PlaceholderDispatch::new(&config.dispatch_placeholder));

        if let Some(key) = config.resolved_api_key() {
            let client = Arc::new(
                OpenAiCompatClient::new(&config.llm_api_base, &key, config.request_timeout())
                    .with_model(&config.llm_model),
            );
            pipeline = pipeline.with_generator(client.clone());
            if config.classifier == ClassifierMode::Llm {
                pipeline = pipeline.with_classifier(client);
            }
        } else {
            tracing::warn!(target: "triage::pipeline", "no LLM API key configured; remote classification and generation disabled");
        }

        if config.classifier == ClassifierMode::Keyword {
            pipeline = pipeline.with_classifier(Arc::new(KeywordClassifier));
        }

        if let Some(url) = config.dispatch_url.as_deref().filter(|u| !u.trim().is_empty()) {
            pipeline = pipeline.with_dispatcher(Arc::new(HttpDispatchPredictor::new(
                url,
                config.request_timeout(),
            )));
        }

        pipeline
    }

    pub fn with_classifier(mut self, backend: Arc<dyn TextClassifier>) -> Self {
        self.classifier = Classifier::new(Some(backend));
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.fallback = Fallback::new(Some(generator));
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn DispatchPredictor>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Replaces the placeholder used both as the default dispatcher and as the degraded suggestion.
    pub fn with_placeholder(mut self, placeholder: PlaceholderDispatch) -> Self {
        self.dispatcher = Arc::new(placeholder.clone());
        self.placeholder = placeholder;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub async fn submit_ticket(&self, ticket: &str) -> Result<TriageResult, TriageError> {
        let priority = assess_priority(ticket);
        let category = self.classifier.classify(ticket).await;
        let routed_to = route_specialist(category);
        let justification = justify(priority, category);

        tracing::info!(
            target: "triage::pipeline",
            priority = %priority,
            category = %category,
            "ticket classified"
        );

        let (answer, answer_source) = match self.knowledge.lookup(category, ticket)? {
            Lookup::Answer(answer) => {
                tracing::info!(target: "triage::pipeline", category = %category, "knowledge base hit");
                (answer, AnswerSource::KnowledgeBase)
            }
            Lookup::Miss => {
                tracing::info!(target: "triage::pipeline", category = %category, "knowledge base miss; generating");
                let grounding = self.knowledge.load(category)?;
                let generated = self.fallback.generate(ticket, grounding.as_deref()).await;
                (generated.text, generated.source)
            }
        };

        let dispatch = match self.dispatcher.predict(ticket).await {
            Ok(s) if !s.tech.trim().is_empty() => s,
            Ok(_) => {
                tracing::warn!(target: "triage::dispatch", "dispatch returned an empty tech; using placeholder");
                self.placeholder.suggestion()
            }
            Err(e) => {
                tracing::warn!(target: "triage::dispatch", error = %e, "dispatch prediction failed; using placeholder");
                self.placeholder.suggestion()
            }
        };

        tracing::debug!(target: "triage::pipeline", source = ?answer_source, tech = %dispatch.tech, "triage complete");

        Ok(TriageResult {
            assigned_priority: priority,
            assigned_category: category,
            routed_to,
            justification,
            answer,
            answer_source,
            dispatch,
        })
    }
}
