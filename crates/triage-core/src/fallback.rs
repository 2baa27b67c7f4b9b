//! Generative fallback, used only when the knowledge base misses. The category's full
//! resource text is injected into the system instruction as grounding.

use async_trait::async_trait;
use std::sync::Arc;

use crate::llm_client::LlmError;
use crate::types::AnswerSource;

pub const UNAVAILABLE_MARKER: &str = "[LLM unavailable: API key not set]";

const PERSONA_PROMPT: &str = "You are TechSupport Assistant, an AI support specialist for an MSP (Managed Service Provider). \
Your goal is to provide helpful, accurate, and efficient IT support solutions.\n\
\nKNOWLEDGE BASE USAGE:\n\
- ALWAYS refer to the knowledge base first for answers to customer inquiries\n\
- Match customer questions to similar questions in the knowledge base\n\
- If an exact match exists, use that answer as your primary response\n\
- If a partial match exists, adapt the knowledge base answer to the specific question\n\
- If NO relevant information exists in the knowledge base, clearly mark your response with 'ESCALATION NEEDED' at the beginning \
and suggest what information a human agent would need to resolve this\n\
\nApproach every question with these principles:\n\
1. Be concise - Get to the point quickly without unnecessary explanations\n\
2. Be practical - Provide specific, actionable steps that solve the problem\n\
3. Be friendly - Use a supportive, patient tone without being overly casual\n\
4. Be confident - Express solutions with clarity and certainty when appropriate\n\
\nWhen responding:\n\
- Keep answers to 2-3 sentences unless detailed steps are required\n\
- Treat end users as elementary school students. Use simple, clear language and avoid technical jargon\n\
- If the ticket is not directly about a bug or error, always end your answer with a clarifying question to help resolve the user's issue.\n";

const CLOSING_INSTRUCTION: &str =
    "\nAnswer the following support ticket using the above knowledge base and instructions.";

/// Capability that turns (instructions, ticket) into free-form answer text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, instructions: &str, ticket: &str) -> Result<String, LlmError>;
}

/// Persona template + raw knowledge text + closing instruction.
pub fn build_instructions(knowledge: Option<&str>) -> String {
    format!(
        "{}{}{}",
        PERSONA_PROMPT,
        knowledge.unwrap_or_default(),
        CLOSING_INSTRUCTION
    )
}

pub fn error_marker(detail: &str) -> String {
    format!("[LLM error: {}]", detail)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAnswer {
    pub text: String,
    pub source: AnswerSource,
}

pub struct Fallback {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Fallback {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Single attempt. Never fails: missing credential and remote errors become markers.
    pub async fn generate(&self, ticket: &str, knowledge: Option<&str>) -> GeneratedAnswer {
        let Some(generator) = &self.generator else {
            return GeneratedAnswer {
                text: UNAVAILABLE_MARKER.to_string(),
                source: AnswerSource::Unavailable,
            };
        };

        let instructions = build_instructions(knowledge);
        let result = match generator.generate(&instructions, ticket).await {
            Ok(text) if text.trim().is_empty() => Err(LlmError::Empty),
            other => other,
        };
        match result {
            Ok(text) => GeneratedAnswer {
                text: text.trim().to_string(),
                source: AnswerSource::Generated,
            },
            Err(e) => {
                tracing::warn!(target: "triage::fallback", error = %e, "generation failed");
                GeneratedAnswer {
                    text: error_marker(&e.to_string()),
                    source: AnswerSource::Error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        reply: Result<String, ()>,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TextGenerator for Recording {
        async fn generate(&self, instructions: &str, ticket: &str) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((instructions.to_string(), ticket.to_string()));
            self.reply.clone().map_err(|_| LlmError::Parse("bad json".into()))
        }
    }

    fn recording(reply: Result<&str, ()>) -> Arc<Recording> {
        Arc::new(Recording {
            reply: reply.map(str::to_string),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn unconfigured_returns_unavailable_marker() {
        let answer = Fallback::new(None).generate("help", None).await;
        assert_eq!(answer.text, UNAVAILABLE_MARKER);
        assert_eq!(answer.source, AnswerSource::Unavailable);
    }

    #[tokio::test]
    async fn knowledge_text_is_injected() {
        let gen = recording(Ok("  Restart the router. "));
        let fallback = Fallback::new(Some(gen.clone()));
        let answer = fallback.generate("wifi drops", Some("Q: x\nA: y\n")).await;
        assert_eq!(answer.text, "Restart the router.");
        assert_eq!(answer.source, AnswerSource::Generated);

        let seen = gen.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.starts_with("You are TechSupport Assistant"));
        assert!(seen[0].0.contains("Q: x\nA: y\n"));
        assert!(seen[0].0.ends_with(CLOSING_INSTRUCTION));
        assert_eq!(seen[0].1, "wifi drops");
    }

    #[tokio::test]
    async fn failure_embeds_detail() {
        let fallback = Fallback::new(Some(recording(Err(()))));
        let answer = fallback.generate("x", None).await;
        assert_eq!(answer.source, AnswerSource::Error);
        assert_eq!(answer.text, "[LLM error: response parse failed: bad json]");
    }

    #[tokio::test]
    async fn blank_completion_is_an_error() {
        let fallback = Fallback::new(Some(recording(Ok("   "))));
        let answer = fallback.generate("x", None).await;
        assert_eq!(answer.source, AnswerSource::Error);
        assert_eq!(answer.text, "[LLM error: empty completion]");
    }
}
