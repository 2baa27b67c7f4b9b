//! Flat-file knowledge base: one `Q: ...` / `A: ...` resource per concrete category.
//! Resources are read fresh on every lookup and never written.

use std::path::{Path, PathBuf};

use crate::error::TriageError;
use crate::types::Category;

pub const DEFAULT_KB_DIR: &str = "./data/kb";

const QUESTION_PREFIX: &str = "Q: ";
const ANSWER_PREFIX: &str = "A: ";

/// One canned question/answer pair, in resource order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Answer(String),
    Miss,
}

impl Lookup {
    pub fn is_miss(&self) -> bool {
        matches!(self, Lookup::Miss)
    }
}

/// Resource file name for a category; `Undetermined` has none.
pub fn resource_name(category: Category) -> Option<&'static str> {
    match category {
        Category::M365Productivity => Some("kb_m365_productivity.txt"),
        Category::Cybersecurity => Some("kb_cybersecurity.txt"),
        Category::NetworkConnectivity => Some("kb_network_connectivity.txt"),
        Category::Undetermined => None,
    }
}

/// Parse `Q: `/`A: ` blocks. A question runs until its `A: ` line, an answer until the next
/// `Q: ` line or end of input. Text before the first `Q: ` and questions with no `A: ` are dropped.
pub fn parse_entries(text: &str) -> Vec<KnowledgeEntry> {
    enum State {
        Preamble,
        Question(String),
        Answer(String, String),
    }

    let mut entries = Vec::new();
    let mut state = State::Preamble;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(QUESTION_PREFIX) {
            if let State::Answer(q, a) = state {
                entries.push(KnowledgeEntry {
                    question: q.trim().to_string(),
                    answer: a.trim().to_string(),
                });
            }
            state = State::Question(rest.to_string());
            continue;
        }
        state = match state {
            State::Preamble => State::Preamble,
            State::Question(q) => match line.strip_prefix(ANSWER_PREFIX) {
                Some(rest) => State::Answer(q, rest.to_string()),
                None => State::Question(format!("{}\n{}", q, line)),
            },
            State::Answer(q, a) => State::Answer(q, format!("{}\n{}", a, line)),
        };
    }
    if let State::Answer(q, a) = state {
        entries.push(KnowledgeEntry {
            question: q.trim().to_string(),
            answer: a.trim().to_string(),
        });
    }
    entries
}

/// Symmetric, case-insensitive containment. First entry in resource order wins.
/// An empty ticket or an empty stored question contains-matches, so either hits the first
/// candidate entry.
pub fn find_answer<'a>(entries: &'a [KnowledgeEntry], ticket: &str) -> Option<&'a str> {
    let t = ticket.trim().to_lowercase();
    entries
        .iter()
        .find(|e| {
            let q = e.question.trim().to_lowercase();
            t.contains(&q) || q.contains(&t)
        })
        .map(|e| e.answer.as_str())
}

/// Knowledge resources rooted at a directory.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    dir: PathBuf,
}

impl KnowledgeBase {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn resource_for(&self, category: Category) -> Option<PathBuf> {
        resource_name(category).map(|name| self.dir.join(name))
    }

    /// Raw resource text. A missing mapping or unreadable file is `Ok(None)`; a file that
    /// exists but is not UTF-8 is an internal error.
    pub fn load(&self, category: Category) -> Result<Option<String>, TriageError> {
        let Some(path) = self.resource_for(category) else {
            return Ok(None);
        };
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    tracing::debug!(target: "triage::knowledge", path = %path.display(), "knowledge resource missing");
                } else {
                    tracing::warn!(target: "triage::knowledge", path = %path.display(), error = %e, "knowledge resource unreadable");
                }
                return Ok(None);
            }
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|source| TriageError::KnowledgeDecode { path, source })
    }

    pub fn lookup(&self, category: Category, ticket: &str) -> Result<Lookup, TriageError> {
        let Some(text) = self.load(category)? else {
            return Ok(Lookup::Miss);
        };
        let entries = parse_entries(&text);
        Ok(match find_answer(&entries, ticket) {
            Some(answer) => Lookup::Answer(answer.to_string()),
            None => Lookup::Miss,
        })
    }
}
