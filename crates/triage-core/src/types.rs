//! Closed domain types shared by every triage stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire marker for a ticket whose category could not be determined.
pub const UNDETERMINED_LABEL: &str = "TBD";

/// Subject-matter category of a ticket. `Undetermined` marks it for manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "M365 & Productivity")]
    M365Productivity,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Network & Connectivity")]
    NetworkConnectivity,
    #[serde(rename = "TBD")]
    Undetermined,
}

impl Category {
    /// Concrete categories in declaration order (precedence for keyword classification).
    pub const CONCRETE: [Category; 3] = [
        Category::M365Productivity,
        Category::Cybersecurity,
        Category::NetworkConnectivity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::M365Productivity => "M365 & Productivity",
            Category::Cybersecurity => "Cybersecurity",
            Category::NetworkConnectivity => "Network & Connectivity",
            Category::Undetermined => UNDETERMINED_LABEL,
        }
    }

    /// Exact match after trimming; anything outside the closed set collapses to `Undetermined`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::CONCRETE
            .into_iter()
            .find(|c| c.label() == label)
            .unwrap_or(Category::Undetermined)
    }

    pub fn is_undetermined(self) -> bool {
        matches!(self, Category::Undetermined)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Urgency tier derived from keyword heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which path produced the answer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    KnowledgeBase,
    Generated,
    Unavailable,
    Error,
}

/// Suggested assignee from the dispatch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSuggestion {
    pub tech: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Aggregate returned to the caller. Every field carries a real value or an explicit sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub assigned_priority: Priority,
    pub assigned_category: Category,
    pub routed_to: String,
    pub justification: String,
    pub answer: String,
    pub answer_source: AnswerSource,
    pub dispatch: DispatchSuggestion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_label() {
        for c in Category::CONCRETE {
            assert_eq!(Category::from_label(c.label()), c);
        }
        assert_eq!(Category::from_label("  Cybersecurity\n"), Category::Cybersecurity);
    }

    #[test]
    fn free_text_collapses_to_undetermined() {
        assert_eq!(Category::from_label("TBD"), Category::Undetermined);
        assert_eq!(Category::from_label("cybersecurity"), Category::Undetermined);
        assert_eq!(
            Category::from_label("I think this is Cybersecurity"),
            Category::Undetermined
        );
        assert_eq!(Category::from_label(""), Category::Undetermined);
    }

    #[test]
    fn result_serializes_with_client_field_names() {
        let result = TriageResult {
            assigned_priority: Priority::High,
            assigned_category: Category::Undetermined,
            routed_to: "Manual Specialist Assignment Required".into(),
            justification: "j".into(),
            answer: "a".into(),
            answer_source: AnswerSource::KnowledgeBase,
            dispatch: DispatchSuggestion {
                tech: "Unassigned".into(),
                confidence: None,
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["assigned_priority"], "High");
        assert_eq!(json["assigned_category"], "TBD");
        assert_eq!(json["answer_source"], "knowledge_base");
        assert_eq!(json["dispatch"]["tech"], "Unassigned");
    }
}
