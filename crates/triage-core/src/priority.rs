//! Priority assessor: ordered keyword tiers over the lowercased ticket text.

use crate::types::Priority;

/// Security, compliance or organisation-wide impact.
const HIGH_PHRASES: &[&str] = &[
    "breach",
    "ransomware",
    "phish",
    "security incident",
    "data leak",
    "compliance violation",
    "system down",
    "all users",
    "cannot access",
    "urgent",
    "critical",
    "regulatory",
];

/// Multiple users or degraded performance.
const MEDIUM_PHRASES: &[&str] = &[
    "multiple users",
    "several users",
    "performance",
    "slow",
    "degraded",
    "intermittent",
    "issues",
    "not working as expected",
];

/// Highest tier with any substring hit wins; no hit is `Low`.
pub fn assess_priority(ticket: &str) -> Priority {
    let lower = ticket.to_lowercase();
    if HIGH_PHRASES.iter().any(|p| lower.contains(p)) {
        Priority::High
    } else if MEDIUM_PHRASES.iter().any(|p| lower.contains(p)) {
        Priority::Medium
    } else {
        Priority::Low
    }
}
