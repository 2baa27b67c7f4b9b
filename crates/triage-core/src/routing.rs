//! Specialist routing and templated justification.

use crate::types::{Category, Priority};

pub const MANUAL_ASSIGNMENT: &str = "Manual Specialist Assignment Required";

pub fn route_specialist(category: Category) -> String {
    match category {
        Category::Undetermined => MANUAL_ASSIGNMENT.to_string(),
        c => format!("{} Specialist", c.label()),
    }
}

fn priority_sentence(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "The ticket describes a critical issue with potential security, compliance, or widespread business impact.",
        Priority::Medium => "The ticket affects multiple users or system performance but is not immediately business critical.",
        Priority::Low => "The ticket affects a single user or is a minor/non-urgent issue.",
    }
}

fn category_sentence(category: Category) -> &'static str {
    match category {
        Category::M365Productivity => "The issue relates to Microsoft or productivity applications.",
        Category::Cybersecurity => "The ticket involves security, data protection, or regulatory concerns.",
        Category::NetworkConnectivity => "The problem pertains to network, hardware, or connectivity.",
        Category::Undetermined => "The category could not be determined automatically. Manual review is required.",
    }
}

pub fn justify(priority: Priority, category: Category) -> String {
    format!("{} {}", priority_sentence(priority), category_sentence(category))
}
