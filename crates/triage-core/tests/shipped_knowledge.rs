//! Sanity checks over the knowledge resources shipped in `data/kb`.

use std::path::PathBuf;
use triage_core::knowledge::parse_entries;
use triage_core::{Category, KnowledgeBase, Lookup};

fn shipped() -> KnowledgeBase {
    KnowledgeBase::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/kb"))
}

#[test]
fn every_concrete_category_has_entries() {
    let kb = shipped();
    for category in Category::CONCRETE {
        let text = kb
            .load(category)
            .expect("utf-8 resource")
            .unwrap_or_else(|| panic!("missing resource for {}", category));
        let entries = parse_entries(&text);
        assert!(!entries.is_empty(), "{} has no entries", category);
        assert!(entries.iter().all(|e| !e.question.is_empty() && !e.answer.is_empty()));
    }
}

#[test]
fn vpn_question_matches_case_insensitively() {
    let kb = shipped();
    match kb.lookup(Category::NetworkConnectivity, "what is vpn").expect("lookup") {
        Lookup::Answer(a) => assert!(a.starts_with("A VPN is")),
        Lookup::Miss => panic!("expected a knowledge base hit"),
    }
}

#[test]
fn outlook_reset_answer_is_exact() {
    let kb = shipped();
    assert_eq!(
        kb.lookup(Category::M365Productivity, "How do I reset my Outlook password?")
            .expect("lookup"),
        Lookup::Answer("Go to Settings > Security.".to_string())
    );
}
