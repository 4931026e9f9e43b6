// ABOUTME: Tests for system prompt construction and skill selection.
// ABOUTME: Validates keyword matching, case-insensitivity, and prompt layout.

use lull_agent::config::{AgentDefinition, Skill};
use lull_agent::prompt::{build_system_prompt, relevant_skills};

fn agent_with_skills(skills: Vec<Skill>) -> AgentDefinition {
    AgentDefinition {
        id: "agent-1".to_string(),
        name: "Support".to_string(),
        description: String::new(),
        instructions: "You are a helpful assistant.".to_string(),
        model: "openai/gpt-4o-mini".to_string(),
        temperature: 0.7,
        max_tokens: 1000,
        skills,
        webhook_url: String::new(),
    }
}

fn skill(name: &str, keywords: &[&str], context: &str) -> Skill {
    Skill {
        name: name.to_string(),
        description: format!("{} skill", name),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        context: context.to_string(),
    }
}

#[test]
fn test_relevant_skills_matches_keyword() {
    let skills = vec![
        skill("billing", &["invoice", "payment"], ""),
        skill("shipping", &["delivery", "track"], ""),
    ];

    let matched = relevant_skills(&skills, "Where is my invoice?");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "billing");
}

#[test]
fn test_relevant_skills_case_insensitive() {
    let skills = vec![skill("billing", &["Invoice"], "")];

    let matched = relevant_skills(&skills, "I need my INVOICE please");
    assert_eq!(matched.len(), 1);
}

#[test]
fn test_relevant_skills_no_match() {
    let skills = vec![skill("billing", &["invoice"], "")];

    let matched = relevant_skills(&skills, "hello there");
    assert!(matched.is_empty());
}

#[test]
fn test_relevant_skills_multiple_matches_keep_order() {
    let skills = vec![
        skill("billing", &["invoice"], ""),
        skill("shipping", &["track"], ""),
    ];

    let matched = relevant_skills(&skills, "track my invoice");
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].name, "billing");
    assert_eq!(matched[1].name, "shipping");
}

#[test]
fn test_build_system_prompt_without_skills_is_instructions_only() {
    let agent = agent_with_skills(Vec::new());
    let prompt = build_system_prompt(&agent, "hello");
    assert_eq!(prompt, "You are a helpful assistant.");
}

#[test]
fn test_build_system_prompt_appends_matched_skills() {
    let agent = agent_with_skills(vec![skill(
        "billing",
        &["invoice"],
        "Invoices are issued on the 1st.",
    )]);

    let prompt = build_system_prompt(&agent, "about my invoice");
    assert!(prompt.starts_with("You are a helpful assistant."));
    assert!(prompt.contains("Available skills:"));
    assert!(prompt.contains("- billing: billing skill"));
    assert!(prompt.contains("Context: Invoices are issued on the 1st."));
}

#[test]
fn test_build_system_prompt_skips_unmatched_skills() {
    let agent = agent_with_skills(vec![skill("billing", &["invoice"], "ctx")]);

    let prompt = build_system_prompt(&agent, "hello");
    assert!(!prompt.contains("Available skills:"));
}

#[test]
fn test_skill_without_context_omits_context_line() {
    let agent = agent_with_skills(vec![skill("billing", &["invoice"], "")]);

    let prompt = build_system_prompt(&agent, "invoice");
    assert!(!prompt.contains("Context:"));
}
