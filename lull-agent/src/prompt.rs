// ABOUTME: System prompt construction from agent instructions and skills.
// ABOUTME: Skills are selected by case-insensitive keyword match against the message.

use crate::config::{AgentDefinition, Skill};

/// Select the skills whose keywords appear in `message` (case-insensitive
/// substring match). Order follows the agent's skill list.
pub fn relevant_skills<'a>(skills: &'a [Skill], message: &str) -> Vec<&'a Skill> {
    let message_lower = message.to_lowercase();
    skills
        .iter()
        .filter(|skill| {
            skill
                .keywords
                .iter()
                .any(|keyword| message_lower.contains(&keyword.to_lowercase()))
        })
        .collect()
}

/// Build the system prompt for one invocation: the agent's instructions,
/// followed by an "Available skills" block when any skill matched.
pub fn build_system_prompt(agent: &AgentDefinition, message: &str) -> String {
    let mut prompt = agent.instructions.clone();

    let matched = relevant_skills(&agent.skills, message);
    if !matched.is_empty() {
        prompt.push_str("\n\nAvailable skills:\n");
        for skill in matched {
            prompt.push_str(&format!("- {}: {}\n", skill.name, skill.description));
            if !skill.context.is_empty() {
                prompt.push_str(&format!("  Context: {}\n", skill.context));
            }
        }
    }

    prompt
}
