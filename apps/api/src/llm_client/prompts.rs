// Shared prompt fragments. Each component that calls the LLM keeps its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Persona shared by every interviewer-side call.
pub const INTERVIEWER_PERSONA: &str = "You are an experienced, rigorous Excel interviewer.";

/// Joins the persona, a task-specific instruction and the JSON-only rule.
pub fn system_prompt(task: &str) -> String {
    format!("{INTERVIEWER_PERSONA} {task} {JSON_ONLY_SYSTEM}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_carries_json_rule() {
        let s = system_prompt("Give a hint.");
        assert!(s.starts_with(INTERVIEWER_PERSONA));
        assert!(s.contains("Give a hint."));
        assert!(s.ends_with(JSON_ONLY_SYSTEM));
    }
}
