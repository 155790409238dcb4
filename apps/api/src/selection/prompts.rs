/// Generation task, joined with the persona and the JSON-only rule.
pub const GENERATION_TASK: &str = "Ask ONE concise question at a time, adapt difficulty, \
    prefer practical scenarios. Keep it under 2 sentences.";

/// Question generation prompt template. Replace `{context_json}` before sending.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Propose the next interview question.

INTERVIEW CONTEXT (recent transcript, suggested level, what to avoid):
{context_json}

Return a JSON object with this EXACT schema:
{
  "id": "short-stable-id",
  "level": "basic|intermediate|advanced|scenario",
  "prompt": "question text",
  "concepts_required": ["concepts", "the answer must cover"],
  "acceptable_terms": ["synonyms", "bonus terms"],
  "model_answer": "ideal concise answer"
}

HARD RULES:
1. Do NOT reuse any id listed in avoid_ids
2. Do NOT repeat or paraphrase any prompt listed in avoid_prompts
3. Stay at suggest_level unless the transcript clearly calls for another level
4. Focus on spreadsheet skills only"#;
