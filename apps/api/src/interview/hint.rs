use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::errors::ServiceError;
use crate::llm_client::LlmClient;
use crate::models::interview::ChatMessage;
use crate::models::question::QuestionRecord;

pub const HINT_TIMEOUT: Duration = Duration::from_secs(15);
const HINT_TEMPERATURE: f32 = 0.5;
const HINT_SYSTEM: &str = "Provide a subtle hint, not the answer. Respond with JSON only.";
const DEFAULT_LLM_HINT: &str = "Think about the function parameters you would need.";
const NO_CONCEPTS_HINT: &str = "Think about the key Excel function(s).";

/// Produces a nudge for the current question without giving the answer away.
#[async_trait]
pub trait HintProvider: Send + Sync {
    async fn hint(
        &self,
        question: &QuestionRecord,
        transcript: &[ChatMessage],
    ) -> Result<String, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct HintPayload {
    #[serde(default)]
    hint: Option<String>,
}

pub struct LlmHintProvider(pub LlmClient);

#[async_trait]
impl HintProvider for LlmHintProvider {
    async fn hint(
        &self,
        question: &QuestionRecord,
        _transcript: &[ChatMessage],
    ) -> Result<String, ServiceError> {
        let payload = json!({
            "question": question.prompt,
            "concepts_required": question.concepts_required,
            "schema": {"hint": "string"},
        });
        let reply: HintPayload = self
            .0
            .call_json(&payload.to_string(), HINT_SYSTEM, Some(HINT_TEMPERATURE))
            .await?;
        Ok(reply
            .hint
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_LLM_HINT.to_string()))
    }
}

/// Hint built from the question's first three required concepts.
pub fn local_hint(question: &QuestionRecord) -> String {
    if question.concepts_required.is_empty() {
        return NO_CONCEPTS_HINT.to_string();
    }
    let first: Vec<&str> = question
        .concepts_required
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();
    format!("Consider: {}", first.join(", "))
}
