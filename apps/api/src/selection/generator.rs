//! Generator-backed question selection.
//!
//! Flow: build context → generator call (bounded) → apply defaults →
//! de-dup against used ids and recent prompts → fallback pool on collision.
//!
//! Failures come back as `ServiceError`; the session decides what to do.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::capabilities::bounded;
use crate::errors::ServiceError;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::LlmClient;
use crate::models::interview::ChatMessage;
use crate::models::question::{Level, QuestionRecord};
use crate::selection::choose_level;
use crate::selection::pool::{
    fallback_alt, fallback_prompt, make_id, normalize_prompt, normalized_set, GENERIC_CONCEPTS,
    GENERIC_MODEL_ANSWER, GENERIC_TERMS,
};
use crate::selection::prompts::{GENERATION_PROMPT_TEMPLATE, GENERATION_TASK};

pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(20);
const TRANSCRIPT_WINDOW: usize = 8;
const AVOID_IDS_LIMIT: usize = 50;
const MAX_SENTENCES: u8 = 2;
const GENERATION_TEMPERATURE: f32 = 0.4;

/// Everything the generator is told about the interview so far.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationContext {
    pub transcript: Vec<ChatMessage>,
    pub suggest_level: Level,
    pub avoid_ids: Vec<String>,
    pub avoid_prompts: Vec<String>,
    pub max_sentences: u8,
}

impl GenerationContext {
    pub fn build(
        transcript: &[ChatMessage],
        scores: &[f64],
        used_ids: &HashSet<String>,
        recent_prompts: &[String],
    ) -> Self {
        let start = transcript.len().saturating_sub(TRANSCRIPT_WINDOW);
        let mut avoid_ids: Vec<String> = used_ids.iter().cloned().collect();
        avoid_ids.sort();
        let skip = avoid_ids.len().saturating_sub(AVOID_IDS_LIMIT);
        let mut avoid_prompts: Vec<String> =
            normalized_set(recent_prompts).into_iter().collect();
        avoid_prompts.sort();

        Self {
            transcript: transcript[start..].to_vec(),
            suggest_level: choose_level(scores),
            avoid_ids: avoid_ids.into_iter().skip(skip).collect(),
            avoid_prompts,
            max_sentences: MAX_SENTENCES,
        }
    }
}

/// Raw generator output. Every field may be missing; defaults are applied
/// when the record is built.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedQuestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub concepts_required: Option<Vec<String>>,
    #[serde(default)]
    pub acceptable_terms: Option<Vec<String>>,
    #[serde(default)]
    pub model_answer: Option<String>,
}

impl GeneratedQuestion {
    /// Builds an independent record with defaults filled in.
    pub fn into_record(self, suggested: Level, recent: &HashSet<String>) -> QuestionRecord {
        let non_empty = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let level = self
            .level
            .as_deref()
            .and_then(Level::parse)
            .unwrap_or(suggested);
        let prompt = non_empty(self.prompt)
            .unwrap_or_else(|| fallback_prompt(suggested, recent).to_string());
        let id = non_empty(self.id).unwrap_or_else(|| make_id(&prompt));

        QuestionRecord {
            id,
            level,
            concepts_required: self
                .concepts_required
                .unwrap_or_else(|| GENERIC_CONCEPTS.iter().map(|s| s.to_string()).collect()),
            acceptable_terms: self
                .acceptable_terms
                .unwrap_or_else(|| GENERIC_TERMS.iter().map(|s| s.to_string()).collect()),
            model_answer: non_empty(self.model_answer)
                .unwrap_or_else(|| GENERIC_MODEL_ANSWER.to_string()),
            prompt,
        }
    }
}

/// Produces a candidate next question.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, context: &GenerationContext)
        -> Result<GeneratedQuestion, ServiceError>;
}

pub struct LlmQuestionGenerator(pub LlmClient);

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(
        &self,
        context: &GenerationContext,
    ) -> Result<GeneratedQuestion, ServiceError> {
        let context_json = serde_json::to_string_pretty(context)
            .map_err(|e| ServiceError::Malformed(format!("failed to serialize context: {e}")))?;
        let prompt = GENERATION_PROMPT_TEMPLATE.replace("{context_json}", &context_json);
        let generated = self
            .0
            .call_json(
                &prompt,
                &system_prompt(GENERATION_TASK),
                Some(GENERATION_TEMPERATURE),
            )
            .await?;
        Ok(generated)
    }
}

/// Asks the generator for the next question, then defaults and de-duplicates
/// the result. Collisions are replaced from the fallback pool, never surfaced.
pub async fn next_from_generator(
    generator: &dyn QuestionGenerator,
    transcript: &[ChatMessage],
    scores: &[f64],
    used_ids: &HashSet<String>,
    recent_prompts: &[String],
) -> Result<QuestionRecord, ServiceError> {
    let context = GenerationContext::build(transcript, scores, used_ids, recent_prompts);
    let level = context.suggest_level;
    let generated = bounded(GENERATION_TIMEOUT, generator.generate(&context)).await?;

    let recent = normalized_set(recent_prompts);
    let record = generated.into_record(level, &recent);

    if used_ids.contains(&record.id) || recent.contains(&normalize_prompt(&record.prompt)) {
        warn!(
            "Generated question {} repeats an earlier one; substituting a pool question",
            record.id
        );
        return Ok(fallback_alt(level, &recent));
    }

    info!("Generated question {} at level {}", record.id, record.level.as_str());
    Ok(record)
}
