//! External grading: pluggable grader behind the `AnswerGrader` trait.
//!
//! Default backend: `LlmAnswerGrader`. Tests inject their own implementations.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::capabilities::bounded;
use crate::errors::ServiceError;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::LlmClient;
use crate::models::question::QuestionRecord;
use crate::models::score::{round2, Rationale, ScoreResult, ScoringWeights, MAX_SCORE};
use crate::scoring::prompts::{GRADE_PROMPT_TEMPLATE, GRADE_TASK};

pub const SCORING_TIMEOUT: Duration = Duration::from_secs(20);

/// Grades one answer along the four rubric dimensions.
#[async_trait]
pub trait AnswerGrader: Send + Sync {
    async fn grade(&self, question: &QuestionRecord, answer: &str)
        -> Result<ScoreResult, ServiceError>;
}

/// Grade payload as returned by the model. All four dimensions and the total
/// are required; a reply missing any of them is malformed.
#[derive(Debug, Deserialize)]
pub struct GradePayload {
    pub accuracy: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub depth: f64,
    pub total: f64,
    #[serde(default)]
    pub corrections: Vec<String>,
}

impl GradePayload {
    pub fn into_score(self) -> ScoreResult {
        let bound = |v: f64| round2(if v.is_finite() { v.clamp(0.0, MAX_SCORE) } else { 0.0 });
        ScoreResult {
            accuracy: bound(self.accuracy),
            completeness: bound(self.completeness),
            clarity: bound(self.clarity),
            depth: bound(self.depth),
            total: bound(self.total),
            rationale: Rationale::Llm,
            corrections: self.corrections,
        }
    }
}

pub struct LlmAnswerGrader(pub LlmClient);

#[async_trait]
impl AnswerGrader for LlmAnswerGrader {
    async fn grade(
        &self,
        question: &QuestionRecord,
        answer: &str,
    ) -> Result<ScoreResult, ServiceError> {
        let payload = json!({
            "question": question.prompt,
            "answer": answer,
        });
        let prompt = GRADE_PROMPT_TEMPLATE.replace("{payload_json}", &payload.to_string());
        let grade: GradePayload = self
            .0
            .call_json(&prompt, &system_prompt(GRADE_TASK), None)
            .await?;
        Ok(grade.into_score())
    }
}

/// External score for one answer, bounded by `SCORING_TIMEOUT`.
///
/// Whatever the grader returns, dimensions are clamped to [0, 5] and the
/// total is recomputed from them with the session's weights, so a hybrid
/// merge stays a weighted sum.
pub async fn score_external(
    grader: &dyn AnswerGrader,
    answer: &str,
    question: &QuestionRecord,
    weights: &ScoringWeights,
) -> Result<ScoreResult, ServiceError> {
    let grade = bounded(SCORING_TIMEOUT, grader.grade(question, answer)).await?;
    Ok(normalize_grade(grade, weights))
}

fn normalize_grade(grade: ScoreResult, weights: &ScoringWeights) -> ScoreResult {
    let bound = |v: f64| round2(if v.is_finite() { v.clamp(0.0, MAX_SCORE) } else { 0.0 });
    let mut score = ScoreResult {
        accuracy: bound(grade.accuracy),
        completeness: bound(grade.completeness),
        clarity: bound(grade.clarity),
        depth: bound(grade.depth),
        total: 0.0,
        rationale: grade.rationale,
        corrections: grade.corrections,
    };
    score.total = score.weighted_total(weights).clamp(0.0, MAX_SCORE);
    score
}
