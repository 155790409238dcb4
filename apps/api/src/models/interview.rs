use serde::{Deserialize, Serialize};

use crate::models::question::QuestionRecord;
use crate::models::score::ScoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    Assistant,
    User,
}

/// One line of the interview transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// One answered (or skipped) question. Append-only; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: QuestionRecord,
    /// Empty when the question was skipped.
    pub answer: String,
    pub score: ScoreResult,
    pub elapsed_seconds: u64,
}

/// Categorical outcome derived from the overall mean score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    Pass,
    Borderline,
    Fail,
}

impl Band {
    pub fn from_score(overall: f64) -> Band {
        if overall >= 3.5 {
            Band::Pass
        } else if overall >= 2.0 {
            Band::Borderline
        } else {
            Band::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Pass => "PASS",
            Band::Borderline => "BORDERLINE",
            Band::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterviewOutcome {
    pub overall: f64,
    pub band: Band,
}

/// Finalized, index-aligned snapshot handed to the reporting side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub questions: Vec<QuestionRecord>,
    pub answers: Vec<String>,
    pub scores: Vec<ScoreResult>,
    pub elapsed_seconds: Vec<u64>,
    pub overall: f64,
    pub band: Band,
}

impl ReportSnapshot {
    pub fn from_history(history: &[HistoryEntry], outcome: InterviewOutcome) -> Self {
        Self {
            questions: history.iter().map(|h| h.question.clone()).collect(),
            answers: history.iter().map(|h| h.answer.clone()).collect(),
            scores: history.iter().map(|h| h.score.clone()).collect(),
            elapsed_seconds: history.iter().map(|h| h.elapsed_seconds).collect(),
            overall: outcome.overall,
            band: outcome.band,
        }
    }
}
