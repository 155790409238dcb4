//! Interview session: the state machine that drives one mock interview.
//!
//! Lifecycle:
//! ```text
//! Idle ──start──▶ AwaitingAnswer ──answer/skip──▶ Scoring ──▶ AwaitingAnswer
//!                                                        └──▶ Complete
//! ```
//!
//! Every event runs to completion while the caller holds the session lock.
//! External failures never escape: they downgrade the session to
//! deterministic mode and the local path takes over.

pub mod handlers;
pub mod hint;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::capabilities::{bounded, Capabilities};
use crate::config::Config;
use crate::interview::hint::{local_hint, HINT_TIMEOUT};
use crate::models::interview::{
    Band, ChatMessage, HistoryEntry, InterviewOutcome, ReportSnapshot,
};
use crate::models::question::{Level, QuestionRecord};
use crate::models::score::ScoreResult;
use crate::scoring::grader::score_external;
use crate::scoring::merge::merge;
use crate::scoring::rubric::{score_keyword, ScoringConfig};
use crate::selection::generator::next_from_generator;
use crate::selection::next_from_bank;

const GREETING: &str = "Hi! I'll run your Excel mock interview. I'll ask one question at a time. \
    Say hint if you'd like a nudge, or skip to move on.";
const SKIPPED: &str = "Skipped. I'll move on.";
const NO_ASSISTANT_REASON: &str = "No external assistant configured";

// ────────────────────────────────────────────────────────────────────────────
// Settings, phases and outcomes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterviewSettings {
    /// Questions per interview (answered or skipped).
    pub num_questions: usize,
    pub scoring: ScoringConfig,
    /// Start every session without the external assistant.
    pub deterministic_only: bool,
}

impl InterviewSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            num_questions: config.num_questions,
            scoring: ScoringConfig {
                weights: config.weights,
                hit_threshold: config.keyword_hit_threshold,
            },
            deterministic_only: config.deterministic_only,
        }
    }
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            num_questions: 7,
            scoring: ScoringConfig::default(),
            deterministic_only: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    AwaitingAnswer,
    Scoring,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Adaptive,
    Deterministic,
}

/// What a single event did to the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// The session was not waiting for this event; no state change.
    Deferred,
    Hint { text: String },
    /// The answer was recorded and the next question asked.
    Advanced { score: ScoreResult },
    Completed { overall: f64, band: Band },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("adaptive mode needs an external assistant and none is configured")]
    NoCapability,
}

// ────────────────────────────────────────────────────────────────────────────
// Read-only view
// ────────────────────────────────────────────────────────────────────────────

/// The current question as shown to the candidate. No model answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentQuestion {
    pub id: String,
    pub level: Level,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub phase: Phase,
    pub current: Option<CurrentQuestion>,
    pub elapsed_seconds: u64,
    pub mode: Mode,
    pub mode_reason: Option<String>,
    pub asked: usize,
    pub budget: usize,
    pub answered: usize,
    pub outcome: Option<InterviewOutcome>,
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

struct SessionState {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    asked_count: usize,
    used_ids: HashSet<String>,
    scores: Vec<f64>,
    history: Vec<HistoryEntry>,
    current: Option<QuestionRecord>,
    question_started: Option<Instant>,
    phase: Phase,
    deterministic_only: bool,
    mode_reason: Option<String>,
    transcript: Vec<ChatMessage>,
    greeted: bool,
    outcome: Option<InterviewOutcome>,
}

impl SessionState {
    fn new(deterministic_only: bool, mode_reason: Option<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            asked_count: 0,
            used_ids: HashSet::new(),
            scores: Vec::new(),
            history: Vec::new(),
            current: None,
            question_started: None,
            phase: Phase::Idle,
            deterministic_only,
            mode_reason,
            transcript: Vec::new(),
            greeted: false,
            outcome: None,
        }
    }
}

pub struct InterviewSession {
    bank: Arc<QuestionBank>,
    capabilities: Capabilities,
    settings: InterviewSettings,
    state: SessionState,
}

impl InterviewSession {
    pub fn new(bank: Arc<QuestionBank>, capabilities: Capabilities, settings: InterviewSettings) -> Self {
        let state = Self::fresh_state(&capabilities, &settings);
        Self {
            bank,
            capabilities,
            settings,
            state,
        }
    }

    fn fresh_state(capabilities: &Capabilities, settings: &InterviewSettings) -> SessionState {
        if !capabilities.any() {
            SessionState::new(true, Some(NO_ASSISTANT_REASON.to_string()))
        } else {
            SessionState::new(settings.deterministic_only, None)
        }
    }

    fn adaptive(&self) -> bool {
        !self.state.deterministic_only
    }

    fn awaiting_answer(&self) -> bool {
        self.state.phase == Phase::AwaitingAnswer
    }

    /// Permanent for this session unless the user re-enables adaptive mode.
    fn downgrade(&mut self, reason: String) {
        warn!(
            "Session {} switching to deterministic mode: {}",
            self.state.session_id, reason
        );
        self.state.deterministic_only = true;
        self.state.mode_reason = Some(reason);
    }

    fn elapsed_on_current(&self) -> u64 {
        self.state
            .question_started
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0)
    }

    fn asked_prompts(&self) -> Vec<String> {
        self.state
            .history
            .iter()
            .map(|h| h.question.prompt.clone())
            .chain(self.state.current.iter().map(|q| q.prompt.clone()))
            .collect()
    }

    // ── Events ──────────────────────────────────────────────────────────────

    /// Greets the candidate and asks the first question. Also resumes a
    /// session whose previous event was cut off between recording an answer
    /// and asking the next question. No-op otherwise.
    pub async fn start(&mut self) {
        match self.state.phase {
            Phase::Idle => {
                if !self.state.greeted {
                    info!("Starting interview session {}", self.state.session_id);
                    self.state.transcript.push(ChatMessage::assistant(GREETING));
                    self.state.greeted = true;
                }
                self.ask_next().await;
            }
            Phase::Scoring => {
                warn!(
                    "Session {} resuming after an interrupted turn",
                    self.state.session_id
                );
                if self.state.asked_count < self.settings.num_questions {
                    self.ask_next().await;
                } else {
                    self.complete();
                }
            }
            Phase::AwaitingAnswer | Phase::Complete => {
                debug!("start ignored: session {} already running", self.state.session_id);
            }
        }
    }

    /// Selects and records the next question. Idempotent while a question is
    /// outstanding, and does nothing once the interview is complete.
    pub async fn ask_next(&mut self) {
        if matches!(self.state.phase, Phase::AwaitingAnswer | Phase::Complete) {
            return;
        }

        let mut question = self.select().await;
        if self.state.used_ids.contains(&question.id) {
            warn!("Question {} was already asked; retrying from the bank", question.id);
            question = next_from_bank(&self.bank, &self.state.used_ids, &self.state.scores);
        }

        self.state.asked_count += 1;
        info!(
            "Asking question {}/{}: {} ({})",
            self.state.asked_count,
            self.settings.num_questions,
            question.id,
            question.level.as_str()
        );
        self.state.used_ids.insert(question.id.clone());
        self.state
            .transcript
            .push(ChatMessage::assistant(question.prompt.clone()));
        self.state.current = Some(question);
        self.state.question_started = Some(Instant::now());
        self.state.phase = Phase::AwaitingAnswer;
    }

    async fn select(&mut self) -> QuestionRecord {
        if self.adaptive() {
            if let Some(generator) = self.capabilities.generator.clone() {
                let recent = self.asked_prompts();
                let generated = next_from_generator(
                    generator.as_ref(),
                    &self.state.transcript,
                    &self.state.scores,
                    &self.state.used_ids,
                    &recent,
                )
                .await;
                match generated {
                    Ok(question) => return question,
                    Err(e) => self.downgrade(format!("LLM unavailable: {}", e.category())),
                }
            }
        }
        next_from_bank(&self.bank, &self.state.used_ids, &self.state.scores)
    }

    /// Scores an answer to the current question and moves on.
    pub async fn submit_answer(&mut self, text: &str) -> TurnOutcome {
        if !self.awaiting_answer() {
            debug!("Answer deferred: no question is awaiting an answer");
            return TurnOutcome::Deferred;
        }
        let text = text.trim();
        if !text.is_empty() {
            self.state.transcript.push(ChatMessage::user(text));
        }
        self.score_answer(text).await
    }

    async fn score_answer(&mut self, text: &str) -> TurnOutcome {
        let Some(question) = self.state.current.clone().filter(|_| self.awaiting_answer()) else {
            return TurnOutcome::Deferred;
        };

        let elapsed = self.elapsed_on_current();
        let keyword = score_keyword(text, &question, &self.settings.scoring);

        let mut external = None;
        if self.adaptive() {
            if let Some(grader) = self.capabilities.grader.clone() {
                let graded = score_external(
                    grader.as_ref(),
                    text,
                    &question,
                    &self.settings.scoring.weights,
                )
                .await;
                match graded {
                    Ok(score) => external = Some(score),
                    Err(e) => self.downgrade(format!("LLM scoring error: {}", e.category())),
                }
            }
        }

        let score = merge(keyword, external);
        self.state
            .transcript
            .push(ChatMessage::assistant(feedback_line(&score, elapsed)));
        self.advance(question, text.to_string(), score, elapsed).await
    }

    /// Records an empty answer for the current question and moves on.
    pub async fn skip(&mut self) -> TurnOutcome {
        let Some(question) = self.state.current.clone().filter(|_| self.awaiting_answer()) else {
            return TurnOutcome::Deferred;
        };
        let elapsed = self.elapsed_on_current();
        let score = score_keyword("", &question, &self.settings.scoring);
        self.state.transcript.push(ChatMessage::assistant(SKIPPED));
        self.advance(question, String::new(), score, elapsed).await
    }

    /// Nudges the candidate on the current question. Never changes phase and
    /// never downgrades the session.
    pub async fn hint(&mut self) -> TurnOutcome {
        let Some(question) = self.state.current.clone().filter(|_| self.awaiting_answer()) else {
            return TurnOutcome::Deferred;
        };

        let hinter = self.capabilities.hinter.clone().filter(|_| self.adaptive());
        let text = match hinter {
            Some(hinter) => {
                let reply =
                    bounded(HINT_TIMEOUT, hinter.hint(&question, &self.state.transcript)).await;
                reply.unwrap_or_else(|e| {
                    warn!("Hint provider failed ({}); using local hint", e.category());
                    local_hint(&question)
                })
            }
            None => local_hint(&question),
        };

        self.state
            .transcript
            .push(ChatMessage::assistant(format!("Hint: {text}")));
        TurnOutcome::Hint { text }
    }

    /// Chat-style dispatch: `hint` and `skip` are commands, anything else is
    /// an answer. Every non-blank input is logged to the transcript, even
    /// when the session defers it.
    pub async fn handle_input(&mut self, text: &str) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }
        self.state.transcript.push(ChatMessage::user(text));
        if text.eq_ignore_ascii_case("hint") {
            self.hint().await
        } else if text.eq_ignore_ascii_case("skip") {
            self.skip().await
        } else {
            self.score_answer(text).await
        }
    }

    async fn advance(
        &mut self,
        question: QuestionRecord,
        answer: String,
        score: ScoreResult,
        elapsed_seconds: u64,
    ) -> TurnOutcome {
        info!(
            "Recorded {} for {}: total {:.2} ({:?}) in {}s",
            if answer.is_empty() { "skip" } else { "answer" },
            question.id,
            score.total,
            score.rationale,
            elapsed_seconds
        );
        self.state.scores.push(score.total);
        self.state.history.push(HistoryEntry {
            question,
            answer,
            score: score.clone(),
            elapsed_seconds,
        });
        self.state.current = None;
        self.state.question_started = None;
        self.state.phase = Phase::Scoring;

        if self.state.asked_count < self.settings.num_questions {
            self.ask_next().await;
            TurnOutcome::Advanced { score }
        } else {
            let outcome = self.complete();
            TurnOutcome::Completed {
                overall: outcome.overall,
                band: outcome.band,
            }
        }
    }

    fn complete(&mut self) -> InterviewOutcome {
        let scores = &self.state.scores;
        let overall = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        let outcome = InterviewOutcome {
            overall,
            band: Band::from_score(overall),
        };
        info!(
            "Interview {} complete: overall {:.2} -> {}",
            self.state.session_id,
            overall,
            outcome.band.as_str()
        );
        self.state.transcript.push(ChatMessage::assistant(format!(
            "That's the end. Overall score: {:.2}/5 -> {}.",
            overall,
            outcome.band.as_str()
        )));
        self.state.outcome = Some(outcome);
        self.state.phase = Phase::Complete;
        outcome
    }

    /// Explicit mode toggle. Enabling needs at least one external capability
    /// and clears the previous downgrade reason.
    pub fn set_adaptive(&mut self, enabled: bool) -> Result<Mode, SessionError> {
        if enabled {
            if !self.capabilities.any() {
                return Err(SessionError::NoCapability);
            }
            info!("Session {} switched to adaptive mode", self.state.session_id);
            self.state.deterministic_only = false;
            self.state.mode_reason = None;
        } else {
            info!("Session {} switched to deterministic mode", self.state.session_id);
            self.state.deterministic_only = true;
        }
        Ok(self.mode())
    }

    /// Discards everything and starts over with a new session id.
    pub fn reset(&mut self) {
        info!("Resetting interview session {}", self.state.session_id);
        self.state = Self::fresh_state(&self.capabilities, &self.settings);
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        if self.adaptive() {
            Mode::Adaptive
        } else {
            Mode::Deterministic
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.state.session_id,
            started_at: self.state.started_at,
            phase: self.phase(),
            current: self.state.current.as_ref().map(|q| CurrentQuestion {
                id: q.id.clone(),
                level: q.level,
                prompt: q.prompt.clone(),
            }),
            elapsed_seconds: self.elapsed_on_current(),
            mode: self.mode(),
            mode_reason: self.state.mode_reason.clone(),
            asked: self.state.asked_count,
            budget: self.settings.num_questions,
            answered: self.history().len(),
            outcome: self.state.outcome,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.state.transcript
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    /// Final snapshot; only available once the interview is complete.
    pub fn report(&self) -> Option<ReportSnapshot> {
        if self.state.phase != Phase::Complete {
            return None;
        }
        self.state
            .outcome
            .map(|outcome| ReportSnapshot::from_history(&self.state.history, outcome))
    }
}

fn feedback_line(score: &ScoreResult, elapsed_seconds: u64) -> String {
    format!(
        "Feedback: accuracy {:.2}, completeness {:.2}, clarity {:.2}, depth {:.2}. \
         Total: {:.2}/5. Time taken: {} sec.",
        score.accuracy, score.completeness, score.clarity, score.depth, score.total, elapsed_seconds
    )
}
