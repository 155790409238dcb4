//! Axum route handlers for the Interview API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::{SessionError, SessionView, TurnOutcome};
use crate::models::interview::{ChatMessage, ReportSnapshot};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub adaptive: bool,
}

/// Result of an event plus the session as it looks afterwards.
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    #[serde(flatten)]
    pub outcome: TurnOutcome,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub messages: Vec<ChatMessage>,
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Conflict(e.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interview
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(session.view())
}

/// POST /api/v1/interview/start
///
/// Greets and asks the first question. Calling it again is harmless, and it
/// picks the interview back up if an earlier request was dropped mid-turn.
pub async fn handle_start(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.start().await;
    Json(session.view())
}

/// POST /api/v1/interview/input
///
/// Chat-style input: `hint` and `skip` are commands, anything else is an answer.
pub async fn handle_input(
    State(state): State<AppState>,
    Json(request): Json<InputRequest>,
) -> Json<TurnResponse> {
    let mut session = state.session.lock().await;
    let outcome = session.handle_input(&request.text).await;
    Json(TurnResponse {
        outcome,
        session: session.view(),
    })
}

/// POST /api/v1/interview/answer
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(request): Json<InputRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation(
            "text cannot be empty; use /skip to move on".to_string(),
        ));
    }
    let mut session = state.session.lock().await;
    let outcome = session.submit_answer(&request.text).await;
    Ok(Json(TurnResponse {
        outcome,
        session: session.view(),
    }))
}

/// POST /api/v1/interview/hint
pub async fn handle_hint(State(state): State<AppState>) -> Json<TurnResponse> {
    let mut session = state.session.lock().await;
    let outcome = session.hint().await;
    Json(TurnResponse {
        outcome,
        session: session.view(),
    })
}

/// POST /api/v1/interview/skip
pub async fn handle_skip(State(state): State<AppState>) -> Json<TurnResponse> {
    let mut session = state.session.lock().await;
    let outcome = session.skip().await;
    Json(TurnResponse {
        outcome,
        session: session.view(),
    })
}

/// PUT /api/v1/interview/mode
///
/// 409 when adaptive mode is requested but no external assistant is configured.
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    session.set_adaptive(request.adaptive)?;
    Ok(Json(session.view()))
}

/// POST /api/v1/interview/restart
///
/// Discards the current interview and immediately starts a new one.
pub async fn handle_restart(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.reset();
    session.start().await;
    Json(session.view())
}

/// GET /api/v1/interview/transcript
pub async fn handle_transcript(State(state): State<AppState>) -> Json<TranscriptResponse> {
    let session = state.session.lock().await;
    Json(TranscriptResponse {
        messages: session.transcript().to_vec(),
    })
}

/// GET /api/v1/interview/report
///
/// 409 until the interview is complete.
pub async fn handle_report(
    State(state): State<AppState>,
) -> Result<Json<ReportSnapshot>, AppError> {
    let session = state.session.lock().await;
    session
        .report()
        .map(Json)
        .ok_or_else(|| AppError::Conflict("interview is not complete yet".to_string()))
}
