pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/interview", get(handlers::handle_get_session))
        .route("/api/v1/interview/start", post(handlers::handle_start))
        .route("/api/v1/interview/input", post(handlers::handle_input))
        .route("/api/v1/interview/answer", post(handlers::handle_answer))
        .route("/api/v1/interview/hint", post(handlers::handle_hint))
        .route("/api/v1/interview/skip", post(handlers::handle_skip))
        .route("/api/v1/interview/mode", put(handlers::handle_set_mode))
        .route("/api/v1/interview/restart", post(handlers::handle_restart))
        .route(
            "/api/v1/interview/transcript",
            get(handlers::handle_transcript),
        )
        .route("/api/v1/interview/report", get(handlers::handle_report))
        .with_state(state)
}
