use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::interview::InterviewSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one interview this process runs. Handlers hold the lock for the
    /// whole event, so events never interleave.
    pub session: Arc<Mutex<InterviewSession>>,
    pub config: Config,
}

impl AppState {
    pub fn new(session: InterviewSession, config: Config) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            config,
        }
    }
}
