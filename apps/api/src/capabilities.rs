use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ServiceError;
use crate::interview::hint::{HintProvider, LlmHintProvider};
use crate::llm_client::LlmClient;
use crate::scoring::grader::{AnswerGrader, LlmAnswerGrader};
use crate::selection::generator::{LlmQuestionGenerator, QuestionGenerator};

/// External assistant capabilities injected into a session.
/// `None` means the capability is not configured; the session then stays on
/// the bank and the keyword rubric for that concern.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub generator: Option<Arc<dyn QuestionGenerator>>,
    pub grader: Option<Arc<dyn AnswerGrader>>,
    pub hinter: Option<Arc<dyn HintProvider>>,
}

impl Capabilities {
    /// No external assistant at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Wires all three capabilities to one shared LLM client.
    pub fn from_llm(llm: LlmClient) -> Self {
        Self {
            generator: Some(Arc::new(LlmQuestionGenerator(llm.clone()))),
            grader: Some(Arc::new(LlmAnswerGrader(llm.clone()))),
            hinter: Some(Arc::new(LlmHintProvider(llm))),
        }
    }

    pub fn any(&self) -> bool {
        self.generator.is_some() || self.grader.is_some() || self.hinter.is_some()
    }
}

/// Runs an external call under a hard time limit. Elapsing the limit is a
/// `ServiceError` like any other failure.
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout {
            seconds: limit.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_capabilities() {
        assert!(!Capabilities::none().any());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let result: Result<(), ServiceError> = bounded(Duration::from_secs(20), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ServiceError::Timeout { seconds: 20 })));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_result() {
        let result = bounded(Duration::from_secs(1), async { Ok::<_, ServiceError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
