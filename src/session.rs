//! Drives a [`QuizEngine`] against a provider by awaiting each request in turn.

use crate::config::QuizConfig;
use crate::engine::{BatchOutcome, QuizEngine};
use crate::error::QuizError;
use crate::models::{AnswerOutcome, Phase, QuizSnapshot};
use crate::provider::QuestionProvider;

pub struct QuizSession<P> {
    engine: QuizEngine,
    provider: P,
}

impl<P: QuestionProvider> QuizSession<P> {
    pub fn new(config: QuizConfig, provider: P) -> Self {
        Self {
            engine: QuizEngine::new(config),
            provider,
        }
    }

    /// Starts (or restarts) the quiz and waits for the first level to load.
    pub async fn start(&mut self) -> Result<Phase, QuizError> {
        self.engine.start_quiz();
        self.fetch_pending().await
    }

    pub fn submit_answer(&mut self, choice: &str) -> Result<AnswerOutcome, QuizError> {
        self.engine.submit_answer(choice)
    }

    /// Advances, loading the next level when the current one is done.
    pub async fn advance(&mut self) -> Result<Phase, QuizError> {
        let phase = self.engine.advance()?;
        if phase == Phase::LevelTransition {
            return self.fetch_pending().await;
        }
        Ok(phase)
    }

    /// Re-issues the outstanding request after a failed fetch.
    pub async fn retry(&mut self) -> Result<Phase, QuizError> {
        if self.engine.pending_request().is_none() {
            return Err(QuizError::InvalidState(
                "no question request to retry".to_string(),
            ));
        }
        self.fetch_pending().await
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn fetch_pending(&mut self) -> Result<Phase, QuizError> {
        let Some(request) = self.engine.pending_request() else {
            return Ok(self.engine.phase());
        };

        let result = self
            .provider
            .fetch_batch(request.difficulty, request.count)
            .await;
        match self.engine.receive_batch(request, result)? {
            BatchOutcome::Applied(phase) => Ok(phase),
            BatchOutcome::Discarded => Ok(self.engine.phase()),
        }
    }
}
