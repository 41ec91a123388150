//! Question sources.
//!
//! A provider turns a difficulty and a count into a batch of ready questions,
//! with the correct answer already placed among the distractors.

mod bank;
mod opentdb;
mod placement;

use async_trait::async_trait;

use crate::error::QuizError;
use crate::models::{Difficulty, Question};

pub use bank::{load_question_bank, BankRecord, JsonQuestionBank};
pub use opentdb::{OpenTdbProvider, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use placement::{place_options, place_options_with};

#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetches `count` questions of the given difficulty.
    ///
    /// Fails with `ProviderUnavailable` when the source cannot be reached and
    /// with `MalformedResponse` when it answers with fewer than `count` usable
    /// questions.
    async fn fetch_batch(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, QuizError>;
}
