mod difficulty;
mod question;
mod state;

pub use difficulty::{difficulty_for, Difficulty};
pub use question::{Question, RawQuestion};
pub use state::{AnswerOutcome, AnswerRecord, Phase, QuizSnapshot};
