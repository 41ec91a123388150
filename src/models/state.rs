use serde::Serialize;

use super::Question;

/// Where a quiz session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Waiting for the first batch of a new quiz.
    Loading,
    /// A batch is loaded and questions can be answered.
    Active,
    /// The previous level is done and the next batch is being fetched.
    LevelTransition,
    /// The last level is complete.
    Finished,
}

impl Phase {
    /// True while a batch request is outstanding.
    pub fn is_waiting(self) -> bool {
        matches!(self, Phase::Loading | Phase::LevelTransition)
    }
}

/// Verdict for a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub choice: String,
    pub correct: bool,
    pub correct_answer: String,
}

/// One judged question, kept for the results breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub level: u32,
    pub question_text: String,
    pub choice: String,
    pub correct_answer: String,
    pub correct: bool,
}

/// Read-only view of a session, polled by the view layer after each operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSnapshot {
    pub level: u32,
    pub max_level: u32,
    pub question_index: usize,
    pub questions_per_level: usize,
    pub score: usize,
    pub max_score: usize,
    pub phase: Phase,
    pub current_question: Option<Question>,
    /// Set once the current question has been answered and until `advance`.
    pub answer: Option<AnswerOutcome>,
    pub progress: f64,
}
