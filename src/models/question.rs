use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// A multiple-choice question ready to be shown.
///
/// The correct answer appears exactly once in `options`. Fields are private so
/// a question cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_answer: String,
}

impl Question {
    /// Builds a question, checking that `correct_answer` occurs exactly once in `options`.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuizError> {
        let text = text.into();
        let correct_answer = correct_answer.into();

        if text.trim().is_empty() {
            return Err(QuizError::MalformedResponse("question text is empty".to_string()));
        }

        let occurrences = options.iter().filter(|o| **o == correct_answer).count();
        if occurrences != 1 {
            return Err(QuizError::MalformedResponse(format!(
                "correct answer {:?} appears {} times in options",
                correct_answer, occurrences
            )));
        }

        Ok(Self {
            text,
            options,
            correct_answer,
        })
    }

    /// Used by the placement policy, whose input has already been validated.
    pub(crate) fn from_parts(text: String, options: Vec<String>, correct_answer: String) -> Self {
        Self {
            text,
            options,
            correct_answer,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Position of the correct answer within `options`.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }
}

/// A question as delivered by a provider, before the answers are shuffled together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question_text: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl RawQuestion {
    /// Rejects records a question cannot be built from.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.question_text.trim().is_empty() {
            return Err(QuizError::MalformedResponse("question text is empty".to_string()));
        }
        if self.correct_answer.trim().is_empty() {
            return Err(QuizError::MalformedResponse(format!(
                "question {:?} has an empty correct answer",
                self.question_text
            )));
        }
        if self.incorrect_answers.is_empty() {
            return Err(QuizError::MalformedResponse(format!(
                "question {:?} has no incorrect answers",
                self.question_text
            )));
        }
        if self.incorrect_answers.contains(&self.correct_answer) {
            return Err(QuizError::MalformedResponse(format!(
                "question {:?} lists its correct answer among the incorrect ones",
                self.question_text
            )));
        }
        Ok(())
    }
}
