use crate::error::QuizError;

/// Number of levels in a full quiz.
pub const DEFAULT_MAX_LEVEL: u32 = 100;
/// Questions asked per level.
pub const DEFAULT_QUESTIONS_PER_LEVEL: usize = 3;
/// Largest batch the trivia API hands out in one request.
pub const MAX_QUESTIONS_PER_LEVEL: usize = 50;

/// Shape of a quiz: how many levels and how many questions each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    max_level: u32,
    questions_per_level: usize,
}

impl QuizConfig {
    pub fn new(max_level: u32, questions_per_level: usize) -> Result<Self, QuizError> {
        if max_level == 0 {
            return Err(QuizError::InvalidConfig(
                "max level must be at least 1".to_string(),
            ));
        }
        if questions_per_level == 0 || questions_per_level > MAX_QUESTIONS_PER_LEVEL {
            return Err(QuizError::InvalidConfig(format!(
                "questions per level must be between 1 and {}, got {}",
                MAX_QUESTIONS_PER_LEVEL, questions_per_level
            )));
        }

        Ok(Self {
            max_level,
            questions_per_level,
        })
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn questions_per_level(&self) -> usize {
        self.questions_per_level
    }

    /// Best achievable score over the whole quiz.
    pub fn max_score(&self) -> usize {
        self.max_level as usize * self.questions_per_level
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            questions_per_level: DEFAULT_QUESTIONS_PER_LEVEL,
        }
    }
}
