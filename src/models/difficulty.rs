use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest level still served easy questions.
const EASY_MAX_LEVEL: u32 = 30;
/// Highest level still served medium questions.
const MEDIUM_MAX_LEVEL: u32 = 70;

/// Question difficulty, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The lowercase name used by the trivia API and the question bank.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a level to the difficulty of the questions requested for it.
///
/// Total over every `u32`; levels past the hard threshold stay hard.
pub fn difficulty_for(level: u32) -> Difficulty {
    if level <= EASY_MAX_LEVEL {
        Difficulty::Easy
    } else if level <= MEDIUM_MAX_LEVEL {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}
