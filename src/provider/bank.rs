use std::fs;
use std::path::Path;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::{place_options, QuestionProvider};
use crate::error::{LoadError, QuizError};
use crate::models::{Difficulty, Question, RawQuestion};

/// One entry of a question bank file.
#[derive(Debug, Clone, Deserialize)]
pub struct BankRecord {
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl BankRecord {
    fn to_raw(&self) -> RawQuestion {
        RawQuestion {
            question_text: self.question.clone(),
            correct_answer: self.correct_answer.clone(),
            incorrect_answers: self.incorrect_answers.clone(),
        }
    }
}

/// Reads and validates a JSON array of [`BankRecord`]s.
pub fn load_question_bank<P: AsRef<Path>>(path: P) -> Result<Vec<BankRecord>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<BankRecord> =
        serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if records.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(records)
}

/// Offline provider serving questions from a local bank.
pub struct JsonQuestionBank {
    records: Vec<BankRecord>,
}

impl JsonQuestionBank {
    /// Fails if any record could not be turned into a question.
    pub fn new(records: Vec<BankRecord>) -> Result<Self, QuizError> {
        for record in &records {
            record.to_raw().validate()?;
        }
        Ok(Self { records })
    }

    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let records = load_question_bank(path)?;
        Self::new(records)
    }

    /// Number of questions available at `difficulty`.
    pub fn available(&self, difficulty: Difficulty) -> usize {
        self.records
            .iter()
            .filter(|r| r.difficulty == difficulty)
            .count()
    }

    fn sample(&self, difficulty: Difficulty, count: usize) -> Result<Vec<RawQuestion>, QuizError> {
        let matching: Vec<&BankRecord> = self
            .records
            .iter()
            .filter(|r| r.difficulty == difficulty)
            .collect();

        if matching.len() < count {
            return Err(QuizError::MalformedResponse(format!(
                "question bank has {} {} questions, {} needed",
                matching.len(),
                difficulty,
                count
            )));
        }

        let mut rng = rand::thread_rng();
        Ok(matching
            .choose_multiple(&mut rng, count)
            .map(|record| record.to_raw())
            .collect())
    }
}

#[async_trait]
impl QuestionProvider for JsonQuestionBank {
    async fn fetch_batch(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, QuizError> {
        let raw = self.sample(difficulty, count)?;
        Ok(raw.into_iter().map(place_options).collect())
    }
}
