use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{place_options, QuestionProvider};
use crate::error::QuizError;
use crate::models::{Difficulty, Question, RawQuestion};

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const RESPONSE_OK: u8 = 0;
const RESPONSE_NO_RESULTS: u8 = 1;
const RESPONSE_INVALID_PARAMETER: u8 = 2;
const RESPONSE_RATE_LIMIT: u8 = 5;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

/// Every string field is base64 encoded, since the request asks for `encode=base64`.
#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

/// Multiple-choice questions from the Open Trivia Database.
#[derive(Debug, Clone)]
pub struct OpenTdbProvider {
    client: reqwest::Client,
    api_url: String,
}

impl OpenTdbProvider {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, QuizError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuizError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl QuestionProvider for OpenTdbProvider {
    async fn fetch_batch(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, QuizError> {
        debug!(url = %self.api_url, %difficulty, count, "fetching questions");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("amount", count.to_string()),
                ("difficulty", difficulty.to_string()),
                ("type", "multiple".to_string()),
                ("encode", "base64".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let raw = parse_response(&body, count)?;
        Ok(raw.into_iter().map(place_options).collect())
    }
}

fn parse_response(body: &str, count: usize) -> Result<Vec<RawQuestion>, QuizError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| QuizError::MalformedResponse(format!("invalid trivia API body: {}", e)))?;

    match response.response_code {
        RESPONSE_OK => {}
        RESPONSE_RATE_LIMIT => {
            warn!("trivia API rate limit hit");
            return Err(QuizError::ProviderUnavailable(
                "trivia API rate limit reached, try again in a few seconds".to_string(),
            ));
        }
        RESPONSE_NO_RESULTS => {
            return Err(QuizError::MalformedResponse(format!(
                "trivia API does not have {} questions for this query",
                count
            )));
        }
        RESPONSE_INVALID_PARAMETER => {
            return Err(QuizError::MalformedResponse(
                "trivia API rejected the request parameters".to_string(),
            ));
        }
        code => {
            return Err(QuizError::MalformedResponse(format!(
                "trivia API returned response code {}",
                code
            )));
        }
    }

    if response.results.len() < count {
        return Err(QuizError::MalformedResponse(format!(
            "expected {} questions, received {}",
            count,
            response.results.len()
        )));
    }

    response
        .results
        .into_iter()
        .take(count)
        .map(decode_question)
        .collect()
}

fn decode_question(question: ApiQuestion) -> Result<RawQuestion, QuizError> {
    let raw = RawQuestion {
        question_text: decode_field(&question.question)?,
        correct_answer: decode_field(&question.correct_answer)?,
        incorrect_answers: question
            .incorrect_answers
            .iter()
            .map(|answer| decode_field(answer))
            .collect::<Result<_, _>>()?,
    };
    raw.validate()?;
    Ok(raw)
}

fn decode_field(value: &str) -> Result<String, QuizError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|e| QuizError::MalformedResponse(format!("invalid base64 field: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| QuizError::MalformedResponse(format!("field is not UTF-8: {}", e)))
}
