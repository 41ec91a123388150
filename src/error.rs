use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The question source could not be reached. Retrying the same request may succeed.
    #[error("question provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The question source answered with something unusable.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// An operation was invoked in the wrong phase, or twice for one question.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A question index past the loaded batch.
    #[error("question index {index} out of range ({len} questions loaded)")]
    OutOfRange { index: usize, len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load question bank: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl QuizError {
    /// Whether re-issuing the failed request can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            QuizError::ProviderUnavailable(_) | QuizError::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for QuizError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            QuizError::MalformedResponse(err.to_string())
        } else {
            QuizError::ProviderUnavailable(err.to_string())
        }
    }
}

/// Error loading a question bank file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain at least one question", path.display())]
    Empty { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(QuizError::ProviderUnavailable("down".to_string()).is_retryable());
        assert!(QuizError::MalformedResponse("short".to_string()).is_retryable());
        assert!(!QuizError::InvalidState("twice".to_string()).is_retryable());
        assert!(!QuizError::OutOfRange { index: 3, len: 3 }.is_retryable());
    }

    #[test]
    fn test_error_messages() {
        let err = QuizError::OutOfRange { index: 4, len: 3 };
        assert_eq!(
            err.to_string(),
            "question index 4 out of range (3 questions loaded)"
        );

        let err = QuizError::from(LoadError::Empty {
            path: PathBuf::from("bank.json"),
        });
        assert_eq!(
            err.to_string(),
            "failed to load question bank: bank.json must contain at least one question"
        );
    }
}
