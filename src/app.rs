use tracing::debug;

use crate::config::QuizConfig;
use crate::engine::{BatchOutcome, BatchRequest, QuizEngine};
use crate::error::QuizError;
use crate::models::{AnswerOutcome, Phase, Question};

/// Top-level screen of the terminal front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    /// A quiz is running; the engine phase picks the screen.
    Playing,
}

/// Terminal view state wrapped around a quiz engine.
pub struct App {
    pub state: AppState,
    engine: QuizEngine,
    selected_option: usize,
    result_scroll: usize,
    last_error: Option<String>,
    error_retryable: bool,
}

impl App {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            state: AppState::Welcome,
            engine: QuizEngine::new(config),
            selected_option: 0,
            result_scroll: 0,
            last_error: None,
            error_retryable: false,
        }
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.engine.current_question().ok()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the last failed fetch can be retried as-is.
    pub fn can_retry(&self) -> bool {
        self.last_error.is_some() && self.error_retryable
    }

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.options().len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 && self.engine.answer().is_none() {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 && self.engine.answer().is_none() {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Starts a new quiz, abandoning any running one. Returns the batch to fetch.
    pub fn start_quiz(&mut self) -> BatchRequest {
        self.state = AppState::Playing;
        self.selected_option = 0;
        self.result_scroll = 0;
        self.clear_error();
        self.engine.start_quiz()
    }

    /// Answers the current question with the highlighted option.
    pub fn submit_answer(&mut self) -> Result<AnswerOutcome, QuizError> {
        let choice = self
            .engine
            .current_question()?
            .options()
            .get(self.selected_option)
            .cloned()
            .ok_or(QuizError::OutOfRange {
                index: self.selected_option,
                len: self.option_count(),
            })?;

        self.engine.submit_answer(&choice)
    }

    /// Moves on from an answered question. Returns the next level's request, if one was issued.
    pub fn next_question(&mut self) -> Option<BatchRequest> {
        match self.engine.advance() {
            Ok(Phase::LevelTransition) => {
                self.selected_option = 0;
                self.engine.pending_request()
            }
            Ok(_) => {
                self.selected_option = 0;
                None
            }
            Err(e) => {
                debug!(error = %e, "advance ignored");
                None
            }
        }
    }

    /// Re-issues the outstanding request after a failed fetch.
    pub fn retry(&mut self) -> Option<BatchRequest> {
        if !self.can_retry() {
            return None;
        }
        let request = self.engine.pending_request()?;
        self.clear_error();
        Some(request)
    }

    pub fn receive_batch(&mut self, request: BatchRequest, result: Result<Vec<Question>, QuizError>) {
        match self.engine.receive_batch(request, result) {
            Ok(BatchOutcome::Applied(_)) => {
                self.selected_option = 0;
                self.clear_error();
            }
            Ok(BatchOutcome::Discarded) => {}
            Err(e) => {
                self.error_retryable = e.is_retryable();
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn clear_error(&mut self) {
        self.last_error = None;
        self.error_retryable = false;
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.engine.history().len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(QuizConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| {
                Question::new(
                    format!("Q{}", i),
                    vec!["a".to_string(), "b".to_string(), "c".to_string()],
                    "b",
                )
                .unwrap()
            })
            .collect()
    }

    fn playing() -> App {
        let mut app = App::new(QuizConfig::new(2, 2).unwrap());
        let request = app.start_quiz();
        app.receive_batch(request, Ok(batch(request.count)));
        app
    }

    #[test]
    fn test_option_navigation_wraps() {
        let mut app = playing();
        assert_eq!(app.selected_option(), 0);
        app.select_previous_option();
        assert_eq!(app.selected_option(), 2);
        app.select_next_option();
        assert_eq!(app.selected_option(), 0);
    }

    #[test]
    fn test_submit_selected_option() {
        let mut app = playing();
        app.select_next_option();
        let outcome = app.submit_answer().unwrap();

        assert!(outcome.correct);
        assert_eq!(app.engine().score(), 1);
        // Selection is frozen once answered.
        app.select_next_option();
        assert_eq!(app.selected_option(), 1);

        assert!(matches!(
            app.submit_answer(),
            Err(QuizError::InvalidState(_))
        ));
        assert_eq!(app.engine().score(), 1);
    }

    #[test]
    fn test_next_question_issues_level_request() {
        let mut app = playing();
        app.submit_answer().unwrap();
        assert!(app.next_question().is_none());
        app.submit_answer().unwrap();

        let request = app.next_question().unwrap();
        assert_eq!(request.level, 2);
        assert_eq!(app.phase(), Phase::LevelTransition);
    }

    #[test]
    fn test_failed_fetch_sets_error_and_retry_clears_it() {
        let mut app = App::default();
        let request = app.start_quiz();
        assert!(app.retry().is_none());

        app.receive_batch(
            request,
            Err(QuizError::ProviderUnavailable("offline".to_string())),
        );
        assert!(app.last_error().unwrap().contains("offline"));

        assert!(app.can_retry());
        assert_eq!(app.retry(), Some(request));
        assert!(app.last_error().is_none());

        app.receive_batch(request, Ok(batch(3)));
        assert_eq!(app.phase(), Phase::Active);
    }

    #[test]
    fn test_non_retryable_error_is_not_offered_for_retry() {
        let mut app = App::default();
        let request = app.start_quiz();

        app.receive_batch(
            request,
            Err(QuizError::InvalidConfig("no such category".to_string())),
        );
        assert!(app.last_error().unwrap().contains("no such category"));
        assert!(!app.can_retry());
        assert!(app.retry().is_none());
        assert!(app.last_error().is_some());

        // Starting over is still possible.
        let fresh = app.start_quiz();
        assert!(app.last_error().is_none());
        app.receive_batch(fresh, Ok(batch(3)));
        assert_eq!(app.phase(), Phase::Active);
    }

    #[test]
    fn test_submit_while_loading_reports_state() {
        let mut app = App::default();
        app.start_quiz();
        assert!(matches!(
            app.submit_answer(),
            Err(QuizError::InvalidState(_))
        ));
    }

    #[test]
    fn test_restart_ignores_stale_response() {
        let mut app = App::default();
        let stale = app.start_quiz();
        let fresh = app.start_quiz();

        app.receive_batch(stale, Ok(batch(3)));
        assert_eq!(app.phase(), Phase::Loading);

        app.receive_batch(fresh, Ok(batch(3)));
        assert_eq!(app.phase(), Phase::Active);
    }

    #[test]
    fn test_result_scroll_bounds() {
        let mut app = playing();
        app.scroll_results_up();
        assert_eq!(app.result_scroll(), 0);

        app.submit_answer().unwrap();
        app.next_question();
        app.submit_answer().unwrap();
        app.scroll_results_down();
        app.scroll_results_down();
        app.scroll_results_down();
        assert_eq!(app.result_scroll(), 1);
    }
}
