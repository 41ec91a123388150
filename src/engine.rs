//! The quiz state machine.
//!
//! `QuizEngine` never performs I/O. Whenever it needs questions it issues a
//! [`BatchRequest`] ticket; the caller fetches the batch however it likes and
//! hands the result back through [`QuizEngine::receive_batch`]. Tickets carry a
//! generation number, so answers to requests issued before a restart are
//! recognised and dropped.

use tracing::{debug, info, warn};

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::models::{
    difficulty_for, AnswerOutcome, AnswerRecord, Difficulty, Phase, Question, QuizSnapshot,
};

/// A request for one level's worth of questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    pub generation: u64,
    pub level: u32,
    pub difficulty: Difficulty,
    pub count: usize,
}

/// What happened to a delivered batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The batch was installed and the session moved to the given phase.
    Applied(Phase),
    /// The batch answered a request that is no longer outstanding.
    Discarded,
}

struct QuizState {
    level: u32,
    question_index: usize,
    score: usize,
    questions: Vec<Question>,
    phase: Phase,
}

impl QuizState {
    fn new() -> Self {
        Self {
            level: 1,
            question_index: 0,
            score: 0,
            questions: Vec::new(),
            phase: Phase::Loading,
        }
    }
}

/// One quiz session.
pub struct QuizEngine {
    config: QuizConfig,
    state: QuizState,
    generation: u64,
    pending: Option<BatchRequest>,
    answer: Option<AnswerOutcome>,
    history: Vec<AnswerRecord>,
}

impl QuizEngine {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config,
            state: QuizState::new(),
            generation: 0,
            pending: None,
            answer: None,
            history: Vec::new(),
        }
    }

    /// Resets the session to level 1 and requests the first batch.
    ///
    /// Any request still outstanding is abandoned: its response will be discarded.
    pub fn start_quiz(&mut self) -> BatchRequest {
        self.state = QuizState::new();
        self.answer = None;
        self.history.clear();

        let request = self.issue_request();
        info!(generation = request.generation, "starting quiz");
        request
    }

    /// The request the session is waiting on, if any. Re-issuing it is how a
    /// failed fetch is retried.
    pub fn pending_request(&self) -> Option<BatchRequest> {
        self.pending
    }

    /// Delivers the result of fetching `request`.
    ///
    /// A failed fetch is handed back unchanged and leaves the session waiting on
    /// the same request.
    pub fn receive_batch(
        &mut self,
        request: BatchRequest,
        result: Result<Vec<Question>, QuizError>,
    ) -> Result<BatchOutcome, QuizError> {
        let pending = match self.pending {
            Some(pending) if pending.generation == request.generation => pending,
            _ => {
                debug!(
                    generation = request.generation,
                    current = self.generation,
                    level = request.level,
                    "discarding stale question batch"
                );
                return Ok(BatchOutcome::Discarded);
            }
        };

        let mut questions = match result {
            Ok(questions) => questions,
            Err(err) => {
                warn!(level = pending.level, error = %err, "question batch request failed");
                return Err(err);
            }
        };

        if questions.len() < pending.count {
            warn!(
                level = pending.level,
                expected = pending.count,
                received = questions.len(),
                "question batch too short"
            );
            return Err(QuizError::MalformedResponse(format!(
                "expected {} questions, received {}",
                pending.count,
                questions.len()
            )));
        }
        questions.truncate(pending.count);

        self.state.questions = questions;
        self.state.question_index = 0;
        self.state.phase = Phase::Active;
        self.pending = None;

        info!(level = self.state.level, difficulty = %pending.difficulty, "level ready");
        Ok(BatchOutcome::Applied(Phase::Active))
    }

    /// The question being asked.
    pub fn current_question(&self) -> Result<&Question, QuizError> {
        if self.state.phase.is_waiting() {
            return Err(QuizError::InvalidState(
                "no questions while a batch is loading".to_string(),
            ));
        }

        self.state
            .questions
            .get(self.state.question_index)
            .filter(|_| self.state.phase == Phase::Active)
            .ok_or(QuizError::OutOfRange {
                index: self.state.question_index,
                len: self.state.questions.len(),
            })
    }

    /// Judges `choice` against the current question. Does not move on.
    pub fn submit_answer(&mut self, choice: &str) -> Result<AnswerOutcome, QuizError> {
        self.require_active("submit an answer")?;
        if self.answer.is_some() {
            return Err(QuizError::InvalidState(format!(
                "question {} of level {} was already answered",
                self.state.question_index + 1,
                self.state.level
            )));
        }

        let question = self.current_question()?;
        let question_text = question.text().to_string();
        let correct_answer = question.correct_answer().to_string();
        let correct = choice == correct_answer;

        let outcome = AnswerOutcome {
            choice: choice.to_string(),
            correct,
            correct_answer,
        };
        self.history.push(AnswerRecord {
            level: self.state.level,
            question_text,
            choice: outcome.choice.clone(),
            correct_answer: outcome.correct_answer.clone(),
            correct,
        });

        if correct {
            self.state.score += 1;
        }
        debug!(
            level = self.state.level,
            question = self.state.question_index,
            correct,
            score = self.state.score,
            "answer judged"
        );

        self.answer = Some(outcome.clone());
        Ok(outcome)
    }

    /// Moves past an answered question, into the next level or to the end.
    pub fn advance(&mut self) -> Result<Phase, QuizError> {
        self.require_active("advance")?;
        if self.answer.is_none() {
            return Err(QuizError::InvalidState(
                "the current question has not been answered".to_string(),
            ));
        }

        self.answer = None;
        self.state.question_index += 1;

        if self.state.question_index == self.state.questions.len() {
            if self.state.level < self.config.max_level() {
                self.state.level += 1;
                self.state.question_index = 0;
                self.state.questions = Vec::new();
                self.state.phase = Phase::LevelTransition;
                let request = self.issue_request();
                info!(next_level = request.level, difficulty = %request.difficulty, "level complete");
            } else {
                self.state.phase = Phase::Finished;
                info!(
                    score = self.state.score,
                    max_score = self.config.max_score(),
                    "quiz finished"
                );
            }
        }

        Ok(self.state.phase)
    }

    /// How far through the levels the session is, in `[0, 1)`.
    pub fn progress_fraction(&self) -> f64 {
        f64::from(self.state.level - 1) / f64::from(self.config.max_level())
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            level: self.state.level,
            max_level: self.config.max_level(),
            question_index: self.state.question_index,
            questions_per_level: self.config.questions_per_level(),
            score: self.state.score,
            max_score: self.config.max_score(),
            phase: self.state.phase,
            current_question: self.current_question().ok().cloned(),
            answer: self.answer.clone(),
            progress: self.progress_fraction(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn score(&self) -> usize {
        self.state.score
    }

    pub fn question_index(&self) -> usize {
        self.state.question_index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Verdict on the current question, once answered.
    pub fn answer(&self) -> Option<&AnswerOutcome> {
        self.answer.as_ref()
    }

    /// Every judged question since the last start.
    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    fn issue_request(&mut self) -> BatchRequest {
        self.generation += 1;
        let request = BatchRequest {
            generation: self.generation,
            level: self.state.level,
            difficulty: difficulty_for(self.state.level),
            count: self.config.questions_per_level(),
        };
        self.pending = Some(request);
        request
    }

    fn require_active(&self, action: &str) -> Result<(), QuizError> {
        match self.state.phase {
            Phase::Active => Ok(()),
            phase => Err(QuizError::InvalidState(format!(
                "cannot {} while {:?}",
                action, phase
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| {
                Question::new(
                    format!("Question {}", i + 1),
                    vec![
                        "wrong a".to_string(),
                        "right".to_string(),
                        "wrong b".to_string(),
                        "wrong c".to_string(),
                    ],
                    "right",
                )
                .unwrap()
            })
            .collect()
    }

    fn started(config: QuizConfig) -> QuizEngine {
        let mut engine = QuizEngine::new(config);
        let request = engine.start_quiz();
        engine
            .receive_batch(request, Ok(batch(request.count)))
            .unwrap();
        engine
    }

    /// Answers every question of the current level, returning the phase after the last advance.
    fn play_level(engine: &mut QuizEngine, correct: bool) -> Phase {
        let mut phase = engine.phase();
        for _ in 0..engine.config().questions_per_level() {
            let choice = if correct { "right" } else { "wrong a" };
            engine.submit_answer(choice).unwrap();
            phase = engine.advance().unwrap();
        }
        phase
    }

    fn load_pending(engine: &mut QuizEngine) {
        let request = engine.pending_request().unwrap();
        let outcome = engine
            .receive_batch(request, Ok(batch(request.count)))
            .unwrap();
        assert_eq!(outcome, BatchOutcome::Applied(Phase::Active));
    }

    #[test]
    fn test_new_engine_is_loading_without_request() {
        let mut engine = QuizEngine::new(QuizConfig::default());
        assert_eq!(engine.phase(), Phase::Loading);
        assert!(engine.pending_request().is_none());
        assert!(matches!(
            engine.current_question(),
            Err(QuizError::InvalidState(_))
        ));
        assert!(matches!(
            engine.submit_answer("right"),
            Err(QuizError::InvalidState(_))
        ));
        assert!(matches!(engine.advance(), Err(QuizError::InvalidState(_))));
    }

    #[test]
    fn test_start_quiz_requests_first_level() {
        let mut engine = QuizEngine::new(QuizConfig::default());
        let request = engine.start_quiz();

        assert_eq!(
            request,
            BatchRequest {
                generation: 1,
                level: 1,
                difficulty: Difficulty::Easy,
                count: 3,
            }
        );
        assert_eq!(engine.pending_request(), Some(request));
        assert_eq!(engine.phase(), Phase::Loading);
    }

    #[test]
    fn test_first_level_all_correct_moves_to_level_two() {
        let mut engine = started(QuizConfig::default());
        assert_eq!(engine.phase(), Phase::Active);

        for expected_score in 1..=3 {
            let outcome = engine.submit_answer("right").unwrap();
            assert!(outcome.correct);
            assert_eq!(engine.score(), expected_score);
            let phase = engine.advance().unwrap();
            if expected_score < 3 {
                assert_eq!(phase, Phase::Active);
                assert_eq!(engine.question_index(), expected_score);
            } else {
                assert_eq!(phase, Phase::LevelTransition);
            }
        }

        assert_eq!(engine.score(), 3);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.question_index(), 0);

        let request = engine.pending_request().unwrap();
        assert_eq!(request.level, 2);
        assert_eq!(request.difficulty, Difficulty::Easy);
        assert_eq!(request.generation, 2);

        load_pending(&mut engine);
        assert_eq!(engine.phase(), Phase::Active);
        assert_eq!(engine.current_question().unwrap().text(), "Question 1");
    }

    #[test]
    fn test_wrong_answer_keeps_score() {
        let mut engine = started(QuizConfig::default());
        let outcome = engine.submit_answer("wrong b").unwrap();

        assert!(!outcome.correct);
        assert_eq!(outcome.correct_answer, "right");
        assert_eq!(outcome.choice, "wrong b");
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut engine = started(QuizConfig::default());
        engine.submit_answer("right").unwrap();

        assert!(matches!(
            engine.submit_answer("right"),
            Err(QuizError::InvalidState(_))
        ));
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.history().len(), 1);

        engine.advance().unwrap();
        assert!(engine.submit_answer("right").is_ok());
        assert_eq!(engine.score(), 2);
    }

    #[test]
    fn test_advance_requires_an_answer() {
        let mut engine = started(QuizConfig::default());
        assert!(matches!(engine.advance(), Err(QuizError::InvalidState(_))));
        assert_eq!(engine.question_index(), 0);
    }

    #[test]
    fn test_full_level_of_correct_answers_adds_questions_per_level() {
        let config = QuizConfig::new(10, 5).unwrap();
        let mut engine = started(config);
        play_level(&mut engine, false);
        load_pending(&mut engine);

        let prior = engine.score();
        let phase = play_level(&mut engine, true);
        assert_eq!(engine.score(), prior + 5);
        assert_eq!(phase, Phase::LevelTransition);
    }

    #[test]
    fn test_last_level_wrong_answer_finishes() {
        let mut engine = started(QuizConfig::default());
        while engine.level() < 100 {
            assert_eq!(play_level(&mut engine, true), Phase::LevelTransition);
            load_pending(&mut engine);
        }

        assert_eq!(difficulty_for(engine.level()), Difficulty::Hard);
        engine.submit_answer("right").unwrap();
        engine.advance().unwrap();
        engine.submit_answer("right").unwrap();
        engine.advance().unwrap();

        let before = engine.score();
        let outcome = engine.submit_answer("wrong c").unwrap();
        assert!(!outcome.correct);
        assert_eq!(engine.advance().unwrap(), Phase::Finished);

        assert_eq!(engine.score(), before);
        assert_eq!(engine.score(), 299);
        assert_eq!(engine.level(), 100);
        assert!(engine.pending_request().is_none());
        assert!(matches!(
            engine.current_question(),
            Err(QuizError::OutOfRange { .. })
        ));
        assert!(matches!(engine.advance(), Err(QuizError::InvalidState(_))));
    }

    #[test]
    fn test_restart_discards_stale_batch() {
        let mut engine = started(QuizConfig::default());
        while engine.level() < 5 {
            play_level(&mut engine, true);
            if engine.level() < 5 {
                load_pending(&mut engine);
            }
        }
        assert_eq!(engine.phase(), Phase::LevelTransition);
        let stale = engine.pending_request().unwrap();
        assert_eq!(stale.level, 5);

        let fresh = engine.start_quiz();
        assert!(fresh.generation > stale.generation);
        assert_eq!(engine.generation(), fresh.generation);

        let outcome = engine.receive_batch(stale, Ok(batch(3))).unwrap();
        assert_eq!(outcome, BatchOutcome::Discarded);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.phase(), Phase::Loading);
        assert_eq!(engine.pending_request(), Some(fresh));

        let outcome = engine.receive_batch(fresh, Ok(batch(3))).unwrap();
        assert_eq!(outcome, BatchOutcome::Applied(Phase::Active));
        assert_eq!(engine.level(), 1);
    }

    #[test]
    fn test_provider_failure_is_retryable() {
        let mut engine = QuizEngine::new(QuizConfig::default());
        let request = engine.start_quiz();

        let result = engine.receive_batch(
            request,
            Err(QuizError::ProviderUnavailable("connection refused".to_string())),
        );
        assert!(matches!(result, Err(QuizError::ProviderUnavailable(_))));
        assert_eq!(engine.phase(), Phase::Loading);
        assert_eq!(engine.pending_request(), Some(request));

        let outcome = engine.receive_batch(request, Ok(batch(3))).unwrap();
        assert_eq!(outcome, BatchOutcome::Applied(Phase::Active));
    }

    #[test]
    fn test_short_batch_is_malformed_and_leaves_state() {
        let mut engine = started(QuizConfig::default());
        play_level(&mut engine, true);
        let request = engine.pending_request().unwrap();

        let result = engine.receive_batch(request, Ok(batch(2)));
        assert!(matches!(result, Err(QuizError::MalformedResponse(_))));
        assert_eq!(engine.phase(), Phase::LevelTransition);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.score(), 3);
        assert_eq!(engine.pending_request(), Some(request));
    }

    #[test]
    fn test_extra_questions_are_ignored() {
        let mut engine = QuizEngine::new(QuizConfig::default());
        let request = engine.start_quiz();
        engine.receive_batch(request, Ok(batch(7))).unwrap();
        assert_eq!(engine.snapshot().questions_per_level, 3);

        assert_eq!(play_level(&mut engine, true), Phase::LevelTransition);
    }

    #[test]
    fn test_duplicate_delivery_is_discarded() {
        let mut engine = QuizEngine::new(QuizConfig::default());
        let request = engine.start_quiz();
        engine.receive_batch(request, Ok(batch(3))).unwrap();
        engine.submit_answer("right").unwrap();

        let outcome = engine.receive_batch(request, Ok(batch(3))).unwrap();
        assert_eq!(outcome, BatchOutcome::Discarded);
        assert_eq!(engine.score(), 1);
        assert!(engine.answer().is_some());
    }

    #[test]
    fn test_operations_rejected_during_transition() {
        let mut engine = started(QuizConfig::default());
        play_level(&mut engine, true);
        assert_eq!(engine.phase(), Phase::LevelTransition);

        assert!(matches!(
            engine.current_question(),
            Err(QuizError::InvalidState(_))
        ));
        assert!(matches!(
            engine.submit_answer("right"),
            Err(QuizError::InvalidState(_))
        ));
        assert!(matches!(engine.advance(), Err(QuizError::InvalidState(_))));
        assert_eq!(engine.score(), 3);
    }

    #[test]
    fn test_progress_fraction() {
        let mut engine = started(QuizConfig::default());
        assert_eq!(engine.progress_fraction(), 0.0);

        while engine.level() < 100 {
            play_level(&mut engine, false);
            load_pending(&mut engine);
            let progress = engine.progress_fraction();
            assert!((0.0..1.0).contains(&progress));
        }
        assert!((engine.progress_fraction() - 0.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_and_history() {
        let mut engine = started(QuizConfig::default());
        engine.submit_answer("wrong a").unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, Phase::Active);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.max_score, 300);
        assert_eq!(
            snapshot.current_question.as_ref().map(|q| q.text()),
            Some("Question 1")
        );
        assert_eq!(snapshot.answer.as_ref().map(|a| a.correct), Some(false));

        let record = &engine.history()[0];
        assert_eq!(record.level, 1);
        assert_eq!(record.question_text, "Question 1");
        assert_eq!(record.correct_answer, "right");
        assert!(!record.correct);

        engine.advance().unwrap();
        assert!(engine.snapshot().answer.is_none());

        engine.start_quiz();
        assert!(engine.history().is_empty());
        assert!(engine.snapshot().current_question.is_none());
    }
}
