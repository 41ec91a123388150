//! # trivia-quiz
//!
//! A levelled multiple-choice trivia quiz. Questions come from the Open Trivia
//! Database (or a local JSON bank), get harder as levels go up, and the score
//! carries across all levels.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use trivia_quiz::{OpenTdbProvider, Quiz, QuizConfig, QuizError, DEFAULT_API_URL, DEFAULT_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let provider = OpenTdbProvider::new(DEFAULT_API_URL, DEFAULT_TIMEOUT)?;
//!
//!     // Run the quiz in the terminal
//!     Quiz::new(QuizConfig::default(), Arc::new(provider)).run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Without a terminal, [`QuizSession`] drives the same state machine directly.

mod app;
pub mod config;
pub mod engine;
mod error;
pub mod logging;
mod models;
pub mod provider;
mod session;
pub mod terminal;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;
use tracing::warn;

pub use app::{App, AppState};
pub use config::QuizConfig;
pub use engine::{BatchOutcome, BatchRequest, QuizEngine};
pub use error::{LoadError, QuizError};
pub use models::{
    difficulty_for, AnswerOutcome, AnswerRecord, Difficulty, Phase, Question, QuizSnapshot,
    RawQuestion,
};
pub use provider::{
    JsonQuestionBank, OpenTdbProvider, QuestionProvider, DEFAULT_API_URL, DEFAULT_TIMEOUT,
};
pub use session::QuizSession;

const TICK_RATE: Duration = Duration::from_millis(50);

/// A fetched batch on its way back to the event loop.
type BatchDelivery = (BatchRequest, Result<Vec<Question>, QuizError>);

/// A quiz that can be run in the terminal.
pub struct Quiz {
    app: App,
    provider: Arc<dyn QuestionProvider>,
}

impl Quiz {
    pub fn new(config: QuizConfig, provider: Arc<dyn QuestionProvider>) -> Self {
        Self {
            app: App::new(config),
            provider,
        }
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app, self.provider).await;
        terminal::restore()?;
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    provider: Arc<dyn QuestionProvider>,
) -> Result<(), QuizError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<BatchDelivery>();

    loop {
        while let Ok((request, result)) = rx.try_recv() {
            app.receive_batch(request, result);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match handle_input(app, key.code) {
                    Input::Quit => break,
                    Input::Fetch(request) => spawn_fetch(&provider, request, &tx),
                    Input::Handled => {}
                }
            }
        } else {
            tokio::task::yield_now().await;
        }
    }

    Ok(())
}

/// Fetches on a separate task so the UI keeps redrawing while the request is in flight.
fn spawn_fetch(
    provider: &Arc<dyn QuestionProvider>,
    request: BatchRequest,
    tx: &mpsc::UnboundedSender<BatchDelivery>,
) {
    let provider = Arc::clone(provider);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = provider.fetch_batch(request.difficulty, request.count).await;
        // The receiver only goes away when the quiz has exited.
        let _ = tx.send((request, result));
    });
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Handled,
    Fetch(BatchRequest),
    Quit,
}

fn handle_input(app: &mut App, key: KeyCode) -> Input {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return Input::Quit;
    }

    match app.state {
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Playing => match app.phase() {
            Phase::Loading | Phase::LevelTransition => handle_loading_input(app, key),
            Phase::Active => handle_quiz_input(app, key),
            Phase::Finished => handle_result_input(app, key),
        },
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> Input {
    match key {
        KeyCode::Enter => Input::Fetch(app.start_quiz()),
        _ => Input::Handled,
    }
}

fn handle_loading_input(app: &mut App, key: KeyCode) -> Input {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') => match app.retry() {
            Some(request) => Input::Fetch(request),
            None => Input::Handled,
        },
        KeyCode::Char('s') | KeyCode::Char('S') => Input::Fetch(app.start_quiz()),
        _ => Input::Handled,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Input {
    let answered = app.engine().answer().is_some();

    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            Input::Handled
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            Input::Handled
        }
        KeyCode::Enter | KeyCode::Char(' ') if answered => match app.next_question() {
            Some(request) => Input::Fetch(request),
            None => Input::Handled,
        },
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Err(e) = app.submit_answer() {
                warn!(error = %e, "answer rejected");
            }
            Input::Handled
        }
        KeyCode::Char('s') | KeyCode::Char('S') => Input::Fetch(app.start_quiz()),
        _ => Input::Handled,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Input {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            Input::Handled
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            Input::Handled
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Input::Fetch(app.start_quiz()),
        _ => Input::Handled,
    }
}
