use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use trivia_quiz::config::{DEFAULT_MAX_LEVEL, DEFAULT_QUESTIONS_PER_LEVEL};
use trivia_quiz::{
    logging, Difficulty, JsonQuestionBank, OpenTdbProvider, QuestionProvider, Quiz, QuizConfig,
    QuizError, DEFAULT_API_URL,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of levels in the quiz
    #[arg(long, default_value_t = DEFAULT_MAX_LEVEL)]
    max_level: u32,

    /// Questions asked per level
    #[arg(long, default_value_t = DEFAULT_QUESTIONS_PER_LEVEL)]
    questions_per_level: usize,

    /// JSON question bank to play from instead of the trivia API
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Trivia API endpoint
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Seconds to wait for the trivia API before giving up on a request
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// File that receives log output
    #[arg(long, default_value = "trivia-quiz.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    logging::init(&args.log_file)?;
    let config = QuizConfig::new(args.max_level, args.questions_per_level)?;

    let provider: Arc<dyn QuestionProvider> = match args.questions {
        Some(path) => {
            let bank = JsonQuestionBank::from_json(&path)?;
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                if bank.available(difficulty) < config.questions_per_level() {
                    warn!(
                        %difficulty,
                        available = bank.available(difficulty),
                        "question bank cannot fill a level"
                    );
                }
            }
            info!(path = %path.display(), "playing from question bank");
            Arc::new(bank)
        }
        None => {
            let provider =
                OpenTdbProvider::new(args.api_url, Duration::from_secs(args.timeout_secs))?;
            info!(url = provider.api_url(), "playing from trivia API");
            Arc::new(provider)
        }
    };

    Quiz::new(config, provider).run().await
}
