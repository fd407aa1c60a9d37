use clap::{Parser, Subcommand, ValueEnum};

use quiz_attempt_client::{
    app_state::AppState,
    config::Config,
    errors::AppResult,
    handlers,
    models::domain::QuizId,
    services::quiz_service::QuizFilter,
};

#[derive(Parser)]
#[command(name = "quiz-attempt")]
#[command(about = "Browse and take timed quizzes from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List quizzes available to you
    List {
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,

        /// Match against quiz title or course name
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List the quizzes of one course
    Course { course_id: i64 },

    /// Show your past attempts
    Attempts,

    /// Show your latest result for a quiz
    Result { quiz_id: QuizId },

    /// Start a timed attempt
    Take { quiz_id: QuizId },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Attempted,
    NotAttempted,
}

impl From<FilterArg> for QuizFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => QuizFilter::All,
            FilterArg::Attempted => QuizFilter::Attempted,
            FilterArg::NotAttempted => QuizFilter::NotAttempted,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{} [{}]", err, err.error_code());
            eprintln!("{}", err.user_message());
            1
        }
    };

    // stdin is read on a blocking thread that would otherwise hold up runtime shutdown.
    std::process::exit(code);
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = Config::from_env();
    config.validate()?;
    log::debug!("Using API at {}", config.api_base_url);

    let state = AppState::new(config)?;

    match cli.command {
        Commands::List { filter, search } => {
            handlers::list_quizzes(&state, filter.into(), search.as_deref()).await
        }
        Commands::Course { course_id } => handlers::list_course_quizzes(&state, course_id).await,
        Commands::Attempts => handlers::list_attempts(&state).await,
        Commands::Result { quiz_id } => handlers::show_result(&state, quiz_id).await,
        Commands::Take { quiz_id } => handlers::take_quiz(&state, quiz_id).await,
    }
}
