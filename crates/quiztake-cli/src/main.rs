//! quiztake CLI — the student-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "quiztake", version, about = "Headless quiz-attempt client for the LMS backend")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config file
    Init,

    /// Log in and store the session tokens
    Login {
        /// Account email (defaults to the config's email)
        #[arg(long)]
        email: Option<String>,

        /// Password (falls back to QUIZTAKE_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
    },

    /// Revoke the session and clear the stored tokens
    Logout,

    /// List the quizzes available to the logged-in student
    Quizzes,

    /// List enrolled classes
    Classes,

    /// Join a class by its code
    Join {
        /// Class code, e.g. "A3F2K9"
        code: String,
    },

    /// Take a quiz interactively
    Take {
        /// Quiz id
        quiz_id: Uuid,
    },

    /// Show the result of an attempt
    Result {
        /// Quiz id
        quiz_id: Uuid,

        /// Attempt id
        attempt_id: Uuid,

        /// Output format: text, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quiztake=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Login { email, password } => commands::auth::login(config, email, password).await,
        Commands::Logout => commands::auth::logout(config).await,
        Commands::Quizzes => commands::quizzes::execute(config).await,
        Commands::Classes => commands::classes::list(config).await,
        Commands::Join { code } => commands::classes::join(config, &code).await,
        Commands::Take { quiz_id } => commands::take::execute(config, quiz_id).await,
        Commands::Result {
            quiz_id,
            attempt_id,
            format,
        } => commands::result::execute(config, quiz_id, attempt_id, &format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
