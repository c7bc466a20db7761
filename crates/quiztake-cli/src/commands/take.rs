//! The `quiztake take` command.
//!
//! Drives [`AttemptEngine::run`] with commands parsed from stdin lines and a
//! console observer for the flow callbacks.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use uuid::Uuid;

use quiztake_client::{load_config_from, RestClient};
use quiztake_core::engine::{
    AttemptEngine, EngineConfig, FlowConclusion, FlowObserver, PlayerCommand,
};
use quiztake_core::model::{Question, QuizSession};
use quiztake_core::traits::{KeyValueStore, QuizService};
use quiztake_store::FileStore;

pub async fn execute(config_path: Option<PathBuf>, quiz_id: Uuid) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));
    let service: Arc<dyn QuizService> = Arc::new(RestClient::with_timeout(
        &config.base_url,
        Arc::clone(&store),
        config.timeout_secs,
    ));
    let engine = AttemptEngine::new(service, store, EngineConfig::default());

    println!("Commands: 1..9 pick an option, n(ext), p(rev), done, quit");

    let (tx, mut rx) = mpsc::channel(8);
    let reader = tokio::spawn(read_commands(tx));
    let conclusion = engine.run(quiz_id, &mut rx, &ConsoleObserver).await?;
    reader.abort();

    match conclusion {
        FlowConclusion::Completed { attempt_id } => {
            println!("\nQuiz complete.");
            println!("View your result: quiztake result {quiz_id} {attempt_id}");
        }
        FlowConclusion::Aborted => {
            println!("\nAttempt paused. Run the same command to resume where you left off.");
        }
        FlowConclusion::Inconsistent => {
            println!("\nThe attempt ended in an inconsistent state; contact your teacher.");
        }
    }
    Ok(())
}

/// Forward parsed stdin lines until the line source or the receiver closes.
async fn read_commands(tx: mpsc::Sender<PlayerCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(command) = parse_command(line) else {
            eprintln!("Commands: 1..9 pick an option, n(ext), p(rev), done, quit");
            continue;
        };
        if tx.send(command).await.is_err() {
            break;
        }
    }
}

fn parse_command(line: &str) -> Option<PlayerCommand> {
    match line {
        "n" | "next" => Some(PlayerCommand::Next),
        "p" | "prev" => Some(PlayerCommand::Prev),
        "done" | "complete" => Some(PlayerCommand::Complete),
        "q" | "quit" => Some(PlayerCommand::Quit),
        _ => match line.parse::<usize>() {
            Ok(n) if (1..=9).contains(&n) => Some(PlayerCommand::Choose(n - 1)),
            _ => None,
        },
    }
}

struct ConsoleObserver;

impl FlowObserver for ConsoleObserver {
    fn on_session_started(&self, session: &QuizSession, _question_index: usize, time_left: u64) {
        println!(
            "\n=== {} === ({} remaining)",
            session.name,
            format_time(time_left)
        );
    }

    fn on_question_changed(
        &self,
        question: Option<&Question>,
        index: usize,
        total: usize,
        chosen: Option<Uuid>,
    ) {
        let Some(question) = question else {
            println!("(this session has no questions; type done to complete it)");
            return;
        };
        println!("\nQ{}/{}: {}", index + 1, total, question.text);
        for (i, option) in question.options.iter().enumerate() {
            let marker = if chosen == Some(option.id) { ">" } else { " " };
            println!("  {marker} {}. {}", i + 1, option.text);
        }
    }

    fn on_tick(&self, time_left: u64) {
        if time_left % 60 == 0 || time_left <= 10 {
            println!("  [{} remaining]", format_time(time_left));
        }
    }

    fn on_answer_recorded(&self, _question_id: Uuid, _option_id: Uuid) {
        println!("  answer recorded");
    }

    fn on_session_expired(&self) {
        println!("\nTime is up for this session.");
    }

    fn on_session_completed(&self, message: &str) {
        println!("\n{message}");
    }

    fn on_completion_failed(&self, error: &str) {
        eprintln!("Could not complete the session: {error}");
        eprintln!("Type done to try again.");
    }

    fn on_quiz_completed(&self, _attempt_id: Uuid) {}

    fn on_inconsistency(&self, detail: &str) {
        eprintln!("Inconsistent state: {detail}");
    }
}

fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_accepts_aliases() {
        assert_eq!(parse_command("n"), Some(PlayerCommand::Next));
        assert_eq!(parse_command("next"), Some(PlayerCommand::Next));
        assert_eq!(parse_command("p"), Some(PlayerCommand::Prev));
        assert_eq!(parse_command("done"), Some(PlayerCommand::Complete));
        assert_eq!(parse_command("q"), Some(PlayerCommand::Quit));
    }

    #[test]
    fn parse_command_maps_digits_to_option_indexes() {
        assert_eq!(parse_command("1"), Some(PlayerCommand::Choose(0)));
        assert_eq!(parse_command("9"), Some(PlayerCommand::Choose(8)));
        assert_eq!(parse_command("0"), None);
        assert_eq!(parse_command("10"), None);
    }

    #[test]
    fn parse_command_rejects_noise() {
        assert_eq!(parse_command("banana"), None);
        assert_eq!(parse_command("-1"), None);
    }

    #[test]
    fn format_time_pads_to_mm_ss() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(600), "10:00");
    }
}
