//! The `quiztake quizzes` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use quiztake_client::{load_config_from, RestClient};
use quiztake_core::model::Quiz;
use quiztake_store::FileStore;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = Arc::new(FileStore::new(&config.data_dir));
    let client = RestClient::with_timeout(&config.base_url, store, config.timeout_secs);

    let quizzes = client.list_quizzes().await?;
    if quizzes.is_empty() {
        println!("No quizzes available. Run `quiztake join <code>` to enroll in a class.");
        return Ok(());
    }

    print_quizzes(&quizzes);
    Ok(())
}

fn print_quizzes(quizzes: &[Quiz]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Id", "Title", "Sessions", "Questions", "Duration", "Closes",
    ]);

    for quiz in quizzes {
        let closes = quiz
            .end_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(quiz.id),
            Cell::new(&quiz.title),
            Cell::new(quiz.sessions.len()),
            Cell::new(quiz.total_questions),
            Cell::new(format!("{} min", quiz.total_duration)),
            Cell::new(closes),
        ]);
    }

    println!("{table}");
}
