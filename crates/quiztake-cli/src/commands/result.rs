//! The `quiztake result` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use quiztake_client::{load_config_from, RestClient};
use quiztake_core::traits::QuizService;
use quiztake_report::{render_markdown, render_text, ResultSummary};
use quiztake_store::FileStore;

pub async fn execute(
    config_path: Option<PathBuf>,
    quiz_id: Uuid,
    attempt_id: Uuid,
    format: &str,
) -> Result<()> {
    let render: fn(&ResultSummary) -> String = match format {
        "text" => render_text,
        "markdown" => render_markdown,
        other => anyhow::bail!("unknown format: {other} (expected text or markdown)"),
    };

    let config = load_config_from(config_path.as_deref())?;
    let store = Arc::new(FileStore::new(&config.data_dir));
    let client = RestClient::with_timeout(&config.base_url, store, config.timeout_secs);

    let (quiz, attempt) =
        tokio::try_join!(client.fetch_quiz(quiz_id), client.fetch_attempt(attempt_id))?;
    let quiz = quiz.sorted();
    anyhow::ensure!(
        attempt.quiz == quiz.id,
        "attempt {attempt_id} does not belong to quiz {quiz_id}"
    );

    let summary = ResultSummary::build(&quiz, &attempt);
    print!("{}", render(&summary));
    Ok(())
}
