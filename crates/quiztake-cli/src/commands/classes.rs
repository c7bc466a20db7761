//! The `quiztake classes` and `quiztake join` commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use quiztake_client::{load_config_from, RestClient};
use quiztake_core::model::ClassRoom;
use quiztake_store::FileStore;

pub async fn list(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = Arc::new(FileStore::new(&config.data_dir));
    let client = RestClient::with_timeout(&config.base_url, store, config.timeout_secs);

    let classes = client.enrolled_classes().await?;
    if classes.is_empty() {
        println!("Not enrolled in any class. Run `quiztake join <code>` with a code from your teacher.");
        return Ok(());
    }

    print_classes(&classes);
    Ok(())
}

pub async fn join(config_path: Option<PathBuf>, code: &str) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = Arc::new(FileStore::new(&config.data_dir));
    let client = RestClient::with_timeout(&config.base_url, store, config.timeout_secs);

    client.join_class(code).await?;
    println!("Joined class with code {code}.");
    Ok(())
}

fn print_classes(classes: &[ClassRoom]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Name", "Subject", "Code", "Teacher"]);

    for class in classes {
        let teacher = class
            .teacher
            .as_ref()
            .map(|t| t.display_name().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&class.name),
            Cell::new(&class.subject),
            Cell::new(&class.code),
            Cell::new(teacher),
        ]);
    }

    println!("{table}");
}
