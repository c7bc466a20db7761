//! The `quiztake login` and `quiztake logout` commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use quiztake_client::{load_config_from, RestClient};
use quiztake_store::FileStore;

pub async fn login(
    config_path: Option<PathBuf>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let email = match email.or_else(|| config.email.clone()) {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    anyhow::ensure!(!email.is_empty(), "email must not be empty");

    let password = match password.or_else(|| std::env::var("QUIZTAKE_PASSWORD").ok()) {
        Some(password) => password,
        None => prompt("Password: ")?,
    };

    let store = Arc::new(FileStore::new(&config.data_dir));
    let client = RestClient::with_timeout(&config.base_url, store, config.timeout_secs);
    let user = client.login(&email, &password).await?;
    println!("Logged in as {} <{}>", user.display_name(), user.email);
    Ok(())
}

pub async fn logout(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = Arc::new(FileStore::new(&config.data_dir));
    let client = RestClient::with_timeout(&config.base_url, store, config.timeout_secs);
    client.logout().await?;
    println!("Logged out.");
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}
