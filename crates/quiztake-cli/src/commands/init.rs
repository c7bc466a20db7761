//! The `quiztake init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quiztake.toml").exists() {
        println!("quiztake.toml already exists, skipping.");
    } else {
        std::fs::write("quiztake.toml", SAMPLE_CONFIG)?;
        println!("Created quiztake.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quiztake.toml with your backend URL");
    println!("  2. Run: quiztake login --email you@example.edu");
    println!("  3. Run: quiztake quizzes");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quiztake configuration

# Base URL of the LMS backend API.
base_url = "http://localhost:8000/api"

# Request timeout in seconds.
timeout_secs = 30

# Where tokens and saved progress live. Defaults to ~/.local/share/quiztake.
# data_dir = "/home/you/.local/share/quiztake"

# Default login identity; `quiztake login` prompts for the password.
# Supports ${VAR} references, e.g. "${QUIZTAKE_EMAIL}".
# email = "you@example.edu"
"#;
