//! Client configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quiztake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory for tokens and saved progress.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Default login identity. The password is never stored here.
    #[serde(default)]
    pub email: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("quiztake"),
        Err(_) => PathBuf::from("./quiztake-data"),
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            data_dir: default_data_dir(),
            email: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quiztake.toml` in the current directory
/// 2. `~/.config/quiztake/config.toml`
///
/// Environment variable overrides: `QUIZTAKE_BASE_URL`, `QUIZTAKE_DATA_DIR`.
pub fn load_config() -> Result<ClientConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quiztake.toml");
        if local.exists() {
            Some(local)
        } else if let Some(global_dir) = dirs_path() {
            let global = global_dir.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ClientConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("QUIZTAKE_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(dir) = std::env::var("QUIZTAKE_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    config.base_url = resolve_env_vars(&config.base_url);
    config.base_url = config.base_url.trim_end_matches('/').to_string();
    if let Some(email) = &config.email {
        config.email = Some(resolve_env_vars(email));
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quiztake"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZTAKE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZTAKE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZTAKE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_QUIZTAKE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.email.is_none());
    }

    #[test]
    fn parse_config_file() {
        let toml_str = r#"
base_url = "https://lms.example.edu/api"
timeout_secs = 10
data_dir = "/tmp/quiztake-test"
email = "student@example.edu"
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://lms.example.edu/api");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.email.as_deref(), Some("student@example.edu"));
    }

    #[test]
    fn sparse_config_falls_back_to_defaults() {
        let config: ClientConfig = toml::from_str("base_url = \"http://other:9000/api\"").unwrap();
        assert_eq!(config.base_url, "http://other:9000/api");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn explicit_path_loads_and_trims_the_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiztake.toml");
        std::fs::write(&path, "base_url = \"http://localhost:8000/api/\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/quiztake.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
