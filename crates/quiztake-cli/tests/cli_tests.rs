//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quiztake() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quiztake").unwrap()
}

#[test]
fn help_output() {
    quiztake()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Headless quiz-attempt client"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("take"))
        .stdout(predicate::str::contains("result"));
}

#[test]
fn version_output() {
    quiztake()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quiztake"));
}

#[test]
fn init_creates_the_config() {
    let dir = TempDir::new().unwrap();

    quiztake()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quiztake.toml"));

    assert!(dir.path().join("quiztake.toml").exists());
}

#[test]
fn init_skips_an_existing_config() {
    let dir = TempDir::new().unwrap();

    // First init
    quiztake()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    quiztake()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn take_requires_a_quiz_id() {
    quiztake().arg("take").assert().failure();
}

#[test]
fn take_rejects_a_malformed_quiz_id() {
    quiztake()
        .arg("take")
        .arg("not-a-uuid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn result_rejects_an_unknown_format() {
    let dir = TempDir::new().unwrap();

    quiztake()
        .current_dir(dir.path())
        .arg("result")
        .arg("0a8eab2c-9e84-4d1f-a05c-3f2b9f1f5f10")
        .arg("aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee")
        .arg("--format")
        .arg("yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn missing_config_file_is_an_error() {
    quiztake()
        .arg("quizzes")
        .arg("--config")
        .arg("/nonexistent/quiztake.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn logout_without_a_session_succeeds() {
    let dir = TempDir::new().unwrap();

    // No tokens stored, so nothing is revoked and no request leaves.
    quiztake()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
}
