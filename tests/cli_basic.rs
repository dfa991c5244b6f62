//! Basic CLI E2E tests.
//!
//! Each test gets its own config and data file in a temp directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_recall-cli"))
        .arg("--config")
        .arg(dir.join("recall.toml"))
        .arg("--data-file")
        .arg(dir.join("state.json"))
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).expect("CLI did not print JSON")
}

#[test]
fn test_deck_list_empty() {
    let temp = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(temp.path(), &["deck", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No decks yet"));
}

#[test]
fn test_review_session() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    assert_eq!(run_cli(dir, &["deck", "add", "Spanish"]).0, 0);
    assert_eq!(run_cli(dir, &["card", "add", "perro", "dog"]).0, 0);
    assert_eq!(run_cli(dir, &["card", "add", "gato", "cat"]).0, 0);

    let (code, stdout, _) = run_cli(dir, &["--format", "json", "queue"]);
    assert_eq!(code, 0);
    let queue = json(&stdout);
    assert_eq!(queue.as_array().unwrap().len(), 2);
    assert_eq!(queue[0]["front"], "perro");

    let (code, stdout, _) = run_cli(dir, &["--format", "json", "review", "good"]);
    assert_eq!(code, 0);
    let graded = json(&stdout);
    assert_eq!(graded["front"], "perro");
    assert_eq!(graded["isNew"], false);
    assert_eq!(graded["repetition"], 1);
    assert_eq!(graded["reviewHistory"].as_array().unwrap().len(), 1);

    // Graded cards stay in the queue, earliest due first
    let (_, stdout, _) = run_cli(dir, &["--format", "json", "queue"]);
    let queue = json(&stdout);
    assert_eq!(queue.as_array().unwrap().len(), 2);
    assert_eq!(queue[0]["front"], "perro");

    // The running session does not hand the graded card out again
    let (code, stdout, _) = run_cli(dir, &["--format", "json", "review", "--button", "4"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["front"], "gato");

    let (code, stdout, _) = run_cli(dir, &["review", "good"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Session complete"));

    let (code, stdout, _) = run_cli(dir, &["--format", "json", "stats"]);
    assert_eq!(code, 0);
    let stats = json(&stdout);
    assert_eq!(stats["totalCards"], 2);
    assert_eq!(stats["reviewsToday"], 2);
}

#[test]
fn test_review_rejects_bad_quality() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_cli(dir, &["deck", "add", "Spanish"]);
    run_cli(dir, &["card", "add", "perro", "dog"]);

    let (code, _, stderr) = run_cli(dir, &["review", "--quality", "9"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Quality must be between 0 and 5"));
}

#[test]
fn test_settings_are_clamped() {
    let temp = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(
        temp.path(),
        &[
            "--format",
            "json",
            "settings",
            "set",
            "--new-cards-per-day",
            "500",
            "--learning-steps",
            "0, x",
        ],
    );
    assert_eq!(code, 0);
    let settings = json(&stdout);
    assert_eq!(settings["newCardsPerDay"], 100);
    assert_eq!(settings["learningSteps"], serde_json::json!([10, 1440]));
}

#[test]
fn test_settings_saved_to_config() {
    let temp = TempDir::new().unwrap();
    let (code, _, _) = run_cli(
        temp.path(),
        &["settings", "set", "--max-interval", "45", "--save"],
    );
    assert_eq!(code, 0);

    let config = std::fs::read_to_string(temp.path().join("recall.toml")).unwrap();
    assert!(config.contains("max_interval = 45"));

    // A fresh data file picks the saved values up
    std::fs::remove_file(temp.path().join("state.json")).unwrap();
    let (code, stdout, _) = run_cli(temp.path(), &["--format", "json", "settings", "show"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["maxInterval"], 45);
}

#[test]
fn test_review_rejects_bad_button() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_cli(dir, &["deck", "add", "Spanish"]);
    run_cli(dir, &["card", "add", "perro", "dog"]);

    let (code, _, stderr) = run_cli(dir, &["review", "--button", "7"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Button must be between 1 and 4"));
}

#[test]
fn test_config_file_seeds_settings() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("recall.toml"),
        "[review]\nmax_interval = 30\nlearning_steps = [1, 5]\n",
    )
    .unwrap();

    let (code, stdout, _) = run_cli(temp.path(), &["--format", "json", "settings", "show"]);
    assert_eq!(code, 0);
    let settings = json(&stdout);
    assert_eq!(settings["maxInterval"], 30);
    assert_eq!(settings["learningSteps"], serde_json::json!([1, 5]));
}
