//! Integration tests for the titan binary.
//!
//! These tests verify end-to-end behavior including:
//! - Logging single exercises and interactive sessions
//! - Summary and history output
//! - Persistence across runs
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI isolated from the user's own config and data
fn titan(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("titan"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn read_store(dir: &Path) -> Value {
    let content =
        fs::read_to_string(dir.join("data/titan_db.json")).expect("Failed to read store");
    serde_json::from_str(&content).expect("Store is not valid JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("titan"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Gym workout logger with calorie estimates",
        ));
}

#[test]
fn test_exercises_lists_catalog() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("Barbell Squat"))
        .stdout(predicate::str::contains("Face Pulls"));
}

#[test]
fn test_estimate_does_not_log() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .args(["estimate", "Bench", "Press", "--sets", "3", "--reps", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("49.2 kcal"))
        .stdout(predicate::str::contains("Estimate only"));

    assert!(!temp_dir.path().join("data/titan_db.json").exists());
}

#[test]
fn test_estimate_applies_high_rep_penalty() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .args(["estimate", "Bench Press", "--sets", "3", "--reps", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("59.1 kcal"));
}

#[test]
fn test_log_writes_versioned_store() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .args(["log", "Deadlift", "--sets", "5", "--reps", "5"])
        .args(["--recorded-at", "2024-01-15T14:30:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged"))
        .stdout(predicate::str::contains("Deadlift"));

    let store = read_store(temp_dir.path());
    assert_eq!(store["version"], 1);
    let entries = store["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["exercise"], "Deadlift");
    assert_eq!(entries[0]["sets"], 5);
    assert_eq!(entries[0]["date"], "2024-01-15");
    // 6.0 × 3.5 × 75 / 200 × 12.5 min
    assert_eq!(entries[0]["burn_kcal"], 98.4);
}

#[test]
fn test_unknown_exercise_fails() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .args(["log", "Underwater Basket Weaving"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnknownExercise"));

    assert!(!temp_dir.path().join("data/titan_db.json").exists());
}

#[test]
fn test_out_of_range_sets_rejected() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .args(["log", "Deadlift", "--sets", "0"])
        .assert()
        .failure();
}

#[test]
fn test_weight_override() {
    let temp_dir = setup_test_dir();

    // 5.0 × 3.5 × 100 / 200 × 7.5
    titan(temp_dir.path())
        .args(["estimate", "Bench Press", "--weight", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("65.6 kcal"));
}

#[test]
fn test_session_finish_commits_batch() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .arg("session")
        .args(["--recorded-at", "2024-01-15T18:00:00"])
        .write_stdin("3 10 Bench Press\n3 20 bench press\nlist\nfinish\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("108.3 kcal pending"))
        .stdout(predicate::str::contains("Session saved: 2 exercises"));

    let store = read_store(temp_dir.path());
    assert_eq!(store["entries"].as_array().unwrap().len(), 2);
}

#[test]
fn test_session_without_finish_is_not_saved() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .arg("session")
        .write_stdin("3 10 Bench Press\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session discarded (1 exercises not saved)"));

    assert!(!temp_dir.path().join("data/titan_db.json").exists());
}

#[test]
fn test_session_survives_failed_save() {
    let temp_dir = setup_test_dir();
    // The data directory is a regular file, so the store cannot be written
    fs::write(temp_dir.path().join("data"), "").unwrap();

    titan(temp_dir.path())
        .arg("session")
        .write_stdin("3 10 Bench Press\nfinish\nlist\ndiscard\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not save session"))
        .stdout(predicate::str::contains("1 exercises still pending"))
        .stdout(predicate::str::contains("49.2 kcal pending"))
        .stdout(predicate::str::contains("Session discarded (1 exercises not saved)"))
        .stdout(predicate::str::contains("Session saved").not());
}

#[test]
fn test_session_reports_bad_lines_and_continues() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .arg("session")
        .write_stdin("ten reps of squats\n3 10 Zumba\n2 8 Leg Press\nfinish\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("expected: <sets> <reps> <exercise>"))
        .stdout(predicate::str::contains("Unknown exercise: Zumba"))
        .stdout(predicate::str::contains("Session saved: 1 exercises"));
}

#[test]
fn test_summary_groups_by_date() {
    let temp_dir = setup_test_dir();

    for (exercise, at) in [
        ("Bench Press", "2024-01-15T10:00:00"),
        ("Bench Press", "2024-01-16T10:00:00"),
        ("Bench Press", "2024-01-15T19:00:00"),
    ] {
        titan(temp_dir.path())
            .args(["log", exercise, "--recorded-at", at])
            .assert()
            .success();
    }

    titan(temp_dir.path())
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total burn: 147.6 kcal"))
        .stdout(predicate::str::contains("Total sets: 9"))
        .stdout(predicate::str::contains("Total reps: 30"))
        .stdout(predicate::str::is_match(r"2024-01-15\s+98\.4 kcal").unwrap())
        .stdout(predicate::str::is_match(r"2024-01-16\s+49\.2 kcal").unwrap());
}

#[test]
fn test_summary_is_default_command() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts recorded yet."));
}

#[test]
fn test_history_lists_in_order() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .args(["log", "Face Pulls", "--recorded-at", "2024-01-16T10:00:00"])
        .assert()
        .success();
    titan(temp_dir.path())
        .args(["log", "Lat Pulldown", "--recorded-at", "2024-01-15T10:00:00"])
        .assert()
        .success();

    let output = titan(temp_dir.path()).arg("history").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let face = stdout.find("Face Pulls").expect("Face Pulls missing");
    let lat = stdout.find("Lat Pulldown").expect("Lat Pulldown missing");
    assert!(face < lat, "history should keep insertion order:\n{}", stdout);
}

#[test]
fn test_bmi_uses_profile_defaults() {
    let temp_dir = setup_test_dir();

    titan(temp_dir.path())
        .arg("bmi")
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 24.5 (OPTIMAL)"));

    titan(temp_dir.path())
        .args(["bmi", "--weight", "100", "--height", "1.7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CRITICAL"));
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();

    for _ in 0..3 {
        titan(temp_dir.path())
            .args(["log", "Leg Press"])
            .assert()
            .success();
    }

    let csv_path = temp_dir.path().join("export/history.csv");
    titan(temp_dir.path())
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 entries"));

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let lines: Vec<&str> = csv_content.lines().collect();
    assert_eq!(lines.len(), 4); // header + 3 rows
    assert!(lines[0].starts_with("id,date,time,exercise"));
}

#[test]
fn test_config_file_changes_formula() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/titan");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        r#"
[profile]
weight_kg = 80.0

[estimator]
minutes_per_set = 2.0

[[exercises.custom]]
name = "Sled Push"
met = 8.0
"#,
    )
    .unwrap();

    // 8.0 × 3.5 × 80 / 200 × 6.0 min
    titan(temp_dir.path())
        .args(["estimate", "Sled Push"])
        .assert()
        .success()
        .stdout(predicate::str::contains("67.2 kcal"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[estimator]\nminutes_per_set = -1.0\n").unwrap();

    titan(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("minutes_per_set"));
}
