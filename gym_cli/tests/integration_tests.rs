//! Integration tests for the gymtrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Store creation and seeding
//! - Session logging and history
//! - Daily challenge increments and statistics
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to run the CLI against an isolated data and config directory
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gymtrack"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn log_session(data_dir: &Path, session_type: &str, date: &str, partial: bool) {
    let mut cmd = cli(data_dir);
    cmd.arg("log")
        .arg("--type")
        .arg(session_type)
        .arg("--duration")
        .arg("2400")
        .arg("--started-at")
        .arg(format!("{}T08:00:00", date));
    if partial {
        cmd.arg("--partial");
    }
    cmd.assert().success();
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout session and daily challenge tracker",
        ));
}

#[test]
fn test_first_run_creates_seeded_store() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("workouts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day A").and(predicate::str::contains("(9 exercises)")))
        .stdout(predicate::str::contains("Day B"))
        .stdout(predicate::str::contains("Day C"));

    assert!(temp_dir.path().join("gymtrack.sqlite").exists());
}

#[test]
fn test_show_day_a() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("show")
        .arg("a")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Cardio warm-up (cycling): 10 min"))
        .stdout(predicate::str::contains("★: 10 + 10 reps"))
        .stdout(predicate::str::contains(
            "4. Dumbbell chest press (push): 4 x 10 reps",
        ));
}

#[test]
fn test_show_steps_lists_every_set() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("show")
        .arg("A")
        .arg("--steps")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Dumbbell chest press (push) (set 4/4): 10 reps",
        ));
}

#[test]
fn test_invalid_session_type_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("show")
        .arg("Z")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid session type"));
}

#[test]
fn test_last_when_empty() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("last")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions recorded yet"));
}

#[test]
fn test_last_session_is_most_recently_logged() {
    let temp_dir = setup_test_dir();
    log_session(temp_dir.path(), "A", "2026-02-20", false);
    log_session(temp_dir.path(), "B", "2026-02-18", false);

    cli(temp_dir.path())
        .arg("last")
        .assert()
        .success()
        .stdout(predicate::str::contains("#2 Day B on 2026-02-18"));
}

#[test]
fn test_last_as_json() {
    let temp_dir = setup_test_dir();
    log_session(temp_dir.path(), "C", "2026-02-20", true);

    let output = cli(temp_dir.path())
        .arg("last")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let session: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(session["session_type"], "C");
    assert_eq!(session["date"], "2026-02-20");
    assert_eq!(session["started_at"], "2026-02-20T08:00:00");
    assert_eq!(session["is_partial"], true);
}

#[test]
fn test_history_range_inclusive() {
    let temp_dir = setup_test_dir();
    log_session(temp_dir.path(), "A", "2026-02-18", false);
    log_session(temp_dir.path(), "B", "2026-02-19", false);
    log_session(temp_dir.path(), "C", "2026-02-20", false);

    let output = cli(temp_dir.path())
        .arg("history")
        .arg("--from")
        .arg("2026-02-19")
        .arg("--to")
        .arg("2026-02-20")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("2026-02-20"));
    assert!(lines[1].contains("2026-02-19"));
}

#[test]
fn test_challenge_increments_and_caps() {
    let temp_dir = setup_test_dir();
    let expected = ["1/3 sets", "2/3 sets", "3/3 sets ✓ complete", "3/3 sets ✓ complete"];

    for text in expected {
        cli(temp_dir.path())
            .arg("challenge")
            .arg("--date")
            .arg("2026-02-20")
            .assert()
            .success()
            .stdout(predicate::str::contains(text));
    }
}

#[test]
fn test_challenge_set_overwrites() {
    let temp_dir = setup_test_dir();

    for sets in ["1", "3"] {
        cli(temp_dir.path())
            .arg("challenge")
            .arg("--date")
            .arg("2026-02-20")
            .arg("--set")
            .arg(sets)
            .assert()
            .success();
    }

    cli(temp_dir.path())
        .arg("stats")
        .arg("--from")
        .arg("2026-02-01")
        .arg("--to")
        .arg("2026-02-28")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Completed challenges (2026-02-01 to 2026-02-28): 1",
        ))
        .stdout(predicate::str::contains("Longest streak: 1 days"));
}

#[test]
fn test_challenge_set_out_of_range_fails() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("challenge")
        .arg("--set")
        .arg("4")
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 3"));
}

#[test]
fn test_rejected_set_is_logged() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .env("RUST_LOG", "debug")
        .arg("challenge")
        .arg("--date")
        .arg("2026-02-20")
        .arg("--set")
        .arg("9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Using data directory"))
        .stderr(predicate::str::contains("Rejected challenge count 9 for 2026-02-20"));
}

#[test]
fn test_stats_counts_workout_days_and_streaks() {
    let temp_dir = setup_test_dir();
    for date in ["2026-02-17", "2026-02-18", "2026-02-20"] {
        cli(temp_dir.path())
            .arg("challenge")
            .arg("--date")
            .arg(date)
            .arg("--set")
            .arg("3")
            .assert()
            .success();
    }
    log_session(temp_dir.path(), "A", "2026-02-18", false);
    log_session(temp_dir.path(), "B", "2026-02-19", true);

    cli(temp_dir.path())
        .arg("stats")
        .arg("--from")
        .arg("2026-02-01")
        .arg("--to")
        .arg("2026-02-28")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Completed challenges (2026-02-01 to 2026-02-28): 3",
        ))
        .stdout(predicate::str::contains(
            "Workout days (2026-02-01 to 2026-02-28): 1",
        ))
        .stdout(predicate::str::contains("Longest streak: 2 days"));
}

#[test]
fn test_start_auto_finish_logs_full_session() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("start")
        .arg("B")
        .arg("--auto-finish")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day B"))
        .stdout(predicate::str::contains("Session #1 logged"));

    cli(temp_dir.path())
        .arg("last")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day B"))
        .stdout(predicate::str::contains("partial").not());
}

#[test]
fn test_start_auto_abort_logs_partial_session() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("start")
        .arg("C")
        .arg("--auto-abort")
        .assert()
        .success()
        .stdout(predicate::str::contains("Partial session #1 logged"));

    cli(temp_dir.path())
        .arg("last")
        .assert()
        .success()
        .stdout(predicate::str::contains("partial"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    log_session(temp_dir.path(), "A", "2026-02-18", false);
    log_session(temp_dir.path(), "B", "2026-02-19", true);

    let csv_path = temp_dir.path().join("export").join("sessions.csv");
    cli(temp_dir.path())
        .arg("export")
        .arg("--output")
        .arg(&csv_path)
        .arg("--from")
        .arg("2026-02-01")
        .arg("--to")
        .arg("2026-02-28")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 sessions"));

    let content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(content.starts_with("id,session_type,date,started_at,duration_seconds,is_partial"));
    assert!(content.contains("2,B,2026-02-19,2026-02-19T08:00:00,2400,true"));
}

#[test]
fn test_data_persists_across_runs() {
    let temp_dir = setup_test_dir();
    log_session(temp_dir.path(), "A", "2026-02-18", false);

    // Reopening must neither reseed nor lose sessions
    cli(temp_dir.path())
        .arg("workouts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day A").count(1));

    cli(temp_dir.path())
        .arg("last")
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 Day A"));
}
