
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;
use test_helpers::{base_command, sample_store};

#[test]
#[serial]
fn test_cli_recent_prints_json() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());

    let output = base_command(&db_path)
        .args(["recent", "--limit", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["uuid"], "ENTRY-2");
    assert_eq!(entries[1]["tags"], serde_json::json!(["morning", "river"]));
}

#[test]
#[serial]
fn test_cli_journals_with_counts() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());

    base_command(&db_path)
        .args(["journals", "--counts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entry_count\": 2"))
        .stdout(predicate::str::contains("\"Empty\""));
}

#[test]
#[serial]
fn test_cli_count() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());

    base_command(&db_path)
        .args(["count", "--journal", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 2"));
}

#[test]
#[serial]
fn test_cli_invalid_date() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());

    base_command(&db_path)
        .args(["on-this-day", "13-40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
#[serial]
fn test_cli_missing_database() {
    let temp_dir = TempDir::new().unwrap();

    base_command(&temp_dir.path().join("DayOne.sqlite"))
        .arg("recent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("has been run at least once"));
}

#[test]
#[serial]
fn test_cli_show_unknown_entry() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());

    base_command(&db_path)
        .args(["show", "NO-SUCH-ENTRY"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NO-SUCH-ENTRY"));
}

#[test]
#[serial]
fn test_cli_blank_search() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());

    base_command(&db_path)
        .args(["search", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search text cannot be empty"));
}

#[test]
#[serial]
fn test_cli_rejects_unsafe_cli_command() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());

    base_command(&db_path)
        .env("DAYONE_CLI", "dayone2; rm -rf /")
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_cli_create_with_fake_cli() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());
    let (cli, _) = test_helpers::fake_cli(temp_dir.path());

    base_command(&db_path)
        .env("DAYONE_CLI", &cli)
        .args(["create", "Hello from the tests", "--tag", "test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FAKE-0001"));
}

#[test]
#[serial]
fn test_cli_json_logs_go_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = sample_store(temp_dir.path());

    let output = base_command(&db_path)
        .env("RUST_LOG", "info")
        .args(["--log-format", "json", "count"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout["count"], 5);
    assert!(String::from_utf8_lossy(&output.stderr).contains("correlation_id"));
}
