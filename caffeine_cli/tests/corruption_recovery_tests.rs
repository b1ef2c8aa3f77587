//! Corruption recovery tests for the zarurat binary.
//!
//! These tests verify the system can handle:
//! - Corrupted WAL lines
//! - Partial writes
//! - Corrupted drink lists and CSV archives
//! - Invalid configuration

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NOW: &str = "2025-03-14T18:00:00Z";

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("zarurat"));
    cmd.arg("--data-dir")
        .arg(data_dir)
        .arg("--config")
        .arg(data_dir.join("config.toml"))
        .arg("--now")
        .arg(NOW);
    cmd
}

/// Temp data dir with its own config, so the user's own config is never read
fn setup_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().to_path_buf();
    fs::write(data_dir.join("config.toml"), "[user]\nid = \"local\"\n")
        .expect("Failed to write config");
    (temp_dir, data_dir)
}

#[test]
fn test_corrupted_wal_lines_ignored() {
    let (_temp_dir, data_dir) = setup_test_dir();

    fs::create_dir_all(data_dir.join("wal")).unwrap();
    fs::write(
        data_dir.join("wal/drinks.wal"),
        "{ invalid json }\n{ more invalid }\n",
    )
    .expect("Failed to write corrupted WAL");

    cli(&data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.00 mg"));
}

#[test]
fn test_partial_wal_line() {
    let (_temp_dir, data_dir) = setup_test_dir();

    // A valid line followed by a torn write
    cli(&data_dir)
        .arg("log")
        .arg("Espresso")
        .arg("--caffeine")
        .arg("100")
        .assert()
        .success();

    let wal_path = data_dir.join("wal/drinks.wal");
    let mut file = fs::OpenOptions::new().append(true).open(&wal_path).unwrap();
    write!(file, r#"{{"id":"partial"#).unwrap();
    drop(file);

    cli(&data_dir)
        .arg("log")
        .arg("Espresso")
        .arg("--caffeine")
        .arg("100")
        .assert()
        .success();

    // Both complete records count, the torn line does not
    cli(&data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("200.00 mg"));
}

#[test]
fn test_empty_files() {
    let (_temp_dir, data_dir) = setup_test_dir();

    fs::create_dir_all(data_dir.join("wal")).unwrap();
    fs::write(data_dir.join("wal/drinks.wal"), "").unwrap();
    fs::write(data_dir.join("history.csv"), "").unwrap();

    cli(&data_dir)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to plot"));
}

#[test]
fn test_corrupted_drink_list() {
    let (_temp_dir, data_dir) = setup_test_dir();

    fs::create_dir_all(&data_dir).unwrap();
    let list_path = data_dir.join("drinks.json");
    fs::write(&list_path, "{ not valid json at all }").unwrap();

    // Defaults still available
    cli(&data_dir)
        .arg("drinks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Filter Coffee (240 ml)"));

    // Saving a drink replaces the broken file with a valid one
    cli(&data_dir)
        .arg("add-drink")
        .arg("Cortado")
        .arg("--caffeine")
        .arg("85")
        .assert()
        .success();

    let content = fs::read_to_string(&list_path).unwrap();
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(&content);
    assert!(parsed.is_ok(), "Drink list should be valid JSON");
}

#[test]
fn test_bad_csv_rows_skipped() {
    let (_temp_dir, data_dir) = setup_test_dir();

    fs::create_dir_all(&data_dir).unwrap();
    let mut csv = fs::File::create(data_dir.join("history.csv")).unwrap();
    writeln!(csv, "id,user_id,name,caffeine_mg,cost,consumed_at").unwrap();
    writeln!(
        csv,
        "6f1c2d8e-4b7a-4c39-9a55-1f2e3d4c5b6a,local,Green Tea (240 ml),30.0,20.0,2025-03-14T17:00:00+00:00"
    )
    .unwrap();
    writeln!(csv, "not-a-uuid,local,Broken,1.0,1.0,2025-03-14T17:00:00+00:00").unwrap();
    writeln!(csv, "6f1c2d8e-4b7a-4c39-9a55-1f2e3d4c5b6b,local,Broken,1.0,1.0,yesterday").unwrap();
    drop(csv);

    cli(&data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total spend:   20.00"));
}

#[test]
fn test_invalid_config_rejected() {
    let (_temp_dir, data_dir) = setup_test_dir();

    fs::write(data_dir.join("config.toml"), "[decay]\nhalf_life_hours = -1.0\n").unwrap();

    cli(&data_dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("half_life_hours"));
}

#[test]
fn test_unparseable_config_rejected() {
    let (_temp_dir, data_dir) = setup_test_dir();

    fs::write(data_dir.join("config.toml"), "[chart\npast_hours = ").unwrap();

    cli(&data_dir)
        .arg("status")
        .assert()
        .failure();
}
