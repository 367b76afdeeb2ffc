//! Tests for the `weekplan slots` command

use std::path::PathBuf;
use std::process::Command;

fn weekplan_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_weekplan"))
}

fn slots(args: &[&str]) -> String {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(weekplan_binary())
        .current_dir(dir.path())
        .env_remove("WEEKPLAN_CONFIG")
        .arg("slots")
        .args(args)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn text_lists_days_and_hours() {
    let stdout = slots(&[]);
    assert!(stdout.contains("Days:  Mon Tue Wed Thu Fri Sat Sun"));
    assert!(stdout.contains("Hours: 07:00 08:00"));
    assert!(stdout.trim_end().ends_with("23:00 00:00"));
}

#[test]
fn json_lists_days_and_hours() {
    let value: serde_json::Value = serde_json::from_str(&slots(&["--format", "json"])).unwrap();
    assert_eq!(value["days"].as_array().unwrap().len(), 7);

    let hours = value["hours"].as_array().unwrap();
    assert_eq!(hours.len(), 18);
    assert_eq!(hours[0], "07:00");
    assert_eq!(hours[17], "00:00");
}

#[test]
fn invalid_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "tick_seconds = 0\n").unwrap();

    let output = Command::new(weekplan_binary())
        .current_dir(dir.path())
        .env("WEEKPLAN_CONFIG", &config)
        .arg("slots")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse config file"));
}
