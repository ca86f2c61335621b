#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn rotamail() -> Command {
    let mut cmd = Command::cargo_bin("rotamail").unwrap();
    cmd.env_remove("ROTAMAIL_CONFIG")
        .env_remove("RUST_LOG")
        .env("SENDER_PASSWORD", "test-password");
    cmd
}

/// Lay out lists, body and config in `dir`; returns the config path.
/// The relay points at a closed local port so delivery fails fast.
fn setup(dir: &TempDir, subject: &str, team1: &str, team2: &str) -> PathBuf {
    std::fs::write(dir.path().join("team1.txt"), team1).unwrap();
    std::fs::write(dir.path().join("team2.txt"), team2).unwrap();
    std::fs::write(dir.path().join("body.html"), "<p>Reviews please</p>").unwrap();
    let config = format!(
        r#"{{
    "subject": "{subject}",
    "sender": "rota",
    "domain": "example.com",
    "smtpHost": "localhost",
    "smtpPort": 1,
    "smtpTimeoutSecs": 2,
    "recepients": ["dev-team"],
    "team1Users": "team1.txt",
    "team2Users": "team2.txt",
    "bodyFilePath": "body.html"
}}"#
    );
    let path = dir.path().join("rotamail.json");
    std::fs::write(&path, config).unwrap();
    path
}

fn read(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).unwrap()
}

#[test]
fn config_flag_is_required() {
    rotamail()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn version_flag_succeeds() {
    rotamail()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rotamail"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    rotamail()
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn malformed_subject_fails_before_rotating() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "On call: %s", "alice\nbob\n", "dan\nerin\n");

    rotamail()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));

    assert_eq!(read(&dir, "team1.txt"), "alice\nbob\n");
    assert_eq!(read(&dir, "team2.txt"), "dan\nerin\n");
}

#[test]
fn missing_password_fails_before_rotating() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "On call: %s and %s", "alice\nbob\n", "dan\nerin\n");

    rotamail()
        .env_remove("SENDER_PASSWORD")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("SENDER_PASSWORD"));

    assert_eq!(read(&dir, "team1.txt"), "alice\nbob\n");
}

#[test]
fn empty_list_fails_without_rotating_either() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "On call: %s and %s", "alice\nbob\n", "");

    rotamail()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rotation list is empty"));

    assert_eq!(read(&dir, "team1.txt"), "alice\nbob\n");
    assert_eq!(read(&dir, "team2.txt"), "");
}

#[test]
fn config_from_environment_is_used() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "On call: %s", "alice\n", "dan\n");

    rotamail()
        .env("ROTAMAIL_CONFIG", &config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn unreachable_relay_fails_after_rotating() {
    let dir = TempDir::new().unwrap();
    let config = setup(
        &dir,
        "On call: %s and %s",
        "alice\nbob\ncarol\n",
        "dan\nerin\n",
    );

    rotamail()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("notification failed"));

    assert_eq!(read(&dir, "team1.txt"), "bob\ncarol\nalice\n");
    assert_eq!(read(&dir, "team2.txt"), "erin\ndan\n");
}
