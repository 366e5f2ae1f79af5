//! Tests for the `init` command
//!
//! Tests starter config file creation and the refusal to overwrite

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the sitecfg binary command
fn get_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sitecfg"))
}

#[test]
fn test_init_creates_starter_config_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");

    let mut cmd = get_bin();
    cmd.arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sitecfg.toml"));

    // Verify config file was created
    let config_path = temp_dir.path().join("sitecfg.toml");
    assert!(config_path.exists());

    // Verify config content
    let config_content = fs::read_to_string(&config_path).expect("Failed to read file contents");
    assert!(config_content.contains("images.pexels.com"));
    assert!(config_content.contains("remotePatterns"));
    assert!(config_content.contains("/old-page"));
}

#[test]
fn test_init_refuses_to_overwrite_existing_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
    let config_path = temp_dir.path().join("sitecfg.toml");
    fs::write(&config_path, "compress = false\n").expect("Failed to seed config");

    let mut cmd = get_bin();
    cmd.arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    // Original content is untouched
    let content = fs::read_to_string(&config_path).expect("Failed to read file contents");
    assert_eq!(content, "compress = false\n");
}

#[test]
fn test_init_output_passes_check() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");

    get_bin()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .success();

    get_bin()
        .arg("check")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}
