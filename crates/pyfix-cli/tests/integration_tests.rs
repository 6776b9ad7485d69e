//! Integration tests for the pyfix CLI
//!
//! These tests run the built binary end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const LEGACY: &str = "import sys\n\nresult = apply(run, args, kwds)\n";
const MODERN: &str = "import sys\n\nresult = run(*args, **kwds)\n";

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("pyfix").unwrap()
}

/// Project with one file that needs a fix and one that doesn't
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("legacy.py"), LEGACY).unwrap();
    fs::write(temp_dir.path().join("clean.py"), "print('hi')\n").unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--write"))
        .stdout(predicate::str::contains("--nobackups"))
        .stdout(predicate::str::contains("--list-fixes"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_list_fixes() {
    cli()
        .args(["--no-color", "-l"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Available fixers:"))
        .stdout(predicate::str::contains(
            "apply  Replace apply(f, args, kwds) with f(*args, **kwds)",
        ));
}

#[test]
fn test_dry_run_prints_diff_and_leaves_files() {
    let temp_dir = create_test_project();
    let legacy = temp_dir.path().join("legacy.py");

    cli()
        .arg("--no-color")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(original)"))
        .stdout(predicate::str::contains("(refactored)"))
        .stdout(predicate::str::contains("-result = apply(run, args, kwds)"))
        .stdout(predicate::str::contains("+result = run(*args, **kwds)"))
        .stdout(predicate::str::contains("Files checked: 2"))
        .stdout(predicate::str::contains("Files that need changes: 1"));

    assert_eq!(fs::read_to_string(&legacy).unwrap(), LEGACY);
    assert!(!temp_dir.path().join("legacy.py.bak").exists());
}

#[test]
fn test_write_keeps_backup() {
    let temp_dir = create_test_project();
    let legacy = temp_dir.path().join("legacy.py");

    cli()
        .args(["--no-color", "-w"])
        .arg(&legacy)
        .assert()
        .success()
        .stdout(predicate::str::contains("Files rewritten: 1"));

    assert_eq!(fs::read_to_string(&legacy).unwrap(), MODERN);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("legacy.py.bak")).unwrap(),
        LEGACY
    );
}

#[test]
fn test_write_without_backups() {
    let temp_dir = create_test_project();
    let legacy = temp_dir.path().join("legacy.py");

    cli()
        .args(["--no-color", "-w", "-n", "--no-diff"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(original)").not());

    assert_eq!(fs::read_to_string(&legacy).unwrap(), MODERN);
    assert!(!temp_dir.path().join("legacy.py.bak").exists());
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("clean.py")).unwrap(),
        "print('hi')\n"
    );
}

#[test]
fn test_check_fails_when_changes_needed() {
    let temp_dir = create_test_project();
    cli()
        .args(["--no-color", "--check"])
        .arg(temp_dir.path().join("legacy.py"))
        .assert()
        .code(1);
}

#[test]
fn test_check_passes_on_clean_file() {
    let temp_dir = create_test_project();
    cli()
        .args(["--no-color", "--check"])
        .arg(temp_dir.path().join("clean.py"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes needed"));
}

#[test]
fn test_check_conflicts_with_write() {
    cli().args(["--check", "--write", "."]).assert().failure();
}

#[test]
fn test_nofix_disables_apply() {
    let temp_dir = create_test_project();
    let legacy = temp_dir.path().join("legacy.py");

    cli()
        .args(["--no-color", "-w", "-x", "apply"])
        .arg(&legacy)
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes needed"));

    assert_eq!(fs::read_to_string(&legacy).unwrap(), LEGACY);
}

#[test]
fn test_unknown_fixer_is_fatal() {
    let temp_dir = create_test_project();
    cli()
        .args(["--no-color", "-f", "nonexistent"])
        .arg(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown fixer"));
}

#[test]
fn test_unparsable_file_is_reported_and_others_continue() {
    let temp_dir = create_test_project();
    fs::write(temp_dir.path().join("broken.py"), "apply(f, a\n").unwrap();

    cli()
        .args(["--no-color", "-w", "-n"])
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken.py"))
        .stdout(predicate::str::contains("Failures: 1"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("legacy.py")).unwrap(),
        MODERN
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("broken.py")).unwrap(),
        "apply(f, a\n"
    );
}

#[test]
fn test_config_file_disables_backups() {
    let temp_dir = create_test_project();
    fs::write(
        temp_dir.path().join("pyfix.toml"),
        "[write]\nbackups = false\n",
    )
    .unwrap();

    cli()
        .args(["--no-color", "-w"])
        .arg(temp_dir.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("legacy.py")).unwrap(),
        MODERN
    );
    assert!(!temp_dir.path().join("legacy.py.bak").exists());
}

#[test]
fn test_exclude_pattern_skips_files() {
    let temp_dir = create_test_project();
    cli()
        .args(["--no-color", "--exclude", "legacy*"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files checked: 1"))
        .stdout(predicate::str::contains("No changes needed"));
}

#[test]
fn test_missing_path_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .arg("--no-color")
        .arg(temp_dir.path().join("missing.py"))
        .assert()
        .code(2);
}

#[test]
fn test_missing_config_is_fatal() {
    let temp_dir = create_test_project();
    cli()
        .args(["--no-color", "-c"])
        .arg(temp_dir.path().join("nope.toml"))
        .arg(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config file not found"));
}
