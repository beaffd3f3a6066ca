//! Integration tests for the `loadglow` binary.
//!
//! These exercise argument handling and exit codes via `assert_cmd`. Nothing
//! here needs a keyboard attached: device-requiring paths are only checked
//! for how they fail.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("loadglow")
}

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("loadglow"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--color"));
}

#[test]
fn cli_short_help_succeeds() {
    cli().arg("-h").assert().success();
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_short_version_prints_version() {
    cli()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ── Argument errors exit 1 ──

#[test]
fn cli_non_numeric_hue_fails() {
    cli()
        .args(["-c", "abc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a number"));
}

#[test]
fn cli_unknown_flag_fails() {
    cli().arg("--frobnicate").assert().code(1);
}

#[test]
fn cli_verbose_flag_accepted() {
    cli().args(["-v", "--help"]).assert().success();
}

#[test]
fn cli_verbose_long_flag_accepted() {
    cli().args(["--verbose", "--help"]).assert().success();
}

// ── Config handling ──

#[test]
fn cli_invalid_config_fails_before_touching_device() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "retry_attempts = 0\n").unwrap();

    cli()
        .arg("--config")
        .arg(&path)
        .arg("--dry-run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("retry_attempts must be > 0"));
}

#[test]
fn cli_monitor_without_keyboard_or_counters_fails() {
    // Whichever is missing first, the keyboard or the counter file, the
    // monitor must exit 1 with an error on stderr.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let stat = dir.path().join("no-such-stat");
    std::fs::write(&path, format!("stat_path = {:?}\n", stat.display().to_string())).unwrap();

    cli()
        .arg("--config")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
