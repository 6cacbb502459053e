//! Integration tests for the keychain CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! master password is supplied through `KEYCHAIN_PASSWORD` so no
//! interactive prompt is needed.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "cli-test-password";

/// Helper: get a Command pointing at the keychain binary.
fn keychain() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("keychain").expect("binary should exist")
}

/// Helper: a command running inside `dir` with the password preset.
fn keychain_in(dir: &TempDir) -> Command {
    let mut cmd = keychain();
    cmd.current_dir(dir.path())
        .env("KEYCHAIN_PASSWORD", PASSWORD)
        .env_remove("RUST_LOG");
    cmd
}

fn init(dir: &TempDir) {
    keychain_in(dir).arg("init").assert().success();
}

#[test]
fn help_flag_shows_usage() {
    keychain()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Password-protected keychain"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn version_flag_shows_version() {
    keychain()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("keychain"));
}

#[test]
fn no_args_shows_help() {
    keychain()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn init_creates_keychain_and_pin() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    tmp.child(".keychain/keychain.json")
        .assert(predicate::path::exists());
    tmp.child(".keychain/keychain.pin")
        .assert(predicate::path::exists());
}

#[test]
fn init_twice_fails() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    keychain_in(&tmp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn set_get_remove_flow() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    keychain_in(&tmp)
        .args(["set", "example.com", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added"));

    keychain_in(&tmp)
        .args(["get", "example.com"])
        .assert()
        .success()
        .stdout(predicate::eq("hunter2\n"));

    keychain_in(&tmp)
        .args(["remove", "example.com", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    keychain_in(&tmp)
        .args(["get", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no secret stored"));
}

#[test]
fn set_reads_piped_value() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    keychain_in(&tmp)
        .args(["set", "piped.example"])
        .write_stdin("from-stdin\n")
        .assert()
        .success();

    keychain_in(&tmp)
        .args(["get", "piped.example"])
        .assert()
        .success()
        .stdout(predicate::eq("from-stdin\n"));
}

#[test]
fn keychain_file_does_not_contain_plaintext() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    keychain_in(&tmp)
        .args(["set", "www.stanford.edu", "sunetpassword"])
        .assert()
        .success();

    tmp.child(".keychain/keychain.json")
        .assert(predicate::str::contains("stanford").not())
        .assert(predicate::str::contains("sunetpassword").not());
}

#[test]
fn wrong_password_cannot_read_secrets() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    keychain_in(&tmp)
        .args(["set", "example.com", "hunter2"])
        .assert()
        .success();

    keychain_in(&tmp)
        .env("KEYCHAIN_PASSWORD", "not-the-password")
        .args(["get", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));
}

#[test]
fn rollback_is_detected_by_pin() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    keychain_in(&tmp)
        .args(["set", "example.com", "old-secret"])
        .assert()
        .success();
    let stale = std::fs::read(tmp.child(".keychain/keychain.json").path()).unwrap();

    keychain_in(&tmp)
        .args(["set", "example.com", "new-secret"])
        .assert()
        .success();

    tmp.child(".keychain/keychain.json")
        .write_binary(&stale)
        .unwrap();

    keychain_in(&tmp)
        .args(["get", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checksum mismatch"));

    keychain_in(&tmp)
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pinned checksum"));
}

#[test]
fn verify_reports_entries() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    keychain_in(&tmp)
        .args(["set", "a.com", "s1"])
        .assert()
        .success();

    keychain_in(&tmp)
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries"))
        .stdout(predicate::str::contains("verified"));
}

#[test]
fn custom_dir_flag_is_respected() {
    let tmp = TempDir::new().unwrap();

    keychain_in(&tmp)
        .args(["--dir", "vaults", "init"])
        .assert()
        .success();

    tmp.child("vaults/keychain.json")
        .assert(predicate::path::exists());
}

#[test]
fn get_on_missing_keychain_fails() {
    let tmp = TempDir::new().unwrap();

    keychain_in(&tmp)
        .args(["get", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn empty_domain_is_rejected() {
    let tmp = TempDir::new().unwrap();
    init(&tmp);

    keychain_in(&tmp)
        .args(["set", "", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("domain cannot be empty"));
}

#[test]
fn completions_generate_script() {
    keychain()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keychain"));
}
