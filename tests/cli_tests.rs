// End-to-end tests of the gpgpass binary for commands that do not need GPG.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn gpgpass(vault: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gpgpass").unwrap();
    cmd.env_remove("GPGPASS_DIR")
        .env_remove("GPGPASS_GPG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--vault")
        .arg(vault);
    cmd
}

#[test]
fn test_ls_uninitialized_fails() {
    let dir = tempdir().unwrap();
    gpgpass(&dir.path().join("vault"))
        .arg("ls")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_init_writes_registry() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");

    gpgpass(&vault)
        .args(["init", "alice@example.com", "bob@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault initialized"));

    assert_eq!(
        fs::read_to_string(vault.join(".gpg_id")).unwrap(),
        "alice@example.com\nbob@example.com\n"
    );
}

#[test]
fn test_reinit_needs_force() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");

    gpgpass(&vault).args(["init", "alice@example.com"]).assert().success();
    gpgpass(&vault)
        .args(["init", "bob@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
    assert_eq!(
        fs::read_to_string(vault.join(".gpg_id")).unwrap(),
        "alice@example.com\n"
    );

    gpgpass(&vault)
        .args(["init", "--force", "bob@example.com"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(vault.join(".gpg_id")).unwrap(),
        "bob@example.com\n"
    );
}

#[test]
fn test_ls_prints_tree() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    gpgpass(&vault).args(["init", "alice@example.com"]).assert().success();

    fs::create_dir_all(vault.join("site/sub")).unwrap();
    fs::write(vault.join("email.gpg"), "x").unwrap();
    fs::write(vault.join("site/login.gpg"), "x").unwrap();
    fs::write(vault.join("site/sub/deep.gpg"), "x").unwrap();
    fs::write(vault.join("README"), "not an entry").unwrap();

    gpgpass(&vault)
        .arg("ls")
        .assert()
        .success()
        .stdout("  email\n[site]\n    login\n    [sub]\n      deep\n");
}

#[test]
fn test_ls_json() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    gpgpass(&vault).args(["init", "alice@example.com"]).assert().success();
    fs::write(vault.join("email.gpg"), "x").unwrap();

    let output = gpgpass(&vault).args(["-o", "json", "ls"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["name"], "email");
    assert_eq!(json[0]["kind"], "entry");
}

#[test]
fn test_rm() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    gpgpass(&vault).args(["init", "alice@example.com"]).assert().success();

    gpgpass(&vault)
        .args(["rm", "site/login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'site/login' not found"));

    fs::create_dir_all(vault.join("site")).unwrap();
    fs::write(vault.join("site/login.gpg"), "x").unwrap();

    gpgpass(&vault)
        .args(["rm", "site/login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'site/login'"));
    assert!(!vault.join("site/login.gpg").exists());
    assert!(vault.join("site").is_dir());
}

#[test]
fn test_rm_rejects_escaping_names() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    gpgpass(&vault).args(["init", "alice@example.com"]).assert().success();
    fs::write(dir.path().join("outside.gpg"), "x").unwrap();

    gpgpass(&vault)
        .args(["rm", "../outside"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid entry name"));
    assert!(dir.path().join("outside.gpg").exists());
}

#[test]
fn test_missing_gpg_is_reported() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    gpgpass(&vault).args(["init", "alice@example.com"]).assert().success();
    fs::write(vault.join("x.gpg"), "x").unwrap();

    gpgpass(&vault)
        .args(["--gpg", "gpgpass-no-such-gpg", "view", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GPG not available"));
}

#[test]
fn test_init_requires_recipient() {
    let dir = tempdir().unwrap();
    gpgpass(&dir.path().join("vault"))
        .arg("init")
        .assert()
        .failure();
    assert!(!dir.path().join("vault").exists());
}
