//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitopsmith"));
}

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Scaffold and manage GitOps repositories",
        ));
}

#[test]
fn test_bootstrap_reports_all_missing_flags_sorted() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("bootstrap-new")
        .arg("--output")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "required flag(s) \"application-name\", \"component-name\", \"git-repo-url\", \"secret\" not set",
        ));
}

#[test]
fn test_component_add_missing_component_name() {
    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("component")
        .arg("add")
        .arg("--application-name")
        .arg("app1")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "required flag(s) \"component-name\" not set",
        ));
}

#[test]
fn test_invalid_component_name_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.env("GITHUB_COM_TOKEN", "abcdefghijklmnop")
        .arg("bootstrap-new")
        .arg("--application-name")
        .arg("app1")
        .arg("--component-name")
        .arg("Not_A_Label")
        .arg("--git-repo-url")
        .arg("https://github.com/org/gitops")
        .arg("--secret")
        .arg("abcdefghijklmnop")
        .arg("--output")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("is not a valid name"));
}

#[test]
fn test_invalid_target_port_rejected() {
    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("component")
        .arg("add")
        .arg("--application-name")
        .arg("app1")
        .arg("--component-name")
        .arg("comp1")
        .arg("--target-port")
        .arg("80")
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("target port"));
}

#[test]
fn test_push_without_git_repository() {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("app1");
    fs::create_dir_all(app.join("components")).unwrap();

    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("push")
        .arg("--application-folder")
        .arg(&app)
        .arg("--commit-message")
        .arg("whatever")
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains(
            "no git repository has been initialized",
        ));
}

#[test]
fn test_push_missing_folder() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("push")
        .arg("--application-folder")
        .arg(temp_dir.path().join("nowhere"))
        .arg("--commit-message")
        .arg("whatever")
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn test_describe_empty_application() {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("app1");
    fs::create_dir_all(app.join("components")).unwrap();

    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("describe")
        .arg("--application-folder")
        .arg(&app)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No component is present in your application",
        ));
}

#[test]
fn test_describe_rejects_unrelated_folder() {
    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("notanapp");
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("readme.md"), "hello").unwrap();

    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.arg("describe")
        .arg("--application-folder")
        .arg(&folder)
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_init_rejects_invalid_driver() {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("app1");
    fs::create_dir_all(app.join("components")).unwrap();

    let mut cmd = Command::cargo_bin("gitopsmith").unwrap();
    cmd.env("GITHUB_COM_TOKEN", "abcdefghijklmnop")
        .arg("init")
        .arg("--application-folder")
        .arg(&app)
        .arg("--git-repo-url")
        .arg("https://github.com/org/gitops")
        .arg("--private-repo-driver")
        .arg("bitbucket")
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("invalid driver type"));
}
