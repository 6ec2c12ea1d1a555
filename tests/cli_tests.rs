//! CLI surface tests: argument parsing and help text only, nothing that
//! needs a Docker daemon.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_documents_positional_defaults() {
    Command::cargo_bin("dock2tauri")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("IMAGE_OR_DOCKERFILE"))
        .stdout(predicate::str::contains("HOST_PORT"))
        .stdout(predicate::str::contains("CONTAINER_PORT"))
        .stdout(predicate::str::contains("--build"))
        .stdout(predicate::str::contains("--cross"));
}

#[test]
fn missing_image_argument_fails() {
    Command::cargo_bin("dock2tauri")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("IMAGE_OR_DOCKERFILE"));
}

#[test]
fn non_numeric_port_is_rejected() {
    Command::cargo_bin("dock2tauri")
        .unwrap()
        .args(["nginx:alpine", "not-a-port"])
        .assert()
        .failure();
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("dock2tauri")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dock2tauri"));
}
