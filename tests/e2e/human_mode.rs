//! Human-mode end-to-end tests.

use predicates::prelude::*;

use crate::common::fixtures::ImageTree;
use crate::common::init_test_logging;
use crate::trmnld_cmd;

#[test]
fn version_prints_name() {
    init_test_logging();
    trmnld_cmd()
        .args(["--no-color", "version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(concat!(
            "trmnld ",
            env!("CARGO_PKG_VERSION")
        )))
        .stdout(predicate::str::contains("target:"));
}

#[test]
fn images_lists_paths_and_durations() {
    init_test_logging();
    let tree = ImageTree::with_files(&["album/one--30.png", "two.png"]);
    trmnld_cmd()
        .arg("--no-color")
        .arg("images")
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 image(s)"))
        .stdout(predicate::str::contains("album/one--30.png"))
        .stdout(predicate::str::contains("30s"))
        .stdout(predicate::str::contains("900s"));
}

#[test]
fn images_in_empty_directory() {
    init_test_logging();
    let tree = ImageTree::empty();
    trmnld_cmd()
        .arg("images")
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No images"));
}

#[test]
fn credential_prints_friendly_id() {
    init_test_logging();
    trmnld_cmd()
        .args(["--no-color", "credential", "AA:BB:CC:DD:EE:FF"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"friendly_id: [0-9A-F]{3}-[0-9A-F]{3}").unwrap());
}

#[test]
fn missing_directory_prints_error_and_hint() {
    init_test_logging();
    let tree = ImageTree::empty();
    trmnld_cmd()
        .arg("--no-color")
        .arg("images")
        .arg(tree.path().join("missing"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Hint:"));
}

#[test]
fn serve_with_missing_config_fails() {
    init_test_logging();
    trmnld_cmd()
        .args(["serve", "--config", "/definitely/not/here/trmnld.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn completions_generate() {
    init_test_logging();
    trmnld_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trmnld"));
}
