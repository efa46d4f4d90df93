//! End-to-end smoke tests for the `storecheck` binary, driven through the
//! simulated storefront so no browser is needed.

#![allow(deprecated)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn storecheck() -> Command {
    let mut cmd = Command::cargo_bin("storecheck").expect("binary builds");
    cmd.env_remove("STORECHECK_BASE_URL")
        .env_remove("CHROMIUM_PATH")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    storecheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version() {
    storecheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_default_suite() {
    storecheck()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("contact/validation-then-correction"))
        .stdout(predicate::str::contains("contact/successful-submission/run-5"))
        .stdout(predicate::str::contains("shop/cart-accumulation"));
}

#[test]
fn test_list_json_with_filter() {
    storecheck()
        .args(["list", "--json", "--filter", "cart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"cart_accumulation\""))
        .stdout(predicate::str::contains("validation").not());
}

#[test]
fn test_config_prints_defaults() {
    storecheck()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"))
        .stdout(predicate::str::contains("Stuffed Frog"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storecheck.yaml");

    storecheck()
        .args(["config", "--init"])
        .arg(&path)
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("submission_runs"));

    storecheck()
        .args(["config", "--init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_simulated_run_passes() {
    storecheck()
        .args(["--color", "never", "run", "--driver", "simulated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"))
        .stdout(predicate::str::contains("storecheck: 7/7 passed (100.0%)"));
}

#[test]
fn test_simulated_run_writes_junit() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("out").join("junit.xml");

    storecheck()
        .args(["-q", "run", "--driver", "simulated", "--filter", "cart"])
        .args(["--format", "junit", "--output"])
        .arg(&report)
        .assert()
        .success();

    let xml = std::fs::read_to_string(report).unwrap();
    assert!(xml.contains(r#"tests="1""#));
    assert!(xml.contains(r#"failures="0""#));
    assert!(xml.contains("shop/cart-accumulation"));
}

#[test]
fn test_simulated_run_json_to_stdout() {
    storecheck()
        .args(["-q", "run", "--driver", "simulated", "--filter", "run-1"])
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("contact/successful-submission/run-1"))
        .stdout(predicate::str::contains("\"passed\""));
}

#[test]
fn test_unmatched_filter_fails() {
    storecheck()
        .args(["run", "--driver", "simulated", "--filter", "checkout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenario matches filter"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "runner:\n  workers: 0\n").unwrap();

    storecheck()
        .args(["run", "--driver", "simulated", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("runner.workers must be at least 1"));
}

#[test]
fn test_unknown_config_key_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("typo.yaml");
    std::fs::write(&path, "runer:\n  workers: 2\n").unwrap();

    storecheck()
        .args(["list", "--config"])
        .arg(&path)
        .assert()
        .failure();
}
