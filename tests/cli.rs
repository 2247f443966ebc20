//! Integration tests for the `mrl-local` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.txt"), "apple banana apple").unwrap();
    fs::write(dir.path().join("two.txt"), "banana cherry").unwrap();
    dir
}

fn submit(dir: &TempDir, workload: &str) -> Command {
    let mut cmd = Command::cargo_bin("mrl-local").unwrap();
    cmd.arg("submit")
        .arg("--input")
        .arg(dir.path().join("*.txt"))
        .arg("--workload")
        .arg(workload)
        .arg("--output")
        .arg(dir.path().join("out"));
    cmd
}

#[test]
fn help_lists_submit() {
    let mut cmd = Command::cargo_bin("mrl-local").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"));
}

#[test]
fn word_count_job_writes_sorted_output() {
    let dir = setup();

    submit(&dir, "wc")
        .args(["--threads", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mr-out"));

    let out = fs::read_to_string(dir.path().join("out").join("mr-out")).unwrap();
    assert_eq!(out, "apple 2\nbanana 2\ncherry 1\n");
}

#[test]
fn inverted_index_job() {
    let dir = setup();

    submit(&dir, "inverted-index").assert().success();

    let out = fs::read_to_string(dir.path().join("out").join("mr-out")).unwrap();
    let banana = out.lines().find(|line| line.starts_with("banana ")).unwrap();
    assert!(banana.contains("one.txt") && banana.contains("two.txt"));
}

#[test]
fn grep_job_uses_trailing_args() {
    let dir = setup();

    submit(&dir, "grep").args(["--", "--term", "cherry"]).assert().success();

    let out = fs::read_to_string(dir.path().join("out").join("mr-out")).unwrap();
    assert!(out.contains("two.txt:1:: banana cherry"));
    assert!(!out.contains("one.txt"));
}

#[test]
fn zero_or_negative_threads_fail() {
    let dir = setup();
    for threads in ["0", "-2"] {
        submit(&dir, "wc")
            .args(["--threads", threads])
            .assert()
            .failure()
            .stderr(predicate::str::contains("thread count has to be a positive number"));
    }
}

#[test]
fn unknown_workload_fails() {
    let dir = setup();
    submit(&dir, "nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No app named `nope` found."));
}
