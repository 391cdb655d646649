use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn hython_call_prints_the_repr() {
    let mut cmd = Command::cargo_bin("hython").expect("binary exists");
    cmd.arg("call").arg("sorted([3, 1, 2])");
    cmd.assert().success().stdout("[1, 2, 3]\n");
}

#[test]
fn hython_call_print_returns_none() {
    let mut cmd = Command::cargo_bin("hython").expect("binary exists");
    cmd.arg("call").arg("print('Hello,', 'Hython!')");
    cmd.assert().success().stdout("Hello, Hython!\n");
}

#[test]
fn hython_run_demo_script() {
    let mut cmd = Command::cargo_bin("hython").expect("binary exists");
    cmd.arg("run").arg("demos/builtins.hy");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[9, 6, 5, 4, 3, 2, 1, 1]"))
        .stdout(predicate::str::contains("[('Alice', 25), ('Bob', 30), ('Charlie', 35)]"));
}

#[test]
fn hython_run_reports_failing_line() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("broken.hy");
    fs::write(&script, "print('before')\nint('nope')\nprint('after')\n").expect("write script");

    let mut cmd = Command::cargo_bin("hython").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("before"))
        .stdout(predicate::str::contains("after").not())
        .stderr(predicate::str::contains("at line 2"));
}

#[test]
fn hython_builtins_lists_the_table() {
    let mut cmd = Command::cargo_bin("hython").expect("binary exists");
    cmd.arg("builtins");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("isinstance"))
        .stdout(predicate::str::contains("range"));
}

#[test]
fn hython_call_unknown_builtin_fails() {
    let mut cmd = Command::cargo_bin("hython").expect("binary exists");
    cmd.arg("call").arg("frobnicate(1)");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("is not defined"));
}

#[test]
fn hython_run_missing_file_fails() {
    let dir = tempdir().expect("create temp dir");
    let mut cmd = Command::cargo_bin("hython").expect("binary exists");
    cmd.arg("run").arg(dir.path().join("missing.hy"));
    cmd.assert().failure();
}
