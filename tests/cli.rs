//! End-to-end tests driving the built `polyscript` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn polyscript() -> Command {
    Command::cargo_bin("polyscript").expect("binary builds")
}

#[test]
fn runs_a_script_file_and_exits_zero() {
    polyscript()
        .arg("run")
        .arg("tests/fixtures/closures.ps")
        .assert()
        .success()
        .stdout(predicate::str::contains("11"));
}

#[test]
fn list_index_call_form_scenario() {
    polyscript()
        .arg("run")
        .arg("tests/fixtures/find.ps")
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn object_namespace_and_enum_scenario() {
    polyscript()
        .arg("run")
        .arg("tests/fixtures/objects.ps")
        .assert()
        .success()
        .stdout(predicate::str::contains("7"))
        .stdout(predicate::str::contains("Color.Green"))
        .stdout(predicate::str::contains("1"));
}

#[test]
fn type_error_exits_nonzero_with_diagnostic() {
    polyscript()
        .arg("run")
        .arg("tests/fixtures/type_error.ps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("RuntimeError"));
}

#[test]
fn runtime_error_prints_call_traceback() {
    polyscript()
        .arg("run")
        .arg("tests/fixtures/traceback.ps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Traceback (most recent call last):"))
        .stderr(predicate::str::contains("in outer"))
        .stderr(predicate::str::contains("in inner"));
}

#[test]
fn missing_file_is_reported_and_fails() {
    polyscript()
        .arg("run")
        .arg("tests/fixtures/does_not_exist.ps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn show_tokens_dumps_token_stream() {
    polyscript()
        .arg("run")
        .arg("tests/fixtures/find.ps")
        .arg("--showTokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("TOKENS ["));
}

#[test]
fn repl_banner_and_exit() {
    polyscript()
        .write_stdin("exit()\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Polyscript"))
        .stdout(predicate::str::contains("use exit() to exit."));
}

#[test]
fn repl_evaluates_and_persists_bindings() {
    polyscript()
        .write_stdin("var x = 1\nx + 2\nexit()\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));
}
