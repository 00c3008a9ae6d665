mod common;

use common::command::{Sandbox, sandbox};
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn show_log_of_exact_upstream_path(sandbox: Sandbox) {
    sandbox
        .run(&["show-log", "lib/a.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modify a"))
        .stdout(predicate::str::contains("create files"))
        .stdout(predicate::str::contains("modify b").not());
}

#[rstest]
fn show_log_of_chosen_suggestion(sandbox: Sandbox) {
    sandbox
        .run(&["show-log", "B.py"])
        .write_stdin("0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("  0 lib/b.py"))
        .stdout(predicate::str::contains("modify b"));
}

#[rstest]
fn show_log_hides_excluded_commits(sandbox: Sandbox) {
    sandbox.exclude(&[sandbox.short(2)]);

    sandbox
        .run(&["show-log", "lib/a.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create files"))
        .stdout(predicate::str::contains("modify a").not());
}
