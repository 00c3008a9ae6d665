mod common;

use common::command::{Sandbox, sandbox};
use common::file::{FileSpec, read_file, tracked_file, write_file};
use predicates::prelude::*;
use rstest::rstest;

fn record_regex(initials: &str, hash: &str, paths: &str) -> String {
    format!(
        r"^# validated: \d{{4}}-\d{{2}}-\d{{2}} {initials} {hash} {}\nimport os\n$",
        regex_escape(paths)
    )
}

fn regex_escape(text: &str) -> String {
    text.replace('.', r"\.")
}

#[rstest]
fn set_valid_records_current_upstream_commit(
    sandbox: Sandbox,
) -> Result<(), Box<dyn std::error::Error>> {
    write_file(FileSpec::new(
        sandbox.downstream("pkg/a.py"),
        "import os\n".to_string(),
    ));

    sandbox
        .run(&["set-valid", "pkg/a.py", "./lib/a.py", "--initials", "DS"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pkg/a.py"))
        .stdout(predicate::str::contains(format!(
            "DS {} lib/a.py",
            sandbox.short(2)
        )));

    let content = read_file(sandbox.downstream("pkg/a.py"));
    assert!(
        predicate::str::is_match(record_regex("DS", &sandbox.short(2), "lib/a.py"))?
            .eval(&content),
        "{content}"
    );

    Ok(())
}

#[rstest]
fn set_valid_reuses_recorded_original_paths(
    sandbox: Sandbox,
) -> Result<(), Box<dyn std::error::Error>> {
    write_file(tracked_file(
        sandbox.downstream("merged.py"),
        &format!(
            "# validated: 2015-06-01 XX {} lib/a.py lib/b.py",
            sandbox.short(1)
        ),
    ));

    sandbox
        .run(&["set-valid", "merged.py", "--initials", "AB"])
        .assert()
        .success();

    let content = read_file(sandbox.downstream("merged.py"));
    assert!(
        predicate::str::is_match(record_regex("AB", &sandbox.short(3), "lib/a.py lib/b.py"))?
            .eval(&content),
        "{content}"
    );

    Ok(())
}

#[rstest]
fn set_valid_offers_suggestions(sandbox: Sandbox) -> Result<(), Box<dyn std::error::Error>> {
    write_file(FileSpec::new(
        sandbox.downstream("pkg/B.py"),
        "import os\n".to_string(),
    ));

    sandbox
        .run(&["set-valid", "pkg/B.py", "--initials", "DS"])
        .write_stdin("0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Suggestions:\n  0 lib/b.py\n"))
        .stdout(predicate::str::contains("Use? [0-0,n] (multi via comma)"));

    let content = read_file(sandbox.downstream("pkg/B.py"));
    assert!(
        predicate::str::is_match(record_regex("DS", &sandbox.short(3), "lib/b.py"))?
            .eval(&content),
        "{content}"
    );

    Ok(())
}

#[rstest]
fn set_valid_without_original_paths_fails(sandbox: Sandbox) {
    write_file(FileSpec::new(
        sandbox.downstream("b.py"),
        "import os\n".to_string(),
    ));

    sandbox
        .run(&["set-valid", "b.py", "--initials", "DS"])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Must specify upstream filename(s)"));

    assert_eq!(read_file(sandbox.downstream("b.py")), "import os\n");
}

#[rstest]
fn set_valid_takes_initials_from_git_config(sandbox: Sandbox) {
    write_file(FileSpec::new(
        sandbox.downstream("a.py"),
        "import os\n".to_string(),
    ));
    let config = sandbox.root().join("gitconfig");
    write_file(FileSpec::new(
        config.clone(),
        "[user]\n\tname = Dustin Spicuzza\n".to_string(),
    ));

    sandbox
        .run(&["set-valid", "a.py", "lib/a.py"])
        .env("GIT_CONFIG_GLOBAL", &config)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("DS {}", sandbox.short(2))));
}

#[rstest]
fn set_valid_without_initials_fails(sandbox: Sandbox) {
    write_file(FileSpec::new(
        sandbox.downstream("a.py"),
        "import os\n".to_string(),
    ));
    let config = sandbox.root().join("gitconfig");
    write_file(FileSpec::new(config.clone(), String::new()));

    sandbox
        .run(&["set-valid", "a.py", "lib/a.py"])
        .env("GIT_CONFIG_GLOBAL", &config)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Specify --initials or execute 'git config user.name Something'",
        ));
}

#[rstest]
fn set_valid_missing_upstream_file_fails(sandbox: Sandbox) {
    write_file(FileSpec::new(
        sandbox.downstream("a.py"),
        "import os\n".to_string(),
    ));

    sandbox
        .run(&["set-valid", "a.py", "lib/gone.py", "--initials", "DS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not resolve an upstream commit"));
}

#[rstest]
fn set_notrack_marks_file(sandbox: Sandbox) {
    write_file(tracked_file(
        sandbox.downstream("a.py"),
        &format!("# validated: 2015-06-01 DS {} lib/a.py", sandbox.short(1)),
    ));

    sandbox
        .run(&["set-notrack", "a.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# notrack"));

    assert_eq!(
        read_file(sandbox.downstream("a.py")),
        "# notrack\nimport os\n"
    );
    sandbox
        .run(&["show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK : a.py"));
}
