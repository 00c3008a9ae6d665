use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::{Path, PathBuf};

pub const CONFIG: &str = "[git-source-track]\n\
    upstream_root = up\n\
    validation_root = down\n\
    exclude_commits_file = exclude.txt\n";

/// Upstream repository next to a validation tree, configured by `.gittrack`
///
/// Upstream history (commit time, message, change):
///
/// 1. 2023-01-01 10:00 "create files": lib/a.py, lib/b.py
/// 2. 2023-01-01 11:00 "modify a": lib/a.py
/// 3. 2023-01-01 12:00 "modify b": lib/b.py
#[derive(new)]
pub struct Sandbox {
    pub dir: TempDir,
    pub commits: Vec<String>,
}

impl Sandbox {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn upstream(&self) -> PathBuf {
        self.dir.path().join("up")
    }

    pub fn downstream(&self, file: &str) -> PathBuf {
        self.dir.path().join("down").join(file)
    }

    /// Abbreviated id of the n-th commit (1-based), as stored in records
    pub fn short(&self, n: usize) -> String {
        self.commits[n - 1][..12].to_string()
    }

    pub fn full(&self, n: usize) -> String {
        self.commits[n - 1].clone()
    }

    pub fn write_config(&self, content: &str) {
        write_file(FileSpec::new(
            self.dir.path().join(".gittrack"),
            content.to_string(),
        ));
    }

    pub fn exclude(&self, commits: &[String]) {
        let lines = commits
            .iter()
            .map(|commit| format!("{commit} noise\n"))
            .collect::<String>();
        write_file(FileSpec::new(self.dir.path().join("exclude.txt"), lines));
    }

    pub fn run(&self, args: &[&str]) -> Command {
        run_tracker_command(self.root(), args)
    }
}

#[fixture]
pub fn sandbox() -> Sandbox {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let upstream = dir.path().join("up");
    std::fs::create_dir_all(&upstream).expect("Failed to create upstream dir");
    std::fs::create_dir_all(dir.path().join("down")).expect("Failed to create downstream dir");

    run_git_command(&upstream, &["init", "-q"]).assert().success();

    write_file(FileSpec::new(upstream.join("lib/a.py"), "one\n".to_string()));
    write_file(FileSpec::new(upstream.join("lib/b.py"), "b1\n".to_string()));
    let first = git_commit_with_timestamp(&upstream, "create files", "2023-01-01 10:00:00 +0000");

    write_file(FileSpec::new(
        upstream.join("lib/a.py"),
        "one\ntwo\n".to_string(),
    ));
    let second = git_commit_with_timestamp(&upstream, "modify a", "2023-01-01 11:00:00 +0000");

    write_file(FileSpec::new(
        upstream.join("lib/b.py"),
        "b1\nb2\n".to_string(),
    ));
    let third = git_commit_with_timestamp(&upstream, "modify b", "2023-01-01 12:00:00 +0000");

    let sandbox = Sandbox::new(dir, vec![first, second, third]);
    sandbox.write_config(CONFIG);
    sandbox
}

pub fn run_tracker_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd =
        Command::cargo_bin("git-source-track").expect("Failed to find git-source-track binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let author = generate_random_author();

    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", &author.name),
        ("GIT_AUTHOR_EMAIL", &author.email),
        ("GIT_COMMITTER_NAME", &author.name),
        ("GIT_COMMITTER_EMAIL", &author.email),
    ]);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Commit everything in `dir` at a fixed time and return the new head
pub fn git_commit_with_timestamp(dir: &Path, message: &str, timestamp: &str) -> String {
    run_git_command(dir, &["add", "."]).assert().success();

    let mut cmd = run_git_command(dir, &["commit", "-q", "--no-gpg-sign", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_DATE", timestamp), // %Y-%m-%d %H:%M:%S %z
        ("GIT_COMMITTER_DATE", timestamp),
    ]);
    cmd.assert().success();

    get_head_commit_sha(dir)
}

pub fn get_head_commit_sha(dir: &Path) -> String {
    let output = run_git_command(dir, &["rev-parse", "HEAD"])
        .output()
        .expect("Failed to run git rev-parse");
    String::from_utf8(output.stdout)
        .expect("Invalid UTF-8 in git output")
        .trim()
        .to_string()
}

#[derive(Debug, Clone, new)]
struct RandomAuthor {
    name: String,
    email: String,
}

fn generate_random_author() -> RandomAuthor {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    let name = Name().fake::<String>().replace(" ", "_");
    let email = FreeEmail().fake::<String>();
    RandomAuthor::new(name, email)
}
