//! Upstream history backed by the `git` binary
//!
//! Every command runs with the upstream tree as its working directory; the
//! process working directory is never changed. The upstream tree may be a
//! subdirectory of its repository, while `git log --name-only` reports paths
//! from the repository top level, so per-commit display runs from there.

use crate::artifacts::history::entry::{HistoryEntry, RevisionRange};
use crate::artifacts::history::merger::{DisplayRequest, DisplaySequence};
use crate::artifacts::history::provider::{HistoryIter, HistoryProvider};
use crate::artifacts::objects::commit_id::CommitId;
use crate::error::TrackError;
use anyhow::Context;
use std::cell::OnceCell;
use std::io::{BufRead, BufReader, Lines, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use tracing::trace;

/// `<commit time> <full hash>` header printed for each commit
const LOG_HEADER_REGEX: &str = r"^(\d+) ([0-9a-f]{40})$";

#[derive(Debug, Clone)]
pub struct GitHistory {
    root: PathBuf,
    toplevel: OnceCell<String>,
    prefix: OnceCell<String>,
}

impl GitHistory {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            toplevel: OnceCell::new(),
            prefix: OnceCell::new(),
        }
    }

    fn git(&self, args: &[&str]) -> Command {
        git_command(&self.root, args)
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<Output> {
        run(self.git(args), args)
    }

    fn cached<'a>(&self, cell: &'a OnceCell<String>, args: &[&str]) -> anyhow::Result<&'a str> {
        if let Some(value) = cell.get() {
            return Ok(value);
        }

        let output = self.run(args)?;
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(cell.get_or_init(|| value))
    }

    /// Work tree top level of the upstream repository
    fn toplevel(&self) -> anyhow::Result<&Path> {
        self.cached(&self.toplevel, &["rev-parse", "--show-toplevel"])
            .map(Path::new)
    }

    /// Upstream root relative to the top level, `/`-terminated or empty
    fn prefix(&self) -> anyhow::Result<&str> {
        self.cached(&self.prefix, &["rev-parse", "--show-prefix"])
    }

    /// Run every display request in order, copying git's output to `writer`
    pub fn display(
        &self,
        sequence: &DisplaySequence,
        writer: &mut dyn Write,
        color: bool,
    ) -> anyhow::Result<()> {
        for request in sequence.iter() {
            let dir = match request {
                DisplayRequest::FollowFile { .. } => self.root.as_path(),
                DisplayRequest::Commit { .. } => self.toplevel()?,
            };
            let args = request.git_args(color);
            let args = args.iter().map(String::as_str).collect::<Vec<_>>();
            let output = run(git_command(dir, &args), &args)?;

            writer.write_all(&output.stdout)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn checkout(&self, commit: &CommitId) -> anyhow::Result<()> {
        self.run(&["checkout", commit.as_ref()])?;
        Ok(())
    }

    pub fn pull(&self, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.run(&["pull", remote, branch])?;
        Ok(())
    }
}

impl HistoryProvider for GitHistory {
    fn contains_path(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }

    fn list_history(
        &self,
        path: &str,
        range: Option<&RevisionRange>,
    ) -> anyhow::Result<HistoryIter<'_>> {
        let range = range.map(ToString::to_string);

        let mut args = vec![
            "log",
            "--follow",
            "--name-only",
            "--pretty=tformat:%ct %H",
        ];
        if let Some(range) = range.as_deref() {
            args.push(range);
        }
        args.extend(["--", path]);

        let fallback_path = format!("{}{path}", self.prefix()?);
        Ok(Box::new(GitLogEntries::spawn(
            self.git(&args),
            &args,
            fallback_path,
        )?))
    }

    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> anyhow::Result<bool> {
        let args = [
            "merge-base",
            "--is-ancestor",
            ancestor.as_ref(),
            descendant.as_ref(),
        ];
        trace!(command = %args.join(" "), "running git");

        let output = self
            .git(&args)
            .output()
            .context("failed to run git merge-base")?;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(git_error(&args, &output).into()),
        }
    }

    fn current_head(&self) -> anyhow::Result<CommitId> {
        let output = self.run(&["rev-parse", "HEAD"])?;
        CommitId::try_parse(String::from_utf8_lossy(&output.stdout).trim())
    }
}

/// Lazily parsed `git log --name-only` output
///
/// Commits are read one at a time, so a caller that stops early never waits
/// for the rest of the history. The child is killed when dropped. Paths are
/// relative to the repository top level; `fallback_path` is the queried path
/// in that form, used for commits git lists without a file name.
struct GitLogEntries {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    header: regex::Regex,
    fallback_path: String,
    command: String,
    stderr: Option<JoinHandle<String>>,
    pending: Option<(i64, CommitId)>,
    finished: bool,
}

impl GitLogEntries {
    fn spawn(mut command: Command, args: &[&str], fallback_path: String) -> anyhow::Result<Self> {
        let command_line = args.join(" ");
        trace!(command = %command_line, "running git");

        let mut child = command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to run git {command_line}"))?;
        let stdout = child
            .stdout
            .take()
            .context("git log stdout was not captured")?;
        // drained concurrently with stdout
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buffer = String::new();
                let _ = pipe.read_to_string(&mut buffer);
                buffer
            })
        });

        Ok(Self {
            child,
            lines: BufReader::new(stdout).lines(),
            header: regex::Regex::new(LOG_HEADER_REGEX)?,
            fallback_path,
            command: command_line,
            stderr,
            pending: None,
            finished: false,
        })
    }

    fn entry(&self, (timestamp, commit): (i64, CommitId), path: Option<&str>) -> HistoryEntry {
        let path = path.unwrap_or(&self.fallback_path).to_string();
        HistoryEntry::new(timestamp, commit, path)
    }

    fn parse_header(&self, line: &str) -> anyhow::Result<Option<(i64, CommitId)>> {
        let Some(captures) = self.header.captures(line) else {
            return Ok(None);
        };

        let timestamp = captures[1]
            .parse::<i64>()
            .with_context(|| format!("invalid commit time in '{line}'"))?;
        let commit = CommitId::try_parse(&captures[2])?;

        Ok(Some((timestamp, commit)))
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.finished = true;

        let stderr = self
            .stderr
            .take()
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default();

        let status = self.child.wait()?;
        if !status.success() {
            return Err(TrackError::Git {
                command: self.command.clone(),
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl Iterator for GitLogEntries {
    type Item = anyhow::Result<HistoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    if let Some(pending) = self.pending.take() {
                        return Some(Ok(self.entry(pending, None)));
                    }
                    return self.finish().err().map(Err);
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.parse_header(line) {
                Ok(Some(header)) => {
                    if let Some(previous) = self.pending.replace(header) {
                        return Some(Ok(self.entry(previous, None)));
                    }
                }
                Ok(None) => {
                    if let Some(pending) = self.pending.take() {
                        return Some(Ok(self.entry(pending, Some(line))));
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl Drop for GitLogEntries {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn git_command(dir: &Path, args: &[&str]) -> Command {
    let mut command = Command::new("git");
    command.current_dir(dir).args(args);
    command
}

fn git_error(args: &[&str], output: &Output) -> TrackError {
    TrackError::Git {
        command: args.join(" "),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

fn run(mut command: Command, args: &[&str]) -> anyhow::Result<Output> {
    trace!(command = %args.join(" "), "running git");

    let output = command
        .output()
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        return Err(git_error(args, &output).into());
    }

    Ok(output)
}

fn query(dir: &Path, args: &[&str]) -> Option<String> {
    let output = run(git_command(dir, args), args).ok()?;
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Top level of the git work tree containing `dir`, if any
pub fn show_toplevel(dir: &Path) -> Option<PathBuf> {
    query(dir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

/// `git config user.name` as seen from `dir`
pub fn user_name(dir: &Path) -> Option<String> {
    query(dir, &["config", "user.name"])
}
