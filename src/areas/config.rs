//! `.gittrack` repository configuration
//!
//! ```ini
//! [git-source-track]
//! upstream_root = ../upstream
//! validation_root = src
//! upstream_commit = 0123456789abcdef0123456789abcdef01234567
//! exclude_commits_file = exclude.txt
//! tracked_extensions = py
//! ```
//!
//! Paths are relative to the directory holding the configuration file.

use crate::areas::upstream;
use crate::artifacts::objects::commit_id::CommitId;
use crate::error::TrackError;
use anyhow::Context;
use ini::Ini;
use std::path::{Component, Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".gittrack";
pub const CONFIG_SECTION: &str = "git-source-track";

const UPSTREAM_ROOT: &str = "upstream_root";
const LEGACY_UPSTREAM_ROOT: &str = "original_root";
const VALIDATION_ROOT: &str = "validation_root";
const UPSTREAM_COMMIT: &str = "upstream_commit";
const EXCLUDE_COMMITS_FILE: &str = "exclude_commits_file";
const TRACKED_EXTENSIONS: &str = "tracked_extensions";
const DEFAULT_TRACKED_EXTENSION: &str = "py";

#[derive(Debug, Clone)]
pub struct RepoConfig {
    path: PathBuf,
    upstream_root: PathBuf,
    validation_root: PathBuf,
    upstream_commit: Option<CommitId>,
    exclude_commits_file: Option<PathBuf>,
    tracked_extensions: Vec<String>,
}

impl RepoConfig {
    /// Look for `.gittrack` from `start` upwards
    ///
    /// The search stops at the top level of the enclosing git work tree, or at
    /// the filesystem root outside of one.
    pub fn find(start: &Path) -> anyhow::Result<PathBuf> {
        let start = std::path::absolute(start)?;
        let toplevel = upstream::show_toplevel(&start);

        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "found configuration");
                return Ok(candidate);
            }

            if toplevel.as_deref() == Some(dir) {
                break;
            }
        }

        Err(TrackError::ConfigNotFound(start.join(CONFIG_FILE_NAME)).into())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            return Err(TrackError::ConfigNotFound(path.to_path_buf()).into());
        }

        let config_error = |reason: String| TrackError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let ini = Ini::load_from_file(path).map_err(|e| config_error(e.to_string()))?;
        let section = ini
            .section(Some(CONFIG_SECTION))
            .ok_or_else(|| config_error(format!("No section: '{CONFIG_SECTION}'")))?;

        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let base = std::path::absolute(base)?;
        let resolve = |value: &str| normalize_path(&base.join(value));

        let upstream_root = section
            .get(LEGACY_UPSTREAM_ROOT)
            .or_else(|| section.get(UPSTREAM_ROOT))
            .ok_or_else(|| {
                config_error(format!(
                    "No option '{UPSTREAM_ROOT}' in section: '{CONFIG_SECTION}'"
                ))
            })?;
        let validation_root = section.get(VALIDATION_ROOT).ok_or_else(|| {
            config_error(format!(
                "No option '{VALIDATION_ROOT}' in section: '{CONFIG_SECTION}'"
            ))
        })?;

        let upstream_commit = match section.get(UPSTREAM_COMMIT).map(str::trim) {
            Some(commit) if !commit.is_empty() => Some(
                CommitId::try_parse(commit)
                    .map_err(|e| config_error(format!("{UPSTREAM_COMMIT}: {e}")))?,
            ),
            _ => None,
        };

        let tracked_extensions = section
            .get(TRACKED_EXTENSIONS)
            .map(parse_extensions)
            .filter(|extensions| !extensions.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_TRACKED_EXTENSION.to_string()]);

        Ok(Self {
            path: path.to_path_buf(),
            upstream_root: resolve(upstream_root),
            validation_root: resolve(validation_root),
            upstream_commit,
            exclude_commits_file: section.get(EXCLUDE_COMMITS_FILE).map(resolve),
            tracked_extensions,
        })
    }

    /// Write `upstream_commit` back, dropping the legacy root key
    pub fn save(&self) -> anyhow::Result<()> {
        let mut ini = Ini::load_from_file(&self.path)
            .with_context(|| format!("failed to reload {}", self.path.display()))?;

        if let Some(legacy) = ini.delete_from(Some(CONFIG_SECTION), LEGACY_UPSTREAM_ROOT) {
            ini.with_section(Some(CONFIG_SECTION))
                .set(UPSTREAM_ROOT, legacy);
        }

        let commit = self
            .upstream_commit
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        ini.with_section(Some(CONFIG_SECTION))
            .set(UPSTREAM_COMMIT, commit);

        ini.write_to_file(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    pub fn set_upstream_commit(&mut self, commit: CommitId) {
        self.upstream_commit = Some(commit);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn upstream_root(&self) -> &Path {
        &self.upstream_root
    }

    pub fn validation_root(&self) -> &Path {
        &self.validation_root
    }

    pub fn upstream_commit(&self) -> Option<&CommitId> {
        self.upstream_commit.as_ref()
    }

    pub fn exclude_commits_file(&self) -> Option<&Path> {
        self.exclude_commits_file.as_deref()
    }

    pub fn tracked_extensions(&self) -> &[String] {
        &self.tracked_extensions
    }
}

fn parse_extensions(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|extension| extension.trim_start_matches('.'))
        .filter(|extension| !extension.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lexical normalization, no filesystem access
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other),
        }
    }

    normalized
}
