use crate::artifacts::provenance::record::{ProvenanceRecord, RecordLine, is_record_line};
use crate::error::TrackError;
use anyhow::Context;
use file_guard::Lock;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [".git"];
const IGNORED_FILE_NAMES: [&str; 1] = ["__init__.py"];

/// Characters dropped when comparing file stems for suggestions
const SUGGESTION_KEY_REGEX: &str = r"[^a-z0-9]+";

/// The validation tree, plus the upstream tree it is compared against
#[derive(Debug)]
pub struct Workspace {
    validation_root: Box<Path>,
    upstream_root: Box<Path>,
    extensions: Vec<String>,
}

impl Workspace {
    pub fn new(validation_root: Box<Path>, upstream_root: Box<Path>, extensions: Vec<String>) -> Self {
        Workspace {
            validation_root,
            upstream_root,
            extensions,
        }
    }

    pub fn validation_root(&self) -> &Path {
        &self.validation_root
    }

    pub fn upstream_root(&self) -> &Path {
        &self.upstream_root
    }

    /// A file given on the command line, as-is or relative to the validation root
    pub fn locate(&self, file: &Path) -> anyhow::Result<PathBuf> {
        if file.exists() {
            return Ok(std::path::absolute(file)?);
        }

        let joined = self.validation_root.join(file);
        if joined.exists() {
            return Ok(joined);
        }

        Err(TrackError::MissingFile(joined).into())
    }

    /// Files with a tracked extension, in sorted walk order
    pub fn list_tracked_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        if !self.validation_root.is_dir() {
            anyhow::bail!(
                "The validation root is not a directory: {}",
                self.validation_root.display()
            );
        }

        Ok(WalkDir::new(&self.validation_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && self.is_tracked_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect())
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
    }

    fn is_tracked_file(&self, path: &Path) -> bool {
        let ignored_name = path
            .file_name()
            .is_some_and(|name| IGNORED_FILE_NAMES.contains(&name.to_string_lossy().as_ref()));
        let tracked_extension = path.extension().is_some_and(|extension| {
            self.extensions
                .iter()
                .any(|tracked| tracked.as_str() == extension.to_string_lossy())
        });

        tracked_extension && !ignored_name
    }

    /// Path for display, relative to the validation root when inside it
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.validation_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// The first record line of `path`, parsed
    pub fn read_record_line(&self, path: &Path) -> anyhow::Result<Option<RecordLine>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        Ok(content
            .lines()
            .find(|line| is_record_line(line))
            .and_then(RecordLine::parse))
    }

    /// The record of `path`, or `None` when the file carries no record line
    pub fn read_record(&self, path: &Path) -> anyhow::Result<Option<ProvenanceRecord>> {
        match self.read_record_line(path)? {
            Some(line) => Ok(Some(ProvenanceRecord::from_line(path.to_path_buf(), line)?)),
            None => Ok(None),
        }
    }

    /// Replace the record line of `path` in place
    ///
    /// # Locking
    ///
    /// Holds an exclusive lock on the original file while the rewritten copy
    /// is built next to it and renamed over it.
    pub fn write_record(&self, path: &Path, record: &ProvenanceRecord) -> anyhow::Result<()> {
        let line = record.line()?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let _lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)?;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let updated = replace_record_line(&content, &line);

        let dir = path
            .parent()
            .with_context(|| format!("{} has no parent directory", path.display()))?;
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(updated.as_bytes())?;
        temp.as_file()
            .set_permissions(std::fs::metadata(path)?.permissions())?;
        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        tracing::debug!(path = %path.display(), line = line.trim_end(), "record written");
        Ok(())
    }

    /// Upstream files whose normalized stem equals that of `file`
    ///
    /// Returned relative to the upstream root with `/` separators, sorted.
    pub fn suggestions(&self, file: &Path) -> anyhow::Result<Vec<String>> {
        let key = suggestion_key(file)?;

        let mut suggestions = Vec::new();
        for entry in WalkDir::new(&self.upstream_root)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            if suggestion_key(entry.path())? != key {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&self.upstream_root) {
                suggestions.push(to_posix(relative));
            }
        }

        suggestions.sort();
        Ok(suggestions)
    }
}

/// Lower-cased file stem with every non-alphanumeric run removed
pub fn suggestion_key(path: &Path) -> anyhow::Result<String> {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    Ok(regex::Regex::new(SUGGESTION_KEY_REGEX)?
        .replace_all(&stem, "")
        .into_owned())
}

fn to_posix(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// `content` with its first record line replaced by `line`
///
/// Without a record line, `line` becomes the first line.
pub fn replace_record_line(content: &str, line: &str) -> String {
    let mut replaced = false;
    let mut updated = String::with_capacity(content.len() + line.len());

    for existing in content.split_inclusive('\n') {
        if !replaced && is_record_line(existing) {
            updated.push_str(line);
            replaced = true;
        } else {
            updated.push_str(existing);
        }
    }

    if replaced {
        updated
    } else {
        format!("{line}{content}")
    }
}
