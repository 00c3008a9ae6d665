use crate::areas::config::RepoConfig;
use crate::areas::upstream::{self, GitHistory};
use crate::areas::workspace::Workspace;
use crate::artifacts::core::PagerWriter;
use crate::artifacts::history::exclusion::ExclusionSet;
use crate::artifacts::history::merger::{DisplaySequence, HistoryMerger};
use crate::artifacts::history::provider::HistoryProvider;
use crate::artifacts::provenance::resolver::ProvenanceResolver;
use crate::error::TrackError;
use minus::Pager;
use std::cell::{OnceCell, RefCell, RefMut};
use std::io::{BufRead, Write};
use std::path::Path;

pub struct Tracker {
    config: RepoConfig,
    history: GitHistory,
    workspace: Workspace,
    exclusions: OnceCell<ExclusionSet>,
    writer: RefCell<Box<dyn Write>>,
    reader: RefCell<Box<dyn BufRead>>,
    paging: bool,
}

impl Tracker {
    pub fn new(config: RepoConfig, writer: Box<dyn Write>, reader: Box<dyn BufRead>) -> Self {
        let history = GitHistory::new(config.upstream_root().to_path_buf());
        let workspace = Workspace::new(
            config.validation_root().into(),
            config.upstream_root().into(),
            config.tracked_extensions().to_vec(),
        );

        Tracker {
            config,
            history,
            workspace,
            exclusions: OnceCell::new(),
            writer: RefCell::new(writer),
            reader: RefCell::new(reader),
            paging: false,
        }
    }

    /// Load the configuration at `config_path`, or the one found from `cwd`
    pub fn open(
        config_path: Option<&Path>,
        cwd: &Path,
        writer: Box<dyn Write>,
        reader: Box<dyn BufRead>,
    ) -> anyhow::Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => RepoConfig::find(cwd)?,
        };

        Ok(Self::new(RepoConfig::load(&config_path)?, writer, reader))
    }

    /// Page history output instead of writing it to the writer
    pub fn with_paging(mut self, paging: bool) -> Self {
        self.paging = paging;
        self
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RepoConfig {
        &mut self.config
    }

    pub fn history(&self) -> &GitHistory {
        &self.history
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    /// Excluded commits, read once per run
    pub fn exclusions(&self) -> anyhow::Result<&ExclusionSet> {
        if let Some(exclusions) = self.exclusions.get() {
            return Ok(exclusions);
        }

        let loaded = match self.config.exclude_commits_file() {
            Some(path) => ExclusionSet::load(path)?,
            None => ExclusionSet::default(),
        };

        Ok(self.exclusions.get_or_init(|| loaded))
    }

    pub fn resolver(&self) -> anyhow::Result<ProvenanceResolver<'_, GitHistory>> {
        Ok(ProvenanceResolver::new(&self.history, self.exclusions()?))
    }

    pub fn merger(&self) -> anyhow::Result<HistoryMerger<'_, GitHistory>> {
        Ok(HistoryMerger::new(&self.history, self.exclusions()?))
    }

    /// Check the upstream tree before running a command
    ///
    /// The tree must exist. With `verify_pin`, its head must also match the
    /// configured `upstream_commit` when one is set.
    pub fn check_upstream(&self, verify_pin: bool) -> anyhow::Result<()> {
        let upstream_root = self.config.upstream_root();
        if !upstream_root.exists() {
            return Err(TrackError::UpstreamMissing(upstream_root.to_path_buf()).into());
        }

        let Some(pinned) = self.config.upstream_commit() else {
            tracing::warn!("no upstream_commit option set");
            return Ok(());
        };

        if verify_pin {
            let head = self.history.current_head()?;
            if !head.matches(pinned) {
                return Err(TrackError::UpstreamMismatch {
                    head: head.to_string(),
                    pinned: pinned.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Ask a question and return the trimmed answer, `None` at end of input
    pub fn prompt(&self, question: &str) -> anyhow::Result<Option<String>> {
        {
            let mut writer = self.writer();
            write!(writer, "{question}")?;
            writer.flush()?;
        }

        let mut answer = String::new();
        if self.reader.borrow_mut().read_line(&mut answer)? == 0 {
            writeln!(self.writer())?;
            return Ok(None);
        }

        Ok(Some(answer.trim().to_string()))
    }

    pub fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        Ok(self
            .prompt(question)?
            .is_some_and(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes")))
    }

    /// Offer the upstream files matching `file` and let the user pick some
    ///
    /// # Returns
    ///
    /// The chosen upstream paths sorted, or `None` when there is nothing to
    /// offer or the user declines.
    pub fn choose_suggestion(&self, file: &Path) -> anyhow::Result<Option<Vec<String>>> {
        let suggestions = self.workspace.suggestions(file)?;
        if suggestions.is_empty() {
            return Ok(None);
        }

        {
            let mut writer = self.writer();
            writeln!(writer, "Suggestions:")?;
            for (index, suggestion) in suggestions.iter().enumerate() {
                writeln!(writer, "  {index} {suggestion}")?;
            }
            writeln!(writer, "Select one or more files (specify multiple via comma)")?;
        }

        let question = format!("Use? [0-{},n] (multi via comma) ", suggestions.len() - 1);
        let Some(answer) = self.prompt(&question)? else {
            return Ok(None);
        };
        if answer.is_empty() || answer.eq_ignore_ascii_case("n") {
            return Ok(None);
        }

        let mut chosen = answer
            .split(',')
            .map(|index| {
                index
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| suggestions.get(index).cloned())
                    .ok_or_else(|| anyhow::anyhow!("Invalid selection: {}", index.trim()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        chosen.sort();
        chosen.dedup();

        Ok(Some(chosen))
    }

    /// Show rendered history, paged when attached to a terminal
    pub fn display_history(&self, sequence: &DisplaySequence) -> anyhow::Result<()> {
        tracing::debug!(requests = sequence.len(), paging = self.paging, "displaying history");

        if self.paging {
            let pager = Pager::new();
            let mut writer = PagerWriter::new(pager.clone());
            self.history.display(sequence, &mut writer, true)?;
            minus::page_all(pager)?;
        } else {
            let mut writer = self.writer();
            self.history.display(sequence, &mut **writer, false)?;
        }

        Ok(())
    }

    /// Initials from `git config user.name`: the first letter of each word
    pub fn default_initials(&self) -> anyhow::Result<String> {
        let initials = upstream::user_name(self.workspace.validation_root())
            .map(|name| initials_of(&name))
            .unwrap_or_default();

        if initials.is_empty() {
            return Err(TrackError::MissingInitials.into());
        }

        Ok(initials)
    }
}

fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}
