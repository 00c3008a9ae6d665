use crate::areas::tracker::Tracker;
use crate::artifacts::provenance::record::{ProvenanceRecord, Validation};
use crate::error::TrackError;
use std::path::Path;

impl Tracker {
    /// Record a review of `file` against the current upstream commit
    ///
    /// Original paths default to the file's existing record, then to an
    /// interactive choice among upstream suggestions.
    pub fn set_valid(
        &self,
        file: &Path,
        original_paths: &[String],
        initials: Option<&str>,
    ) -> anyhow::Result<ProvenanceRecord> {
        let path = self.workspace().locate(file)?;

        let initials = match initials {
            Some(initials) if !initials.trim().is_empty() => initials.trim().to_string(),
            _ => self.default_initials()?,
        };

        let mut original_paths = original_paths.to_vec();
        if original_paths.is_empty()
            && let Some(record) = self.workspace().read_record(&path)?
        {
            original_paths = record.original_paths().to_vec();
        }
        if original_paths.is_empty() {
            original_paths = self
                .choose_suggestion(&path)?
                .ok_or(TrackError::NoOriginalPaths)?;
        }

        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        let validation = Validation::new(date, initials, None, original_paths)?;
        let unvalidated = ProvenanceRecord::tracked(path.clone(), validation.clone());

        let hash = self
            .resolver()?
            .canonical_hash(&unvalidated)?
            .ok_or_else(|| TrackError::Unresolvable(path.clone()))?;
        let record = unvalidated.with_validation(validation.with_hash(hash));

        self.workspace().write_record(&path, &record)?;

        writeln!(self.writer(), "{}", path.display())?;
        writeln!(self.writer(), "{}", record.line()?)?;

        Ok(record)
    }
}
