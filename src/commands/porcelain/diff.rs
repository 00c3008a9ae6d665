use crate::areas::tracker::Tracker;
use crate::artifacts::history::entry::RevisionRange;
use crate::artifacts::provenance::record::RecordedHash;
use crate::error::TrackError;
use std::path::Path;

impl Tracker {
    /// Upstream changes since `file` was last validated
    ///
    /// Shows the merged history between the recorded and the resolved commit
    /// and, when they differ, offers to validate the file right away. A
    /// record whose upstream file disappeared is re-pointed first.
    pub fn diff(&self, file: &Path, initials: Option<&str>) -> anyhow::Result<()> {
        let path = self.workspace().locate(file)?;

        let mut record = self
            .workspace()
            .read_record(&path)?
            .ok_or_else(|| TrackError::NoRecord(file.to_path_buf()))?;
        if !record.is_tracked() {
            return Err(TrackError::NotTracked(path).into());
        }

        let resolver = self.resolver()?;
        if resolver.canonical_hash(&record)?.is_none() {
            record = self
                .replace_sources(&record)?
                .ok_or_else(|| TrackError::Unresolvable(path.clone()))?;
        }

        let state = resolver.resolve(&record)?;
        let resolved = state
            .resolved_hash()
            .ok_or_else(|| TrackError::Unresolvable(path.clone()))?;
        // without a recorded commit the whole history up to now is shown
        let range = record
            .recorded_hash()
            .and_then(RecordedHash::commit)
            .map(|recorded| RevisionRange::new(recorded.clone(), resolved.clone()));
        tracing::debug!(file = %path.display(), range = ?range, "diffing");

        let sequence = self
            .merger()?
            .render(record.original_paths(), range.as_ref())?;
        self.display_history(&sequence)?;

        if !state.is_current() {
            writeln!(self.writer())?;
            if self.confirm("Validate file? [y/n]")? {
                self.set_valid(&path, &[], initials)?;
            }
        }

        Ok(())
    }
}
