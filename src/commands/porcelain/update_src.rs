use crate::areas::tracker::Tracker;
use crate::artifacts::provenance::record::ProvenanceRecord;
use crate::error::TrackError;
use std::path::Path;

impl Tracker {
    /// Re-point the record of `file` when its upstream file is gone
    pub fn update_src(&self, file: &Path) -> anyhow::Result<()> {
        let path = self.workspace().locate(file)?;

        let record = match self.workspace().read_record(&path)? {
            Some(record) if record.is_tracked() => record,
            _ => {
                writeln!(
                    self.writer(),
                    "{} not validated, no source to update",
                    path.display()
                )?;
                return Ok(());
            }
        };

        if self.resolver()?.canonical_hash(&record)?.is_some() {
            writeln!(self.writer(), "Update not required for {}", path.display())?;
            return Ok(());
        }

        self.replace_sources(&record)?;
        Ok(())
    }

    /// Ask for new original paths and rewrite the record with them
    ///
    /// # Returns
    ///
    /// The rewritten record, or `None` when no replacement was chosen.
    pub fn replace_sources(
        &self,
        record: &ProvenanceRecord,
    ) -> anyhow::Result<Option<ProvenanceRecord>> {
        let validation = record
            .validation()
            .ok_or_else(|| TrackError::NotTracked(record.tracked_path().to_path_buf()))?;

        writeln!(
            self.writer(),
            "{} no longer exists, choose another?",
            record.original_paths().join(" ")
        )?;

        let relative = self.workspace().relative_path(record.tracked_path());
        let Some(original_paths) = self.choose_suggestion(&relative)? else {
            return Ok(None);
        };

        let updated =
            record.with_validation(validation.clone().with_original_paths(original_paths)?);
        self.workspace()
            .write_record(record.tracked_path(), &updated)?;

        Ok(Some(updated))
    }
}
