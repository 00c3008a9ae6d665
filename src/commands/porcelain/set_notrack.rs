use crate::areas::tracker::Tracker;
use crate::artifacts::provenance::record::ProvenanceRecord;
use std::path::Path;

impl Tracker {
    pub fn set_notrack(&self, file: &Path) -> anyhow::Result<()> {
        let path = self.workspace().locate(file)?;
        let record = ProvenanceRecord::not_tracked(path.clone());

        self.workspace().write_record(&path, &record)?;

        writeln!(self.writer(), "{}", path.display())?;
        writeln!(self.writer(), "{}", record.line()?)?;

        Ok(())
    }
}
