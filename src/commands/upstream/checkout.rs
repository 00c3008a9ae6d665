use crate::areas::tracker::Tracker;

impl Tracker {
    /// Move the upstream tree to the pinned commit
    pub fn upstream_checkout(&self) -> anyhow::Result<()> {
        let commit = self.config().upstream_commit().ok_or_else(|| {
            anyhow::anyhow!(
                "No upstream_commit option set in {}",
                self.config().path().display()
            )
        })?;

        self.history().checkout(commit)?;
        writeln!(self.writer(), "Upstream commit is now {commit}")?;

        Ok(())
    }
}
