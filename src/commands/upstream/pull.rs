use crate::areas::tracker::Tracker;

impl Tracker {
    pub fn upstream_pull(&mut self, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.history().pull(remote, branch)?;
        self.upstream_track()?;

        Ok(())
    }
}
