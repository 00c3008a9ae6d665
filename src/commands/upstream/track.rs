use crate::areas::tracker::Tracker;
use crate::artifacts::history::provider::HistoryProvider;
use crate::artifacts::objects::commit_id::CommitId;

impl Tracker {
    /// Pin the commit the upstream tree is currently at
    pub fn upstream_track(&mut self) -> anyhow::Result<CommitId> {
        let head = self.history().current_head()?;

        self.config_mut().set_upstream_commit(head.clone());
        self.config().save()?;

        writeln!(self.writer(), "Upstream commit changed to {head}")?;
        Ok(head)
    }
}
