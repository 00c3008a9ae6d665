use crate::areas::tracker::Tracker;
use crate::artifacts::provenance::record::normalize_posix;
use std::path::Path;

impl Tracker {
    /// Merged upstream history of the file(s) matching `file`
    ///
    /// A path that exists as-is under the upstream root is used directly;
    /// otherwise the user picks among suggestions.
    pub fn show_log(&self, file: &Path) -> anyhow::Result<()> {
        let exact = file.is_relative() && self.workspace().upstream_root().join(file).is_file();

        let original_paths = if exact {
            vec![normalize_posix(&file.to_string_lossy())]
        } else {
            match self.choose_suggestion(file)? {
                Some(original_paths) => original_paths,
                None => return Ok(()),
            }
        };

        let sequence = self.merger()?.render(&original_paths, None)?;
        self.display_history(&sequence)
    }
}
