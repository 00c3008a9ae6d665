//! Core utilities and shared types

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// Wrapper that implements `Write` for the minus pager
///
/// History output from `git` is pushed into the pager as it arrives and shown
/// once complete:
///
/// ```ignore
/// let pager = Pager::new();
/// let mut writer = PagerWriter::new(pager.clone());
/// writer.write_all(b"commit ...")?;
/// page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pager
            .push_str(String::from_utf8_lossy(buf))
            .map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
