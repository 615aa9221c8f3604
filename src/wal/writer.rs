//! WAL Writer
//!
//! Packs records into an in-memory page and writes whole pages to the file.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::config::WalConfig;
use crate::error::{Result, WalError};

use super::page::Page;

/// Counters describing what a writer has done since it was opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Records accepted by `add_record`
    pub records_appended: u64,

    /// Pages written to the file
    pub pages_flushed: u64,

    /// Bytes written to the file (always a multiple of the page size)
    pub bytes_written: u64,

    /// fsync calls issued
    pub syncs: u64,
}

/// Appends records to a WAL file
///
/// Records are buffered until the current page might not hold a
/// maximum-size record, at which point the page is zero-padded and written.
/// A writer is not meant to be shared: every mutating call takes `&mut self`
/// and callers needing concurrent producers must serialize externally.
pub struct WalWriter {
    path: PathBuf,
    file: File,
    page: Page,
    config: WalConfig,
    stats: WriterStats,
}

impl WalWriter {
    /// Open or create a WAL file for appending.
    ///
    /// The config is validated before the file is touched. Existing pages
    /// are kept and new pages are written after them.
    pub fn open(path: impl AsRef<Path>, config: &WalConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let existing = file.metadata()?.len();
        if existing % config.page_size as u64 != 0 {
            return Err(WalError::Corruption(format!(
                "log length {} is not a multiple of page size {}",
                existing, config.page_size
            )));
        }
        file.seek(SeekFrom::End(0))?;

        debug!(
            path = %path.display(),
            existing_pages = existing / config.page_size as u64,
            page_size = config.page_size,
            max_record_size = config.max_record_size,
            sync = config.sync_on_flush,
            "opened WAL for writing"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            page: Page::new(config.page_size),
            config: *config,
            stats: WriterStats::default(),
        })
    }

    /// Buffer a record in the current page.
    ///
    /// Flushes first if a maximum-size record might not fit. No I/O happens
    /// otherwise.
    pub fn add_record(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_record_size {
            return Err(WalError::RecordTooLarge {
                size: payload.len(),
                limit: self.config.max_record_size,
            });
        }

        if self.page.needs_new_page(self.config.max_frame_size()) {
            self.flush()?;
        }

        let frame = self.page.append(payload);
        self.stats.records_appended += 1;
        trace!(len = payload.len(), frame, cursor = self.page.cursor(), "buffered record");

        Ok(())
    }

    /// Zero-pad the current page and write all of it to the file.
    ///
    /// With `sync_on_flush` the page is forced to stable storage before
    /// returning. Flushing an empty page writes a page of zeros.
    pub fn flush(&mut self) -> Result<()> {
        let records = self.page.records();
        self.page.pad();
        self.file.write_all(self.page.as_bytes())?;
        self.page.reset();

        self.stats.pages_flushed += 1;
        self.stats.bytes_written += self.config.page_size as u64;

        if self.config.sync_on_flush {
            self.file.sync_data()?;
            self.stats.syncs += 1;
        }

        debug!(
            records,
            pages = self.stats.pages_flushed,
            synced = self.config.sync_on_flush,
            "flushed WAL page"
        );

        Ok(())
    }

    /// Flush any buffered records, then release the file.
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        debug!(path = %self.path.display(), stats = ?self.stats, "closed WAL writer");
        Ok(())
    }

    /// Bytes buffered in the current page and not yet written
    pub fn pending_bytes(&self) -> usize {
        self.page.cursor()
    }

    pub fn stats(&self) -> WriterStats {
        self.stats
    }

    pub fn config(&self) -> &WalConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WalWriter {
    fn drop(&mut self) {
        if !self.page.is_empty() {
            warn!(
                path = %self.path.display(),
                records = self.page.records(),
                "WAL writer dropped with unflushed records"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(sync: bool) -> WalConfig {
        WalConfig::builder()
            .page_size(35)
            .max_record_size(15)
            .sync_on_flush(sync)
            .build()
    }

    #[test]
    fn test_add_record_is_buffered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.wal");

        let mut writer = WalWriter::open(&path, &config(false)).unwrap();
        writer.add_record(b"hello").unwrap();

        assert_eq!(writer.pending_bytes(), 13);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_flush_resets_cursor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.wal");

        let mut writer = WalWriter::open(&path, &config(false)).unwrap();
        writer.add_record(b"hello").unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.pending_bytes(), 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 35);
    }

    #[test]
    fn test_drop_releases_without_flushing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.wal");

        {
            let mut writer = WalWriter::open(&path, &config(false)).unwrap();
            writer.add_record(b"lost").unwrap();
        }

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
