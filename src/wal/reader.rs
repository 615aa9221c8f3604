//! WAL Reader
//!
//! Replays records from a WAL file in write order, one page at a time.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::WalConfig;
use crate::error::Result;

use super::page::{Fill, Page};

/// Counters describing what a reader has consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Records returned to the caller
    pub records_read: u64,

    /// Full pages loaded from the file
    pub pages_read: u64,
}

/// Forward-only reader over a WAL file
///
/// Must be opened with the page size and max record size the writer used.
pub struct WalReader {
    path: PathBuf,
    file: File,
    page: Page,
    config: WalConfig,
    exhausted: bool,
    stats: ReaderStats,
}

impl WalReader {
    /// Open a WAL file for reading and load its first page.
    ///
    /// An empty file opens fine and yields no records.
    pub fn open(path: impl AsRef<Path>, config: &WalConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        let file = File::open(path)?;

        let mut reader = Self {
            path: path.to_path_buf(),
            file,
            page: Page::new(config.page_size),
            config: *config,
            exhausted: false,
            stats: ReaderStats::default(),
        };
        reader.exhausted = !reader.load_page()?;

        debug!(
            path = %reader.path.display(),
            page_size = config.page_size,
            max_record_size = config.max_record_size,
            empty = reader.exhausted,
            "opened WAL for reading"
        );

        Ok(reader)
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` at the end of the log. A checksum mismatch leaves
    /// the reader on the damaged record, so every later call fails the same
    /// way.
    pub fn next_record(&mut self) -> Result<Option<Bytes>> {
        if self.exhausted {
            return Ok(None);
        }

        // Pages flushed before they filled up end in zero padding.
        while self.page.needs_new_page(self.config.max_frame_size()) || self.page.at_padding() {
            if !self.load_page()? {
                self.exhausted = true;
                debug!(records = self.stats.records_read, "reached end of WAL");
                return Ok(None);
            }
        }

        match self.page.decode(self.config.max_record_size) {
            Ok(record) => {
                self.stats.records_read += 1;
                Ok(Some(record))
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    page = self.stats.pages_read,
                    error = %e,
                    "failed to decode WAL record"
                );
                Err(e)
            }
        }
    }

    /// Iterate over the remaining records
    pub fn records(self) -> Records {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Release the file.
    pub fn close(self) -> Result<()> {
        debug!(path = %self.path.display(), stats = ?self.stats, "closed WAL reader");
        Ok(())
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    pub fn config(&self) -> &WalConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the next full page. `Ok(false)` means end of file.
    fn load_page(&mut self) -> Result<bool> {
        match self.page.fill_from(&mut self.file) {
            Ok(Fill::Filled) => {
                self.stats.pages_read += 1;
                Ok(true)
            }
            Ok(Fill::Empty) => Ok(false),
            Err(e) => {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    warn!(
                        path = %self.path.display(),
                        pages = self.stats.pages_read,
                        "WAL ends inside a page"
                    );
                }
                Err(e.into())
            }
        }
    }
}

/// Iterator over WAL records
///
/// Yields every record in write order and stops after the end of the log
/// or the first error.
pub struct Records {
    reader: WalReader,
    done: bool,
}

impl Records {
    /// Give back the underlying reader
    pub fn into_inner(self) -> WalReader {
        self.reader
    }
}

impl Iterator for Records {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
