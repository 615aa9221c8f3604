//! Configuration for pagewal
//!
//! Page geometry and durability settings shared by writers and readers.

use crate::error::{Result, WalError};
use crate::wal::FRAME_OVERHEAD;

/// Default page size (32 KiB)
pub const DEFAULT_PAGE_SIZE: usize = 32 * 1024;

/// Default largest payload accepted by a single append (4 KiB)
pub const DEFAULT_MAX_RECORD_SIZE: usize = 4 * 1024;

/// Log geometry and durability settings
///
/// A reader must be opened with the same `page_size` and `max_record_size`
/// as the writer that produced the file. Nothing in the file records them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalConfig {
    /// Size of every page written to and read from the file (in bytes)
    pub page_size: usize,

    /// Largest payload a caller may pass to a single append (in bytes,
    /// excluding the 4-byte length and 4-byte checksum fields)
    pub max_record_size: usize,

    /// fsync after every page flush (ignored by readers)
    pub sync_on_flush: bool,
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            sync_on_flush: true,
        }
    }
}

impl WalConfig {
    /// Create a new config builder
    pub fn builder() -> WalConfigBuilder {
        WalConfigBuilder::default()
    }

    /// Check that a maximum-size record always fits in an empty page
    pub fn validate(&self) -> Result<()> {
        let max_frame = self.max_record_size.checked_add(FRAME_OVERHEAD);
        match max_frame {
            Some(frame) if frame <= self.page_size => Ok(()),
            _ => Err(WalError::Config(format!(
                "max record size {} plus {} bytes of framing exceeds page size {}",
                self.max_record_size, FRAME_OVERHEAD, self.page_size
            ))),
        }
    }

    /// Worst-case framed size of one record
    pub fn max_frame_size(&self) -> usize {
        self.max_record_size + FRAME_OVERHEAD
    }
}

/// Builder for WalConfig
#[derive(Default)]
pub struct WalConfigBuilder {
    config: WalConfig,
}

impl WalConfigBuilder {
    /// Set the page size (in bytes)
    pub fn page_size(mut self, size: usize) -> Self {
        self.config.page_size = size;
        self
    }

    /// Set the largest payload accepted by a single append (in bytes)
    pub fn max_record_size(mut self, size: usize) -> Self {
        self.config.max_record_size = size;
        self
    }

    /// Force every flush to stable storage before it returns
    pub fn sync_on_flush(mut self, sync: bool) -> Self {
        self.config.sync_on_flush = sync;
        self
    }

    pub fn build(self) -> WalConfig {
        self.config
    }
}
