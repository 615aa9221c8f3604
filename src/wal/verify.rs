//! WAL Verification
//!
//! Scans a WAL file without modifying it and reports what a replay would
//! find. Damaged data ends the scan and is described in the report rather
//! than returned as an error.

use std::io;
use std::path::Path;

use tracing::info;

use crate::config::WalConfig;
use crate::error::{Result, WalError};

use super::WalReader;

/// Result of a verification scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Full pages read
    pub pages: u64,

    /// Records that passed their checksum
    pub records: u64,

    /// First corruption found, if any
    pub corruption: Option<String>,

    /// The file ends partway through a page
    pub truncated_tail: bool,
}

impl VerifyReport {
    /// No corruption and no partial trailing page
    pub fn is_clean(&self) -> bool {
        self.corruption.is_none() && !self.truncated_tail
    }
}

/// Scan the log at `path` and report its contents.
///
/// Only configuration and I/O failures other than a truncated tail are
/// returned as errors.
pub fn verify(path: impl AsRef<Path>, config: &WalConfig) -> Result<VerifyReport> {
    let path = path.as_ref();
    let mut report = VerifyReport::default();

    let mut reader = match WalReader::open(path, config) {
        Ok(reader) => reader,
        Err(WalError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
            report.truncated_tail = true;
            return Ok(report);
        }
        Err(e) => return Err(e),
    };

    loop {
        match reader.next_record() {
            Ok(Some(_)) => report.records += 1,
            Ok(None) => break,
            Err(WalError::Corruption(reason)) => {
                report.corruption = Some(reason);
                break;
            }
            Err(WalError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                report.truncated_tail = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    report.pages = reader.stats().pages_read;

    info!(
        path = %path.display(),
        pages = report.pages,
        records = report.records,
        clean = report.is_clean(),
        "verified WAL"
    );

    Ok(report)
}
