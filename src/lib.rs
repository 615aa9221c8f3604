//! # pagewal
//!
//! A minimal write-ahead log with:
//! - Fixed-size pages as the unit of both write and read I/O
//! - Length-prefixed records with CRC32 checksums
//! - Optional fsync on every page flush
//! - A forward-only iterator that replays records in write order
//!
//! ## Architecture Overview
//!
//! ```text
//!   caller                                   caller
//!     │ add_record                             ▲ next_record
//!     ▼                                        │
//! ┌─────────────┐   flush (pad, write,   ┌─────────────┐
//! │  WalWriter  │──── optional fsync ───▶│   WAL file  │
//! │ (one page)  │                        │ (N × pages) │
//! └─────────────┘                        └──────┬──────┘
//!                                               │ load page
//!                                        ┌──────▼──────┐
//!                                        │  WalReader  │
//!                                        │ (one page)  │
//!                                        └─────────────┘
//! ```
//!
//! Writer and reader share nothing but the file and must agree on
//! `page_size` and `max_record_size`. Neither is safe for concurrent use;
//! callers serialize access externally.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagewal::{WalConfig, WalReader, WalWriter};
//!
//! # fn main() -> pagewal::Result<()> {
//! let config = WalConfig::builder().page_size(4096).max_record_size(512).build();
//!
//! let mut writer = WalWriter::open("app.wal", &config)?;
//! writer.add_record(b"hello")?;
//! writer.close()?;
//!
//! let mut reader = WalReader::open("app.wal", &config)?;
//! while let Some(record) = reader.next_record()? {
//!     println!("{:?}", record);
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod wal;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WalError, Result};
pub use config::{WalConfig, WalConfigBuilder};
pub use wal::{verify, VerifyReport, WalReader, WalWriter};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pagewal
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
