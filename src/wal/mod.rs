//! Write-Ahead Log (WAL) Module
//!
//! Provides durability through append-only, page-aligned logging.
//!
//! ## Responsibilities
//! - Buffer records in a fixed-size page and write whole pages
//! - Optional fsync on every page flush
//! - CRC32 checksums for corruption detection
//! - Forward-only replay in write order
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Page 0 (page_size bytes)                     │
//! │ ┌─────────┬──────────────┬─────────┐         │
//! │ │ Len (4) │ Payload (Len)│ CRC (4) │ ...     │
//! │ └─────────┴──────────────┴─────────┘         │
//! │ zero padding                                 │
//! ├──────────────────────────────────────────────┤
//! │ Page 1 (page_size bytes)                     │
//! │ ...                                          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Integers are little-endian. The CRC covers the length field and the
//! payload. A new page is started whenever `cursor + max_record_size + 8`
//! would pass the end of the page, so no record straddles two pages. A page
//! flushed early (explicit flush, close) ends in zeros; readers move to the
//! next page when the rest of the current one is zero, which no encoded
//! record can be.

mod page;
mod reader;
mod verify;
mod writer;

pub use page::{frame_checksum, needs_new_page, CHECKSUM_SIZE, FRAME_OVERHEAD, LENGTH_SIZE};
pub use reader::{ReaderStats, Records, WalReader};
pub use verify::{verify, VerifyReport};
pub use writer::{WalWriter, WriterStats};
