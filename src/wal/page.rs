//! WAL page and record framing
//!
//! A page is a fixed-size byte arena with a cursor. Writers pack frames into
//! it and flush it whole; readers fill it whole from the file and decode
//! frames from it. Both sides decide when to move to the next page with
//! [`needs_new_page`], so a frame never straddles two pages.
//!
//! Frame: `[len: u32 LE][payload: len bytes][crc32(len bytes ++ payload): u32 LE]`

use std::io::{self, Read};

use bytes::Bytes;
use crc32fast::Hasher;

use crate::error::{Result, WalError};

/// Size of the little-endian payload length field
pub const LENGTH_SIZE: usize = 4;

/// Size of the little-endian CRC32 field
pub const CHECKSUM_SIZE: usize = 4;

/// Framing bytes added to every payload
pub const FRAME_OVERHEAD: usize = LENGTH_SIZE + CHECKSUM_SIZE;

/// Whether a worst-case frame might not fit at `cursor`.
///
/// Position-only: the writer flushes and the reader refills on exactly the
/// same condition, regardless of the size of the next record.
#[inline]
pub fn needs_new_page(cursor: usize, page_size: usize, max_frame_size: usize) -> bool {
    cursor + max_frame_size > page_size
}

/// CRC32 (IEEE) over the encoded length field followed by the payload
pub fn frame_checksum(length: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(length);
    hasher.update(payload);
    hasher.finalize()
}

/// Outcome of filling a page from a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
    /// A full page was read
    Filled,
    /// The source was already at end of file
    Empty,
}

/// Fixed-capacity page buffer with a read/write cursor
pub(crate) struct Page {
    buf: Box<[u8]>,
    cursor: usize,
    /// Frames appended since the last reset (writer side only)
    records: usize,
}

impl Page {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            buf: vec![0u8; size].into_boxed_slice(),
            cursor: 0,
            records: 0,
        }
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn records(&self) -> usize {
        self.records
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    pub(crate) fn needs_new_page(&self, max_frame_size: usize) -> bool {
        needs_new_page(self.cursor, self.buf.len(), max_frame_size)
    }

    /// Whether everything from the cursor to the end of the page is zero.
    ///
    /// No frame encodes to all zeros (an empty payload still carries a
    /// non-zero CRC), so this marks the padding of a page flushed early.
    pub(crate) fn at_padding(&self) -> bool {
        self.buf[self.cursor..].iter().all(|&b| b == 0)
    }

    /// Encode `[len][payload][crc]` at the cursor and return the frame size.
    ///
    /// The caller guarantees the frame fits.
    pub(crate) fn append(&mut self, payload: &[u8]) -> usize {
        let start = self.cursor;
        let payload_end = start + LENGTH_SIZE + payload.len();
        let frame_end = payload_end + CHECKSUM_SIZE;
        debug_assert!(frame_end <= self.buf.len());

        let length = (payload.len() as u32).to_le_bytes();
        self.buf[start..start + LENGTH_SIZE].copy_from_slice(&length);
        self.buf[start + LENGTH_SIZE..payload_end].copy_from_slice(payload);

        let crc = frame_checksum(&length, payload);
        self.buf[payload_end..frame_end].copy_from_slice(&crc.to_le_bytes());

        self.cursor = frame_end;
        self.records += 1;
        frame_end - start
    }

    /// Zero every byte from the cursor to the end of the page
    pub(crate) fn pad(&mut self) {
        self.buf[self.cursor..].fill(0);
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn reset(&mut self) {
        self.cursor = 0;
        self.records = 0;
    }

    /// Read exactly one page from `src`, retrying short reads.
    ///
    /// End of file before the first byte is `Fill::Empty`; end of file after
    /// a partial page is an `UnexpectedEof` error. The cursor is reset only
    /// when a full page was read.
    pub(crate) fn fill_from<R: Read>(&mut self, src: &mut R) -> io::Result<Fill> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match src.read(&mut self.buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(Fill::Empty),
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "truncated page: read {} of {} bytes",
                            filled,
                            self.buf.len()
                        ),
                    ))
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.cursor = 0;
        Ok(Fill::Filled)
    }

    /// Decode and verify the frame at the cursor.
    ///
    /// On success the cursor moves past the frame. On failure it stays put,
    /// so a retry reports the same error.
    pub(crate) fn decode(&mut self, max_record_size: usize) -> Result<Bytes> {
        let start = self.cursor;
        let payload_start = start + LENGTH_SIZE;
        if payload_start > self.buf.len() {
            return Err(WalError::Corruption(format!(
                "length field at page offset {} runs past the page",
                start
            )));
        }

        let mut length = [0u8; LENGTH_SIZE];
        length.copy_from_slice(&self.buf[start..payload_start]);
        let len = u32::from_le_bytes(length) as usize;
        if len > max_record_size {
            return Err(WalError::Corruption(format!(
                "record length {} at page offset {} exceeds limit {}",
                len, start, max_record_size
            )));
        }

        let payload_end = payload_start + len;
        let frame_end = payload_end + CHECKSUM_SIZE;
        if frame_end > self.buf.len() {
            return Err(WalError::Corruption(format!(
                "record at page offset {} runs past the page",
                start
            )));
        }

        let payload = &self.buf[payload_start..payload_end];
        let mut stored = [0u8; CHECKSUM_SIZE];
        stored.copy_from_slice(&self.buf[payload_end..frame_end]);
        let stored = u32::from_le_bytes(stored);
        let computed = frame_checksum(&length, payload);
        if stored != computed {
            return Err(WalError::Corruption(format!(
                "crc mismatch at page offset {}; want {:#010x}; stored {:#010x}",
                start, computed, stored
            )));
        }

        let record = Bytes::copy_from_slice(payload);
        self.cursor = frame_end;
        Ok(record)
    }
}
