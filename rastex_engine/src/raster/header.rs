/// SIF raster header
///
/// The header is 6 bytes. Fields are positional little-endian `u32`s at
/// byte offsets 0x02 (width), 0x04 (height) and 0x06 (data offset), so
/// width and height overlap and the data offset starts at the header's end.
///
/// Offsets are kept as-is for compatibility with existing files. Bytes a
/// field would take from beyond the 6-byte header read as zero; the stream
/// is never consumed past the header. As a result `height` only carries
/// bytes 4..6 and `data_offset` is always 0.

use std::io::{ErrorKind, Read};
use crate::error::{Error, Result};

/// Header size in bytes
pub const HEADER_SIZE: usize = 6;

/// Byte offset of the width field
pub const WIDTH_OFFSET: usize = 0x02;
/// Byte offset of the height field
pub const HEIGHT_OFFSET: usize = 0x04;
/// Byte offset of the data offset field
pub const DATA_OFFSET_OFFSET: usize = 0x06;

/// Decoded raster header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterHeader {
    /// Bytes 0..2, not interpreted
    pub reserved: [u8; 2],
    /// Little-endian u32 at 0x02
    pub width: u32,
    /// Little-endian u32 at 0x04 (overlaps width)
    pub height: u32,
    /// Little-endian u32 at 0x06 (entirely past the header, so 0)
    pub data_offset: u32,
    /// The header bytes as read
    pub raw: [u8; HEADER_SIZE],
}

impl RasterHeader {
    /// Decode a header from its 6 raw bytes
    pub fn from_bytes(raw: [u8; HEADER_SIZE]) -> Self {
        Self {
            reserved: [raw[0], raw[1]],
            width: read_u32_le(&raw, WIDTH_OFFSET),
            height: read_u32_le(&raw, HEIGHT_OFFSET),
            data_offset: read_u32_le(&raw, DATA_OFFSET_OFFSET),
            raw,
        }
    }
}

/// Read a little-endian u32 at `offset`, treating bytes past the end as zero
fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    for (i, byte) in word.iter_mut().enumerate() {
        if let Some(value) = bytes.get(offset + i) {
            *byte = *value;
        }
    }
    u32::from_le_bytes(word)
}

/// Read exactly [`HEADER_SIZE`] bytes from `reader` and decode them
///
/// # Errors
///
/// - `Error::TruncatedHeader` if the stream ends before 6 bytes
/// - `Error::Io` on any other read failure
pub fn parse_header<R: Read>(reader: &mut R) -> Result<RasterHeader> {
    let mut raw = [0u8; HEADER_SIZE];
    let mut filled = 0;

    while filled < HEADER_SIZE {
        match reader.read(&mut raw[filled..]) {
            Ok(0) => {
                return Err(Error::TruncatedHeader { expected: HEADER_SIZE, actual: filled });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(RasterHeader::from_bytes(raw))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "header_tests.rs"]
mod tests;
