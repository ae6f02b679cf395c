/// Raster pixel loader
///
/// Reads an RGB payload sized by the caller's dimensions. The header's own
/// width/height are never used to size the read.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use crate::error::{Error, Result};
use crate::pixel::pixel_buffer::{byte_len, try_alloc, PixelBuffer, PixelFormat};
use crate::raster::header::{parse_header, RasterHeader};

/// A decoded SIF file: header plus payload
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Header as stored in the file
    pub header: RasterHeader,
    /// RGB payload sized by the requested dimensions
    pub pixels: PixelBuffer,
}

/// Read exactly `width * height * 3` bytes of RGB data from `reader`
///
/// # Errors
///
/// - `Error::InvalidPixelBuffer` if a dimension is zero
/// - `Error::AllocationFailed` if the size overflows or cannot be reserved
/// - `Error::ShortRead` if the stream ends early (the buffer is never zero-padded)
/// - `Error::Io` on any other read failure
pub fn load_pixels<R: Read>(reader: &mut R, width: u32, height: u32) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidPixelBuffer(format!(
            "zero-sized raster ({}x{})", width, height
        )));
    }

    let expected = byte_len(width, height, PixelFormat::Rgb)?;
    let mut data = try_alloc(expected)?;
    data.resize(expected, 0);

    let mut filled = 0;
    while filled < expected {
        match reader.read(&mut data[filled..]) {
            Ok(0) => return Err(Error::ShortRead { expected, actual: filled }),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    PixelBuffer::new(width, height, PixelFormat::Rgb, data)
}

/// Open a SIF file, parse its header and load a `width` x `height` payload
///
/// The file is closed before this function returns, on success and on error.
///
/// # Errors
///
/// Open failures map to `Error::Io`; see [`parse_header`] and [`load_pixels`]
/// for the rest.
pub fn load_raster_file<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<RasterImage> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::Io(format!("cannot open {}: {}", path.display(), e)))?;
    let mut reader = BufReader::new(file);

    let header = parse_header(&mut reader)?;
    if header.width != width || header.height != height {
        crate::engine_debug!("rastex::raster",
            "{}: header says {}x{}, loading {}x{} as requested",
            path.display(), header.width, header.height, width, height);
    }

    let pixels = load_pixels(&mut reader, width, height)?;

    crate::engine_info!("rastex::raster", "Loaded {} ({}x{}, {} bytes)",
        path.display(), width, height, pixels.len());

    Ok(RasterImage { header, pixels })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
