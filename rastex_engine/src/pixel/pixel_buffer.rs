/// PixelBuffer - owned, row-major 8-bit pixel data

use crate::error::{Error, Result};

/// Channel layout of a pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 3 bytes per pixel
    Rgb,
    /// 4 bytes per pixel
    Rgba,
}

impl PixelFormat {
    /// Number of 8-bit channels per pixel
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Compute `width * height * channels` with overflow checking
///
/// # Errors
///
/// `Error::AllocationFailed` if the product does not fit in `usize`.
pub fn byte_len(width: u32, height: u32, format: PixelFormat) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(format.channels()))
        .ok_or_else(|| Error::AllocationFailed(format!(
            "{}x{}x{} bytes overflows usize", width, height, format.channels()
        )))
}

/// Reserve exactly `len` bytes, reporting failure instead of aborting
pub(crate) fn try_alloc(len: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|e| Error::AllocationFailed(format!("cannot reserve {} bytes: {}", len, e)))?;
    Ok(data)
}

/// Owned pixel data with its geometry
///
/// Invariant: `data.len() == width * height * format.channels()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing bytes, checking the size contract
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPixelBuffer` if a dimension is zero or the length does not match
    /// - `Error::AllocationFailed` if the expected size overflows
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidPixelBuffer(format!(
                "zero-sized buffer ({}x{})", width, height
            )));
        }
        let expected = byte_len(width, height, format)?;
        if data.len() != expected {
            return Err(Error::InvalidPixelBuffer(format!(
                "{}x{} {:?} needs {} bytes, got {}", width, height, format, expected, data.len()
            )));
        }
        Ok(Self { width, height, format, data })
    }

    /// A buffer where every pixel has the same channel values
    ///
    /// `pixel` must hold exactly `format.channels()` bytes.
    pub fn filled(width: u32, height: u32, format: PixelFormat, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != format.channels() {
            return Err(Error::InvalidPixelBuffer(format!(
                "fill value has {} channels, {:?} has {}", pixel.len(), format, format.channels()
            )));
        }
        let len = byte_len(width, height, format)?;
        let mut data = try_alloc(len)?;
        for _ in 0..len / format.channels() {
            data.extend_from_slice(pixel);
        }
        Self::new(width, height, format, data)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed buffer; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Channels of the pixel at (x, y), or `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.format.channels();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        self.data.get(start..start + channels)
    }

    /// Give up the buffer and keep only its bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "pixel_buffer_tests.rs"]
mod tests;
