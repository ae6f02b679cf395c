/// Procedural pattern generator
///
/// Produces an RGB test image without touching the filesystem: black with a
/// green ramp that climbs with the byte offset of each pixel.

use crate::error::{Error, Result};
use crate::pixel::pixel_buffer::{byte_len, try_alloc, PixelBuffer, PixelFormat};

/// Generate an `x` by `y` RGB pattern
///
/// For the pixel starting at byte offset `n` (a multiple of 3):
/// red = 0, green = `n % 255`, blue = 0. Exactly three bytes are written per
/// pixel and nothing past the end of the buffer.
///
/// # Errors
///
/// - `Error::InvalidPixelBuffer` if `x` or `y` is zero
/// - `Error::AllocationFailed` if `x * y * 3` overflows or cannot be reserved
pub fn generate_pattern(x: u32, y: u32) -> Result<PixelBuffer> {
    if x == 0 || y == 0 {
        return Err(Error::InvalidPixelBuffer(format!("zero-sized pattern ({}x{})", x, y)));
    }

    let len = byte_len(x, y, PixelFormat::Rgb)?;
    let mut data = try_alloc(len)?;
    data.resize(len, 0);

    for (pixel, n) in data.chunks_exact_mut(3).zip((0..len).step_by(3)) {
        pixel.copy_from_slice(&[0, (n % 255) as u8, 0]);
    }

    crate::engine_trace!("rastex::pattern", "Generated {}x{} pattern", x, y);
    PixelBuffer::new(x, y, PixelFormat::Rgb, data)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
