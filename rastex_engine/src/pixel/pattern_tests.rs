//! Unit tests for the procedural pattern generator

use super::*;

// ============================================================================
// SIZE TESTS
// ============================================================================

#[test]
fn test_pattern_length_is_x_times_y_times_three() {
    for (x, y) in [(1, 1), (2, 2), (3, 7), (64, 1), (512, 512)] {
        let buffer = generate_pattern(x, y).unwrap();
        assert_eq!(buffer.len(), (x * y * 3) as usize, "{}x{}", x, y);
        assert_eq!(buffer.width(), x);
        assert_eq!(buffer.height(), y);
        assert_eq!(buffer.format(), PixelFormat::Rgb);
    }
}

#[test]
fn test_pattern_zero_dimension_is_rejected() {
    assert!(matches!(generate_pattern(0, 5), Err(Error::InvalidPixelBuffer(_))));
    assert!(matches!(generate_pattern(5, 0), Err(Error::InvalidPixelBuffer(_))));
}

#[test]
fn test_pattern_overflow_is_allocation_error() {
    assert!(matches!(
        generate_pattern(u32::MAX, u32::MAX),
        Err(Error::AllocationFailed(_))
    ));
}

// ============================================================================
// CHANNEL VALUES
// ============================================================================

#[test]
fn test_clean_pattern_channel_values() {
    // 200 pixels spans more than one wrap of the 255 modulus (600 bytes)
    let buffer = generate_pattern(20, 10).unwrap();
    let bytes = buffer.as_bytes();

    for p in 0..200usize {
        let n = 3 * p;
        assert_eq!(bytes[n], 0, "red of pixel {}", p);
        assert_eq!(bytes[n + 1], (n % 255) as u8, "green of pixel {}", p);
        assert_eq!(bytes[n + 2], 0, "blue of pixel {}", p);
    }
}

#[test]
fn test_clean_pattern_green_wraps_at_255() {
    let buffer = generate_pattern(100, 1).unwrap();
    // pixel 85 starts at byte 255 -> green 0
    assert_eq!(buffer.pixel(85, 0), Some(&[0u8, 0, 0][..]));
    // pixel 84 starts at byte 252 -> green 252
    assert_eq!(buffer.pixel(84, 0), Some(&[0u8, 252, 0][..]));
    // pixel 86 starts at byte 258 -> green 3
    assert_eq!(buffer.pixel(86, 0), Some(&[0u8, 3, 0][..]));
}

// ============================================================================
// BOUNDS
// ============================================================================

#[test]
fn test_every_red_byte_stays_zero() {
    // A 4-byte store per pixel would leave 255 in the next pixel's red channel
    let buffer = generate_pattern(4, 3).unwrap();
    for p in 0..12u32 {
        let pixel = buffer.pixel(p % 4, p / 4).unwrap();
        assert_eq!(pixel[0], 0, "red of pixel {}", p);
    }
}

#[test]
fn test_single_pixel_pattern() {
    let buffer = generate_pattern(1, 1).unwrap();
    assert_eq!(buffer.as_bytes(), &[0, 0, 0]);
}

#[test]
fn test_last_pixel_is_written() {
    let buffer = generate_pattern(7, 5).unwrap();
    let n = 34 * 3;
    assert_eq!(buffer.pixel(6, 4), Some(&[0u8, (n % 255) as u8, 0][..]));
    assert_eq!(buffer.len(), 105);
}
