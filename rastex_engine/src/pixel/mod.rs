/// Pixel module - in-memory image sources

pub mod pixel_buffer;
pub mod pattern;

pub use pixel_buffer::*;
pub use pattern::*;
