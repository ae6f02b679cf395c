//! Error types for the Rastex engine
//!
//! This module defines the error types used throughout the engine,
//! covering raster decoding, pixel buffer construction and GPU texture setup.

use std::fmt;

/// Result type for Rastex engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Rastex engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The raster header could not be read in full
    TruncatedHeader {
        /// Header size in bytes
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// The pixel payload is shorter than the requested dimensions require
    ShortRead {
        /// Bytes requested (width * height * channels)
        expected: usize,
        /// Bytes actually read before end of stream
        actual: usize,
    },

    /// Buffer size overflow, failed host reservation or failed GPU allocation
    AllocationFailed(String),

    /// A graphics device call reported an error state
    GpuResource(String),

    /// A pixel buffer does not satisfy `data.len() == width * height * channels`
    InvalidPixelBuffer(String),

    /// File open or read failure (other than a short payload)
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TruncatedHeader { expected, actual } => {
                write!(f, "Truncated header: expected {} bytes, got {}", expected, actual)
            }
            Error::ShortRead { expected, actual } => {
                write!(f, "Short read: expected {} bytes, got {}", expected, actual)
            }
            Error::AllocationFailed(msg) => write!(f, "Allocation failed: {}", msg),
            Error::GpuResource(msg) => write!(f, "GPU resource error: {}", msg),
            Error::InvalidPixelBuffer(msg) => write!(f, "Invalid pixel buffer: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
