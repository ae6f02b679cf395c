/// SIF raster decoding: header parser and pixel loader

pub mod header;
pub mod loader;

pub use header::*;
pub use loader::*;
