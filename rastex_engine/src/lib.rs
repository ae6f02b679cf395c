/*!
# Rastex Engine

Image acquisition and texture upload core.

This crate decodes SIF raster files, synthesizes procedural test patterns and
configures the resulting pixel buffers as sampled GPU textures through the
`GraphicsDevice` trait. Backend implementations (Vulkan) live in their own
crates.

## Architecture

- **raster**: SIF header parser and pixel loader
- **pixel**: owned pixel buffers and the pattern generator
- **texture**: texture descriptors, handles and the configurator
- **graphics_device**: the device trait textures are configured through
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod utils;
pub mod raster;
pub mod pixel;
pub mod graphics_device;
pub mod texture;

// Main rastex namespace module
pub mod rastex {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine (logger entry point)
    pub use crate::engine::Engine;

    // Graphics device trait
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, FileLogger};
    }

    // Device sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Raster sub-module
    pub mod raster {
        pub use crate::raster::*;
    }

    // Pixel sub-module
    pub mod pixel {
        pub use crate::pixel::*;
    }

    // Texture sub-module
    pub mod texture {
        pub use crate::texture::*;
    }
}
