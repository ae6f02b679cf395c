/// Graphics device module - the GPU seam texture configuration talks to

// Module declarations
pub mod graphics_device;
#[cfg(test)]
pub mod mock_graphics_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;
