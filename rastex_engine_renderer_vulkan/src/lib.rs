/*!
# Rastex Engine - Vulkan Backend

Headless Vulkan implementation of the `GraphicsDevice` trait.

Textures are stored as RGBA8 images with a full mip chain, uploaded through a
staging buffer on the graphics queue, and sampled through a per-texture
VkSampler rebuilt from the engine's wrap, filter and anisotropy parameters.
Uses Ash for the Vulkan bindings and gpu-allocator for memory management.

```no_run
use rastex_engine::rastex::device::{DeviceConfig, SharedGraphicsDevice};
use rastex_engine_renderer_vulkan::rastex::VulkanGraphicsDevice;
use std::sync::{Arc, Mutex};

let device = VulkanGraphicsDevice::new(DeviceConfig::default())?;
let shared: SharedGraphicsDevice = Arc::new(Mutex::new(device));
# Ok::<(), rastex_engine::rastex::Error>(())
```
*/

mod vulkan_context;
mod vulkan_format;
mod vulkan_sampler;
mod vulkan_texture;
mod vulkan_graphics_device;
#[cfg(feature = "vulkan-validation")]
mod vulkan_debug;

// Main rastex namespace module
pub mod rastex {
    pub use crate::vulkan_graphics_device::{TextureBinding, VulkanGraphicsDevice};
}
