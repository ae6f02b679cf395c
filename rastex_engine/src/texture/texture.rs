/// Texture handle - a configured GPU texture that deletes itself on drop

use std::fmt;
use crate::error::Result;
use crate::graphics_device::{lock_device, SharedGraphicsDevice, TextureId};
use crate::texture::TextureDescriptor;

/// Configuration progress of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TextureState {
    /// Not yet created on the device
    Unallocated,
    /// Created and bound, nothing uploaded
    Bound,
    /// Level 0 uploaded, sampling state not (fully) applied
    Uploaded,
    /// Mip chain generated; skipped when the descriptor asks for no mipmaps
    Mipmapped,
    /// Ready to sample
    Configured,
}

/// Number of levels in a full mip chain for `width` x `height`
pub fn full_mip_levels(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// GPU texture owned by this handle
///
/// Dropping the handle deletes the texture on its device exactly once.
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    descriptor: TextureDescriptor,
    state: TextureState,
    device: SharedGraphicsDevice,
    released: bool,
}

impl Texture {
    pub(crate) fn new(
        id: TextureId,
        width: u32,
        height: u32,
        descriptor: TextureDescriptor,
        state: TextureState,
        device: SharedGraphicsDevice,
    ) -> Self {
        Self { id, width, height, descriptor, state, device, released: false }
    }

    /// Device-side identifier
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Width of level 0
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of level 0
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Descriptor of the last configuration attempt
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> TextureState {
        self.state
    }

    /// True once every configuration step succeeded
    pub fn is_configured(&self) -> bool {
        self.state == TextureState::Configured
    }

    /// Mip levels present on the device
    pub fn mip_levels(&self) -> u32 {
        if self.descriptor.generate_mipmaps && self.state >= TextureState::Mipmapped {
            full_mip_levels(self.width, self.height)
        } else {
            1
        }
    }

    pub(crate) fn update(&mut self, width: u32, height: u32, descriptor: TextureDescriptor, state: TextureState) {
        self.width = width;
        self.height = height;
        self.descriptor = descriptor;
        self.state = state;
    }

    /// Delete the texture now and report the device's answer
    ///
    /// Drop does the same but can only log a failure.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        let mut device = lock_device(&self.device)?;
        device.delete_texture(self.id)
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("state", &self.state)
            .finish()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let Ok(mut device) = lock_device(&self.device) else {
            crate::engine_warn!("rastex::texture", "Device lock poisoned, texture {} leaked", self.id);
            return;
        };
        match device.delete_texture(self.id) {
            Ok(()) => crate::engine_trace!("rastex::texture", "Deleted texture {}", self.id),
            Err(e) => crate::engine_warn!("rastex::texture", "Failed to delete texture {}: {}", self.id, e),
        }
    }
}
