/// Texture configurator - turns a pixel buffer into a sampled GPU texture
///
/// Call order on the device, for every configuration:
///
/// 1. create (new textures only), bind
/// 2. upload level 0
/// 3. generate mipmaps (if requested)
/// 4. wrap S, wrap T
/// 5. min filter, mag filter
/// 6. query max anisotropy, apply it when supported
///
/// Any failure unbinds the texture (and deletes it if it was created by
/// this call) before the error is returned.

use crate::error::{Error, Result};
use crate::graphics_device::{
    lock_device, Capability, CapabilityValue, GraphicsDevice, SharedGraphicsDevice, TextureId,
    TextureUpload,
};
use crate::pixel::{byte_len, PixelBuffer};
use crate::texture::{Anisotropy, ChannelType, Texture, TextureDescriptor, TextureState, WrapAxis};

/// Configures textures on a shared graphics device
pub struct TextureConfigurator {
    device: SharedGraphicsDevice,
}

impl TextureConfigurator {
    pub fn new(device: SharedGraphicsDevice) -> Self {
        Self { device }
    }

    /// The device textures are created on
    pub fn device(&self) -> &SharedGraphicsDevice {
        &self.device
    }

    /// Create a texture from `pixels` and configure it per `desc`
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPixelBuffer` before any device call if `pixels` is inconsistent
    /// - `Error::GpuResource` / `Error::AllocationFailed` from the device; the
    ///   texture is unbound and deleted first
    pub fn configure(&self, pixels: &PixelBuffer, desc: &TextureDescriptor) -> Result<Texture> {
        validate_pixels(pixels)?;

        let mut device = lock_device(&self.device)?;
        let id = device.create_texture()?;

        let mut state = TextureState::Unallocated;
        if let Err(e) = apply(&mut *device, id, pixels, desc, &mut state) {
            cleanup(&mut *device, id, true);
            crate::engine_error!("rastex::texture",
                "Texture {} failed while {:?}: {}", id, state, e);
            return Err(e);
        }
        drop(device);

        crate::engine_debug!("rastex::texture",
            "Configured texture {} ({}x{}, {:?}, {:?})",
            id, pixels.width(), pixels.height(), desc.internal_format, desc.resolved_min_filter());

        Ok(Texture::new(id, pixels.width(), pixels.height(), *desc, state, self.device.clone()))
    }

    /// Re-upload and reconfigure an existing texture
    ///
    /// On failure the texture is unbound but kept; its state reports how far
    /// configuration got.
    pub fn reconfigure(&self, texture: &mut Texture, pixels: &PixelBuffer, desc: &TextureDescriptor) -> Result<()> {
        validate_pixels(pixels)?;

        let mut device = lock_device(&self.device)?;
        let id = texture.id();

        let mut state = TextureState::Unallocated;
        let result = apply(&mut *device, id, pixels, desc, &mut state);
        if result.is_err() {
            cleanup(&mut *device, id, false);
        }
        drop(device);

        texture.update(pixels.width(), pixels.height(), *desc, state);
        result
    }
}

/// Check the buffer contract without touching the device
fn validate_pixels(pixels: &PixelBuffer) -> Result<()> {
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(Error::InvalidPixelBuffer(format!(
            "zero-sized buffer ({}x{})", pixels.width(), pixels.height()
        )));
    }
    let expected = byte_len(pixels.width(), pixels.height(), pixels.format())?;
    if pixels.len() != expected {
        return Err(Error::InvalidPixelBuffer(format!(
            "expected {} bytes, got {}", expected, pixels.len()
        )));
    }
    Ok(())
}

/// Run the bind..anisotropy sequence, tracking progress in `state`
fn apply(
    device: &mut dyn GraphicsDevice,
    id: TextureId,
    pixels: &PixelBuffer,
    desc: &TextureDescriptor,
    state: &mut TextureState,
) -> Result<()> {
    device.bind_texture(id)?;
    *state = TextureState::Bound;

    device.upload_base_level(&TextureUpload {
        width: pixels.width(),
        height: pixels.height(),
        internal_format: desc.internal_format,
        external_format: pixels.format(),
        channel_type: ChannelType::UnsignedByte,
        data: pixels.as_bytes(),
    })?;
    *state = TextureState::Uploaded;

    if desc.generate_mipmaps {
        device.generate_mipmaps()?;
        *state = TextureState::Mipmapped;
    }

    device.set_wrap_mode(WrapAxis::S, desc.wrap_mode)?;
    device.set_wrap_mode(WrapAxis::T, desc.wrap_mode)?;

    device.set_min_filter(desc.resolved_min_filter())?;
    device.set_mag_filter(desc.resolved_mag_filter())?;

    if desc.anisotropy != Anisotropy::Off {
        match device.query_capability(Capability::MaxAnisotropy)? {
            CapabilityValue::Supported(max) => {
                if let Some(level) = desc.anisotropy.level(max) {
                    device.set_anisotropy(level)?;
                }
            }
            CapabilityValue::Unsupported => {
                crate::engine_debug!("rastex::texture",
                    "Anisotropic filtering unsupported, skipped for texture {}", id);
            }
        }
    }

    *state = TextureState::Configured;
    Ok(())
}

/// Best-effort rollback after a failed sequence
fn cleanup(device: &mut dyn GraphicsDevice, id: TextureId, delete: bool) {
    if let Err(e) = device.unbind_texture() {
        crate::engine_warn!("rastex::texture", "Failed to unbind texture {}: {}", id, e);
    }
    if delete {
        if let Err(e) = device.delete_texture(id) {
            crate::engine_warn!("rastex::texture", "Failed to delete texture {}: {}", id, e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "configurator_tests.rs"]
mod tests;
