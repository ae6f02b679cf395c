/// Conversions from engine texture types to Vulkan enums

use ash::vk;
use rastex_engine::rastex::{Error, Result};
use rastex_engine::rastex::pixel::PixelFormat;
use rastex_engine::rastex::texture::{InternalFormat, MagFilter, MinFilter, WrapMode};
use std::borrow::Cow;

/// Every texture is stored as RGBA8; 3-channel optimal-tiling formats are rarely supported
pub const TEXTURE_FORMAT: vk::Format = vk::Format::R8G8B8A8_UNORM;

/// Sampler fields derived from a min filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinFilterVk {
    pub filter: vk::Filter,
    pub mipmap_mode: vk::SamplerMipmapMode,
    /// 0 restricts sampling to level 0
    pub max_lod: f32,
}

pub fn wrap_mode_to_vk(mode: WrapMode) -> vk::SamplerAddressMode {
    match mode {
        WrapMode::ClampToEdge => vk::SamplerAddressMode::CLAMP_TO_EDGE,
        WrapMode::Repeat => vk::SamplerAddressMode::REPEAT,
        WrapMode::MirroredRepeat => vk::SamplerAddressMode::MIRRORED_REPEAT,
    }
}

pub fn min_filter_to_vk(filter: MinFilter) -> MinFilterVk {
    let max_lod = if filter.uses_mipmaps() { vk::LOD_CLAMP_NONE } else { 0.0 };
    let (filter, mipmap_mode) = match filter {
        MinFilter::Nearest | MinFilter::NearestMipmapNearest => {
            (vk::Filter::NEAREST, vk::SamplerMipmapMode::NEAREST)
        }
        MinFilter::Linear => (vk::Filter::LINEAR, vk::SamplerMipmapMode::NEAREST),
        MinFilter::LinearMipmapLinear => (vk::Filter::LINEAR, vk::SamplerMipmapMode::LINEAR),
    };
    MinFilterVk { filter, mipmap_mode, max_lod }
}

pub fn mag_filter_to_vk(filter: MagFilter) -> vk::Filter {
    match filter {
        MagFilter::Nearest => vk::Filter::NEAREST,
        MagFilter::Linear => vk::Filter::LINEAR,
    }
}

/// Component mapping for a texture view
///
/// RGB textures are stored as RGBA8 and read alpha as 1.
pub fn component_mapping(format: InternalFormat) -> vk::ComponentMapping {
    let alpha = match format {
        InternalFormat::Rgb => vk::ComponentSwizzle::ONE,
        InternalFormat::Rgba => vk::ComponentSwizzle::IDENTITY,
    };
    vk::ComponentMapping {
        r: vk::ComponentSwizzle::IDENTITY,
        g: vk::ComponentSwizzle::IDENTITY,
        b: vk::ComponentSwizzle::IDENTITY,
        a: alpha,
    }
}

/// Pixel data laid out as RGBA8, expanding RGB with an opaque alpha channel
pub fn to_rgba8(data: &[u8], format: PixelFormat) -> Result<Cow<'_, [u8]>> {
    match format {
        PixelFormat::Rgba => Ok(Cow::Borrowed(data)),
        PixelFormat::Rgb => {
            let len = (data.len() / 3)
                .checked_mul(4)
                .ok_or_else(|| Error::AllocationFailed(format!("{} RGB bytes overflow as RGBA", data.len())))?;
            let mut rgba = Vec::new();
            rgba.try_reserve_exact(len)
                .map_err(|e| Error::AllocationFailed(format!("cannot reserve {} bytes: {}", len, e)))?;
            for pixel in data.chunks_exact(3) {
                rgba.extend_from_slice(pixel);
                rgba.push(u8::MAX);
            }
            Ok(Cow::Owned(rgba))
        }
    }
}

/// Size of mip `level` for a base extent
pub fn mip_extent(width: u32, height: u32, level: u32) -> (u32, u32) {
    let shift = level.min(31);
    ((width >> shift).max(1), (height >> shift).max(1))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
