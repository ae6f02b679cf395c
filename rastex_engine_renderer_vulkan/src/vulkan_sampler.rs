/// Sampler state - the per-texture parameters a VkSampler is built from
///
/// Wrap, filter and anisotropy are texture parameters on the engine side but
/// immutable sampler objects in Vulkan, so every parameter change rebuilds
/// the texture's VkSampler.

use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{mag_filter_to_vk, min_filter_to_vk, wrap_mode_to_vk};
use ash::vk;
use rastex_engine::rastex::Result;
use rastex_engine::rastex::texture::{MagFilter, MinFilter, WrapMode};
use rastex_engine::engine_err;

/// Sampling parameters of one texture (defaults match a fresh GL texture)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SamplerState {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    /// `None` disables anisotropic filtering
    pub anisotropy: Option<f32>,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            min_filter: MinFilter::NearestMipmapNearest,
            mag_filter: MagFilter::Linear,
            anisotropy: None,
        }
    }
}

impl SamplerState {
    pub(crate) fn create_info(&self) -> vk::SamplerCreateInfo<'static> {
        let min = min_filter_to_vk(self.min_filter);

        let create_info = vk::SamplerCreateInfo::default()
            .mag_filter(mag_filter_to_vk(self.mag_filter))
            .min_filter(min.filter)
            .mipmap_mode(min.mipmap_mode)
            .address_mode_u(wrap_mode_to_vk(self.wrap_s))
            .address_mode_v(wrap_mode_to_vk(self.wrap_t))
            .address_mode_w(wrap_mode_to_vk(self.wrap_t))
            .mip_lod_bias(0.0)
            .min_lod(0.0)
            .max_lod(min.max_lod)
            .border_color(vk::BorderColor::FLOAT_OPAQUE_BLACK)
            .unnormalized_coordinates(false)
            .compare_enable(false)
            .compare_op(vk::CompareOp::ALWAYS);

        match self.anisotropy {
            Some(level) if level > 1.0 => create_info
                .anisotropy_enable(true)
                .max_anisotropy(level),
            _ => create_info
                .anisotropy_enable(false)
                .max_anisotropy(1.0),
        }
    }

    /// Build a VkSampler for this state
    pub(crate) fn create_sampler(&self, ctx: &GpuContext) -> Result<vk::Sampler> {
        unsafe {
            ctx.device.create_sampler(&self.create_info(), None)
                .map_err(|e| engine_err!("rastex::vulkan", "Failed to create VkSampler: {:?}", e))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "vulkan_sampler_tests.rs"]
mod tests;
