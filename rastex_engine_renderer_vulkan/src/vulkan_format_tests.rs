//! Unit tests for Vulkan conversion functions
//!
//! Pure mappings only, no GPU required.

use super::*;

// ============================================================================
// SAMPLER MAPPINGS
// ============================================================================

#[test]
fn test_wrap_mode_to_vk() {
    assert_eq!(wrap_mode_to_vk(WrapMode::ClampToEdge), vk::SamplerAddressMode::CLAMP_TO_EDGE);
    assert_eq!(wrap_mode_to_vk(WrapMode::Repeat), vk::SamplerAddressMode::REPEAT);
    assert_eq!(wrap_mode_to_vk(WrapMode::MirroredRepeat), vk::SamplerAddressMode::MIRRORED_REPEAT);
}

#[test]
fn test_min_filter_without_mipmaps_clamps_lod() {
    let linear = min_filter_to_vk(MinFilter::Linear);
    assert_eq!(linear.filter, vk::Filter::LINEAR);
    assert_eq!(linear.max_lod, 0.0);

    let nearest = min_filter_to_vk(MinFilter::Nearest);
    assert_eq!(nearest.filter, vk::Filter::NEAREST);
    assert_eq!(nearest.max_lod, 0.0);
}

#[test]
fn test_min_filter_with_mipmaps() {
    let trilinear = min_filter_to_vk(MinFilter::LinearMipmapLinear);
    assert_eq!(trilinear.filter, vk::Filter::LINEAR);
    assert_eq!(trilinear.mipmap_mode, vk::SamplerMipmapMode::LINEAR);
    assert_eq!(trilinear.max_lod, vk::LOD_CLAMP_NONE);

    let nearest = min_filter_to_vk(MinFilter::NearestMipmapNearest);
    assert_eq!(nearest.filter, vk::Filter::NEAREST);
    assert_eq!(nearest.mipmap_mode, vk::SamplerMipmapMode::NEAREST);
    assert_eq!(nearest.max_lod, vk::LOD_CLAMP_NONE);
}

#[test]
fn test_mag_filter_to_vk() {
    assert_eq!(mag_filter_to_vk(MagFilter::Linear), vk::Filter::LINEAR);
    assert_eq!(mag_filter_to_vk(MagFilter::Nearest), vk::Filter::NEAREST);
}

#[test]
fn test_component_mapping_alpha() {
    assert_eq!(component_mapping(InternalFormat::Rgb).a, vk::ComponentSwizzle::ONE);
    assert_eq!(component_mapping(InternalFormat::Rgba).a, vk::ComponentSwizzle::IDENTITY);
    assert_eq!(component_mapping(InternalFormat::Rgb).r, vk::ComponentSwizzle::IDENTITY);
}

// ============================================================================
// PIXEL DATA
// ============================================================================

#[test]
fn test_rgb_is_expanded_to_rgba() {
    let rgba = to_rgba8(&[1, 2, 3, 4, 5, 6], PixelFormat::Rgb).unwrap();
    assert_eq!(&*rgba, &[1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn test_rgba_is_borrowed() {
    let data = [9u8, 8, 7, 6];
    let rgba = to_rgba8(&data, PixelFormat::Rgba).unwrap();
    assert!(matches!(rgba, Cow::Borrowed(_)));
    assert_eq!(&*rgba, &data);
}

#[test]
fn test_mip_extent() {
    assert_eq!(mip_extent(512, 256, 0), (512, 256));
    assert_eq!(mip_extent(512, 256, 1), (256, 128));
    assert_eq!(mip_extent(512, 256, 9), (1, 1));
    assert_eq!(mip_extent(3, 1, 1), (1, 1));
    assert_eq!(mip_extent(1, 1, 40), (1, 1));
}

#[test]
fn test_texture_format_is_rgba8() {
    assert_eq!(TEXTURE_FORMAT, vk::Format::R8G8B8A8_UNORM);
}
