/// Unit tests for MockGraphicsDevice
///
/// The configurator tests rely on the mock rejecting out-of-order calls,
/// so the state machine is checked here on its own.

use super::*;
use crate::error::Error;

fn upload(data: &[u8], width: u32, height: u32) -> TextureUpload<'_> {
    TextureUpload {
        width,
        height,
        internal_format: InternalFormat::Rgb,
        external_format: PixelFormat::Rgb,
        channel_type: ChannelType::UnsignedByte,
        data,
    }
}

// ============================================================================
// Creation / deletion
// ============================================================================

#[test]
fn test_create_texture_ids_start_at_one() {
    let mut device = MockGraphicsDevice::new();
    assert_eq!(device.create_texture().unwrap(), TextureId(1));
    assert_eq!(device.create_texture().unwrap(), TextureId(2));
    assert_eq!(device.textures.len(), 2);
    assert_eq!(device.calls, vec![
        GpuCall::CreateTexture(TextureId(1)),
        GpuCall::CreateTexture(TextureId(2)),
    ]);
}

#[test]
fn test_debug_output_includes_recorded_calls() {
    let mut device = MockGraphicsDevice::new();
    device.create_texture().unwrap();
    let text = format!("{:?}", device);
    assert!(text.starts_with("MockGraphicsDevice"), "{}", text);
    assert!(text.contains("CreateTexture(TextureId(1))"), "{}", text);
}

#[test]
fn test_delete_texture_recycles_id_and_unbinds() {
    let mut device = MockGraphicsDevice::new();
    let id = device.create_texture().unwrap();
    device.bind_texture(id).unwrap();

    device.delete_texture(id).unwrap();
    assert!(device.textures.is_empty());
    assert_eq!(device.bound, None);

    assert_eq!(device.create_texture().unwrap(), id);
}

#[test]
fn test_delete_unknown_texture_fails() {
    let mut device = MockGraphicsDevice::new();
    assert!(matches!(device.delete_texture(TextureId(7)), Err(Error::GpuResource(_))));
}

// ============================================================================
// State machine
// ============================================================================

#[test]
fn test_bind_unknown_texture_fails() {
    let mut device = MockGraphicsDevice::new();
    assert!(matches!(device.bind_texture(TextureId(3)), Err(Error::GpuResource(_))));
    assert_eq!(device.bound, None);
}

#[test]
fn test_calls_require_bound_texture() {
    let mut device = MockGraphicsDevice::new();
    let data = [0u8; 3];

    assert!(device.upload_base_level(&upload(&data, 1, 1)).is_err());
    assert!(device.set_wrap_mode(WrapAxis::S, WrapMode::Repeat).is_err());
    assert!(device.set_min_filter(MinFilter::Linear).is_err());
    assert!(device.set_mag_filter(MagFilter::Linear).is_err());
    assert!(device.set_anisotropy(4.0).is_err());
}

#[test]
fn test_mipmaps_require_upload() {
    let mut device = MockGraphicsDevice::new();
    let id = device.create_texture().unwrap();
    device.bind_texture(id).unwrap();

    assert!(device.generate_mipmaps().is_err());

    let data = [0u8; 4 * 2 * 3];
    device.upload_base_level(&upload(&data, 4, 2)).unwrap();
    device.generate_mipmaps().unwrap();
    assert_eq!(device.textures[&id].mip_levels, 3);
}

#[test]
fn test_upload_rejects_length_mismatch() {
    let mut device = MockGraphicsDevice::new();
    let id = device.create_texture().unwrap();
    device.bind_texture(id).unwrap();

    let data = [0u8; 5];
    assert!(device.upload_base_level(&upload(&data, 1, 2)).is_err());
    assert_eq!(device.textures[&id].base_level, None);
}

#[test]
fn test_parameters_are_stored_on_bound_texture() {
    let mut device = MockGraphicsDevice::new();
    let id = device.create_texture().unwrap();
    device.bind_texture(id).unwrap();

    device.set_wrap_mode(WrapAxis::S, WrapMode::Repeat).unwrap();
    device.set_wrap_mode(WrapAxis::T, WrapMode::MirroredRepeat).unwrap();
    device.set_min_filter(MinFilter::NearestMipmapNearest).unwrap();
    device.set_mag_filter(MagFilter::Nearest).unwrap();
    device.set_anisotropy(8.0).unwrap();

    let texture = &device.textures[&id];
    assert_eq!(texture.wrap_s, Some(WrapMode::Repeat));
    assert_eq!(texture.wrap_t, Some(WrapMode::MirroredRepeat));
    assert_eq!(texture.min_filter, Some(MinFilter::NearestMipmapNearest));
    assert_eq!(texture.mag_filter, Some(MagFilter::Nearest));
    assert_eq!(texture.anisotropy, Some(8.0));
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_query_anisotropy() {
    let mut device = MockGraphicsDevice::new();
    assert_eq!(
        device.query_capability(Capability::MaxAnisotropy).unwrap(),
        CapabilityValue::Supported(16.0)
    );

    let mut device = MockGraphicsDevice::new().without_anisotropy();
    assert_eq!(
        device.query_capability(Capability::MaxAnisotropy).unwrap(),
        CapabilityValue::Unsupported
    );
}

#[test]
fn test_anisotropy_above_max_fails() {
    let mut device = MockGraphicsDevice::new();
    let id = device.create_texture().unwrap();
    device.bind_texture(id).unwrap();
    assert!(device.set_anisotropy(32.0).is_err());
}

// ============================================================================
// Failure injection / recording
// ============================================================================

#[test]
fn test_fail_on_records_then_fails() {
    let mut device = MockGraphicsDevice::new();
    let id = device.create_texture().unwrap();
    device.fail_on(GpuCallKind::BindTexture);

    assert!(matches!(device.bind_texture(id), Err(Error::GpuResource(_))));
    assert_eq!(device.count(GpuCallKind::BindTexture), 1);
    assert_eq!(device.bound, None);

    device.clear_failure();
    device.bind_texture(id).unwrap();
    assert_eq!(device.bound, Some(id));
}

#[test]
fn test_fail_on_create_records_nothing() {
    let mut device = MockGraphicsDevice::new();
    device.fail_on(GpuCallKind::CreateTexture);

    assert!(device.create_texture().is_err());
    assert!(device.calls.is_empty());
    assert!(device.textures.is_empty());
}

#[test]
fn test_kinds_and_clear_calls() {
    let mut device = MockGraphicsDevice::new();
    let id = device.create_texture().unwrap();
    device.bind_texture(id).unwrap();
    device.unbind_texture().unwrap();

    assert_eq!(device.kinds(), vec![
        GpuCallKind::CreateTexture,
        GpuCallKind::BindTexture,
        GpuCallKind::UnbindTexture,
    ]);

    device.clear_calls();
    assert!(device.calls.is_empty());
    assert!(device.textures.contains_key(&id));
}

#[test]
fn test_shared_handles_point_to_same_device() {
    let (mock, shared) = MockGraphicsDevice::shared();
    let id = shared.lock().unwrap().create_texture().unwrap();
    assert!(mock.lock().unwrap().textures.contains_key(&id));
}
