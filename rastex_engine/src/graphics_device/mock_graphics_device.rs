/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every call in order and enforces the bind/upload state machine
/// the way a GL driver would reject out-of-order calls. Failures can be
/// injected per call kind.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{
    Capability, CapabilityValue, GraphicsDevice, SharedGraphicsDevice, TextureId, TextureUpload,
};
use crate::pixel::PixelFormat;
use crate::texture::{ChannelType, InternalFormat, MagFilter, MinFilter, WrapAxis, WrapMode};
use crate::utils::IdAllocator;

// ============================================================================
// Recorded calls
// ============================================================================

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateTexture(TextureId),
    BindTexture(TextureId),
    UnbindTexture,
    UploadBaseLevel {
        width: u32,
        height: u32,
        internal_format: InternalFormat,
        external_format: PixelFormat,
        channel_type: ChannelType,
        len: usize,
    },
    GenerateMipmaps,
    SetWrapMode(WrapAxis, WrapMode),
    SetMinFilter(MinFilter),
    SetMagFilter(MagFilter),
    QueryCapability(Capability),
    SetAnisotropy(f32),
    DeleteTexture(TextureId),
}

/// Call kinds, used to inject failures and count calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuCallKind {
    CreateTexture,
    BindTexture,
    UnbindTexture,
    UploadBaseLevel,
    GenerateMipmaps,
    SetWrapMode,
    SetMinFilter,
    SetMagFilter,
    QueryCapability,
    SetAnisotropy,
    DeleteTexture,
}

impl GpuCall {
    pub fn kind(&self) -> GpuCallKind {
        match self {
            GpuCall::CreateTexture(_) => GpuCallKind::CreateTexture,
            GpuCall::BindTexture(_) => GpuCallKind::BindTexture,
            GpuCall::UnbindTexture => GpuCallKind::UnbindTexture,
            GpuCall::UploadBaseLevel { .. } => GpuCallKind::UploadBaseLevel,
            GpuCall::GenerateMipmaps => GpuCallKind::GenerateMipmaps,
            GpuCall::SetWrapMode(..) => GpuCallKind::SetWrapMode,
            GpuCall::SetMinFilter(_) => GpuCallKind::SetMinFilter,
            GpuCall::SetMagFilter(_) => GpuCallKind::SetMagFilter,
            GpuCall::QueryCapability(_) => GpuCallKind::QueryCapability,
            GpuCall::SetAnisotropy(_) => GpuCallKind::SetAnisotropy,
            GpuCall::DeleteTexture(_) => GpuCallKind::DeleteTexture,
        }
    }
}

// ============================================================================
// Mock texture
// ============================================================================

/// State the mock keeps per live texture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MockTexture {
    /// (width, height, internal format) of level 0, once uploaded
    pub base_level: Option<(u32, u32, InternalFormat)>,
    pub mip_levels: u32,
    pub wrap_s: Option<WrapMode>,
    pub wrap_t: Option<WrapMode>,
    pub min_filter: Option<MinFilter>,
    pub mag_filter: Option<MagFilter>,
    pub anisotropy: Option<f32>,
}

// ============================================================================
// Mock device
// ============================================================================

/// Recording graphics device
#[derive(Debug)]
pub struct MockGraphicsDevice {
    /// Every call, in order (failed calls included, except a failed create)
    pub calls: Vec<GpuCall>,
    /// Live textures
    pub textures: FxHashMap<TextureId, MockTexture>,
    /// Currently bound texture
    pub bound: Option<TextureId>,
    /// Value reported for `Capability::MaxAnisotropy` (None = unsupported)
    pub max_anisotropy: Option<f32>,
    fail_on: Option<GpuCallKind>,
    ids: IdAllocator,
}

impl MockGraphicsDevice {
    /// Create a mock reporting 16x anisotropy
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            textures: FxHashMap::default(),
            bound: None,
            max_anisotropy: Some(16.0),
            fail_on: None,
            ids: IdAllocator::new(),
        }
    }

    /// Create a mock wrapped for sharing, plus the same device as a trait object
    pub fn shared() -> (Arc<Mutex<MockGraphicsDevice>>, SharedGraphicsDevice) {
        let mock = Arc::new(Mutex::new(Self::new()));
        let shared: SharedGraphicsDevice = mock.clone();
        (mock, shared)
    }

    /// Report `Capability::MaxAnisotropy` as unsupported
    pub fn without_anisotropy(mut self) -> Self {
        self.max_anisotropy = None;
        self
    }

    /// Make every call of `kind` fail with `Error::GpuResource`
    pub fn fail_on(&mut self, kind: GpuCallKind) {
        self.fail_on = Some(kind);
    }

    /// Stop injecting failures
    pub fn clear_failure(&mut self) {
        self.fail_on = None;
    }

    /// Recorded calls of one kind
    pub fn count(&self, kind: GpuCallKind) -> usize {
        self.calls.iter().filter(|call| call.kind() == kind).count()
    }

    /// Recorded call kinds, in order
    pub fn kinds(&self) -> Vec<GpuCallKind> {
        self.calls.iter().map(GpuCall::kind).collect()
    }

    /// Forget recorded calls (texture state is kept)
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: GpuCall) -> Result<()> {
        let kind = call.kind();
        self.calls.push(call);
        if self.fail_on == Some(kind) {
            engine_bail!("rastex::mock", "Injected failure on {:?}", kind);
        }
        Ok(())
    }

    fn bound_texture(&mut self) -> Result<&mut MockTexture> {
        let Some(id) = self.bound else {
            engine_bail!("rastex::mock", "No texture bound");
        };
        match self.textures.get_mut(&id) {
            Some(texture) => Ok(texture),
            None => engine_bail!("rastex::mock", "Bound texture {} no longer exists", id),
        }
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self) -> Result<TextureId> {
        if self.fail_on == Some(GpuCallKind::CreateTexture) {
            engine_bail!("rastex::mock", "Injected failure on {:?}", GpuCallKind::CreateTexture);
        }
        let Some(raw) = self.ids.alloc() else {
            engine_bail!("rastex::mock", "Texture ids exhausted");
        };
        let id = TextureId(raw);
        self.textures.insert(id, MockTexture::default());
        self.calls.push(GpuCall::CreateTexture(id));
        Ok(id)
    }

    fn bind_texture(&mut self, id: TextureId) -> Result<()> {
        self.record(GpuCall::BindTexture(id))?;
        if !self.textures.contains_key(&id) {
            engine_bail!("rastex::mock", "Cannot bind unknown texture {}", id);
        }
        self.bound = Some(id);
        Ok(())
    }

    fn unbind_texture(&mut self) -> Result<()> {
        self.record(GpuCall::UnbindTexture)?;
        self.bound = None;
        Ok(())
    }

    fn upload_base_level(&mut self, upload: &TextureUpload<'_>) -> Result<()> {
        self.record(GpuCall::UploadBaseLevel {
            width: upload.width,
            height: upload.height,
            internal_format: upload.internal_format,
            external_format: upload.external_format,
            channel_type: upload.channel_type,
            len: upload.data.len(),
        })?;

        let expected = upload.width as usize
            * upload.height as usize
            * upload.external_format.channels();
        if upload.data.len() != expected {
            engine_bail!("rastex::mock", "Upload of {} bytes, {}x{} {:?} needs {}",
                upload.data.len(), upload.width, upload.height, upload.external_format, expected);
        }

        let texture = self.bound_texture()?;
        texture.base_level = Some((upload.width, upload.height, upload.internal_format));
        texture.mip_levels = 1;
        Ok(())
    }

    fn generate_mipmaps(&mut self) -> Result<()> {
        self.record(GpuCall::GenerateMipmaps)?;
        let texture = self.bound_texture()?;
        let Some((width, height, _)) = texture.base_level else {
            engine_bail!("rastex::mock", "Cannot generate mipmaps before level 0 is uploaded");
        };
        texture.mip_levels = 32 - width.max(height).leading_zeros();
        Ok(())
    }

    fn set_wrap_mode(&mut self, axis: WrapAxis, mode: WrapMode) -> Result<()> {
        self.record(GpuCall::SetWrapMode(axis, mode))?;
        let texture = self.bound_texture()?;
        match axis {
            WrapAxis::S => texture.wrap_s = Some(mode),
            WrapAxis::T => texture.wrap_t = Some(mode),
        }
        Ok(())
    }

    fn set_min_filter(&mut self, filter: MinFilter) -> Result<()> {
        self.record(GpuCall::SetMinFilter(filter))?;
        self.bound_texture()?.min_filter = Some(filter);
        Ok(())
    }

    fn set_mag_filter(&mut self, filter: MagFilter) -> Result<()> {
        self.record(GpuCall::SetMagFilter(filter))?;
        self.bound_texture()?.mag_filter = Some(filter);
        Ok(())
    }

    fn query_capability(&mut self, capability: Capability) -> Result<CapabilityValue> {
        self.record(GpuCall::QueryCapability(capability))?;
        Ok(match (capability, self.max_anisotropy) {
            (Capability::MaxAnisotropy, Some(max)) => CapabilityValue::Supported(max),
            (Capability::MaxAnisotropy, None) => CapabilityValue::Unsupported,
        })
    }

    fn set_anisotropy(&mut self, level: f32) -> Result<()> {
        self.record(GpuCall::SetAnisotropy(level))?;
        let max = self.max_anisotropy;
        let texture = self.bound_texture()?;
        match max {
            Some(max) if level >= 1.0 && level <= max => {
                texture.anisotropy = Some(level);
                Ok(())
            }
            _ => engine_bail!("rastex::mock", "Anisotropy {} out of range (max {:?})", level, max),
        }
    }

    fn delete_texture(&mut self, id: TextureId) -> Result<()> {
        self.record(GpuCall::DeleteTexture(id))?;
        if self.textures.remove(&id).is_none() {
            engine_bail!("rastex::mock", "Cannot delete unknown texture {}", id);
        }
        self.ids.free(id.0);
        if self.bound == Some(id) {
            self.bound = None;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
