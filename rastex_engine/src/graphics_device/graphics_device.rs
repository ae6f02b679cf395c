/// GraphicsDevice trait - texture state machine exposed by a GPU backend
///
/// The device follows a bind-then-operate model: every call after
/// `bind_texture` applies to the bound texture until it is unbound or
/// another texture is bound.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::pixel::PixelFormat;
use crate::texture::{ChannelType, InternalFormat, MagFilter, MinFilter, WrapAxis, WrapMode};

// ============================================================================
// Common types
// ============================================================================

/// Opaque texture identifier owned by a graphics device
///
/// Ids start at 1; 0 is never handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Device capabilities that can be queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Highest anisotropic filtering level
    MaxAnisotropy,
}

/// Answer to a capability query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapabilityValue {
    Supported(f32),
    Unsupported,
}

/// Base level upload parameters
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub width: u32,
    pub height: u32,
    /// Storage format on the device
    pub internal_format: InternalFormat,
    /// Layout of `data`
    pub external_format: PixelFormat,
    pub channel_type: ChannelType,
    pub data: &'a [u8],
}

/// Validation layer verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugSeverity {
    ErrorsOnly,
    #[default]
    ErrorsAndWarnings,
    All,
}

/// Graphics device configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Enable validation/debug layers
    pub enable_validation: bool,
    /// Application name
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
    /// Which validation messages the debug callback reports
    pub debug_severity: DebugSeverity,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enable_validation: cfg!(debug_assertions),
            app_name: "Rastex Application".to_string(),
            app_version: (1, 0, 0),
            debug_severity: DebugSeverity::default(),
        }
    }
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Texture-side interface of a GPU backend
///
/// Every call reports device errors as `Error::GpuResource` (or
/// `Error::AllocationFailed` for memory exhaustion).
pub trait GraphicsDevice: Send {
    /// Allocate a new, empty texture object
    fn create_texture(&mut self) -> Result<TextureId>;

    /// Make `id` the active 2D texture
    fn bind_texture(&mut self, id: TextureId) -> Result<()>;

    /// Clear the active 2D texture binding
    fn unbind_texture(&mut self) -> Result<()>;

    /// Upload mip level 0 of the bound texture
    fn upload_base_level(&mut self, upload: &TextureUpload<'_>) -> Result<()>;

    /// Build the full mip chain of the bound texture from level 0
    fn generate_mipmaps(&mut self) -> Result<()>;

    /// Set the wrap mode of the bound texture along one axis
    fn set_wrap_mode(&mut self, axis: WrapAxis, mode: WrapMode) -> Result<()>;

    /// Set the minification filter of the bound texture
    fn set_min_filter(&mut self, filter: MinFilter) -> Result<()>;

    /// Set the magnification filter of the bound texture
    fn set_mag_filter(&mut self, filter: MagFilter) -> Result<()>;

    /// Query a device capability
    fn query_capability(&mut self, capability: Capability) -> Result<CapabilityValue>;

    /// Set the anisotropic filtering level of the bound texture
    fn set_anisotropy(&mut self, level: f32) -> Result<()>;

    /// Destroy a texture (unbinding it first if it is bound)
    fn delete_texture(&mut self, id: TextureId) -> Result<()>;
}

/// Graphics device shared between the configurator and texture handles
pub type SharedGraphicsDevice = Arc<Mutex<dyn GraphicsDevice>>;

/// Lock a shared device, mapping a poisoned lock to `Error::GpuResource`
pub fn lock_device(device: &SharedGraphicsDevice) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device.lock()
        .map_err(|_| crate::engine_err!("rastex::device", "Graphics device lock poisoned"))
}
