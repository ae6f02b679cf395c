/// Texture descriptor - how a pixel buffer becomes a sampled texture

// ============================================================================
// Formats
// ============================================================================

/// GPU-side storage format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InternalFormat {
    /// 3 channels
    #[default]
    Rgb,
    /// 4 channels (alpha defaults to 1 when uploaded from RGB data)
    Rgba,
}

/// Per-channel data type of uploaded pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelType {
    /// 8-bit unsigned normalized
    #[default]
    UnsignedByte,
}

// ============================================================================
// Sampling
// ============================================================================

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// Texture coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapAxis {
    /// Horizontal (u)
    S,
    /// Vertical (v)
    T,
}

/// Base filter chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

/// Minification filter as applied on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapLinear,
}

impl MinFilter {
    /// Resolve the device filter from a base filter and whether a mip chain exists
    pub fn resolve(filter: Filter, mipmapped: bool) -> Self {
        match (filter, mipmapped) {
            (Filter::Nearest, false) => MinFilter::Nearest,
            (Filter::Linear, false) => MinFilter::Linear,
            (Filter::Nearest, true) => MinFilter::NearestMipmapNearest,
            (Filter::Linear, true) => MinFilter::LinearMipmapLinear,
        }
    }

    /// True if this filter samples between mip levels
    pub fn uses_mipmaps(&self) -> bool {
        matches!(self, MinFilter::NearestMipmapNearest | MinFilter::LinearMipmapLinear)
    }
}

/// Magnification filter as applied on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagFilter {
    Nearest,
    Linear,
}

impl From<Filter> for MagFilter {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => MagFilter::Nearest,
            Filter::Linear => MagFilter::Linear,
        }
    }
}

/// Anisotropic filtering request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Anisotropy {
    /// Neither query nor apply
    Off,
    /// Apply the device maximum
    #[default]
    DriverMax,
    /// Apply `level` clamped to `1..=device maximum`
    Limit(f32),
}

impl Anisotropy {
    /// Level to apply given the device maximum, `None` when disabled
    pub fn level(&self, driver_max: f32) -> Option<f32> {
        match *self {
            Anisotropy::Off => None,
            Anisotropy::DriverMax => Some(driver_max),
            Anisotropy::Limit(level) => Some(level.min(driver_max).max(1.0)),
        }
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// Everything needed to configure a texture from a pixel buffer
///
/// Built per upload and consumed by [`TextureConfigurator`](crate::texture::TextureConfigurator).
///
/// # Example
///
/// ```
/// use rastex_engine::rastex::texture::{TextureDescriptor, WrapMode, MinFilter};
///
/// let desc = TextureDescriptor {
///     wrap_mode: WrapMode::Repeat,
///     ..Default::default()
/// };
/// assert_eq!(desc.resolved_min_filter(), MinFilter::LinearMipmapLinear);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDescriptor {
    pub internal_format: InternalFormat,
    pub wrap_mode: WrapMode,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub anisotropy: Anisotropy,
    pub generate_mipmaps: bool,
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        Self {
            internal_format: InternalFormat::Rgb,
            wrap_mode: WrapMode::ClampToEdge,
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            anisotropy: Anisotropy::DriverMax,
            generate_mipmaps: true,
        }
    }
}

impl TextureDescriptor {
    /// Min filter as it will be set on the device
    pub fn resolved_min_filter(&self) -> MinFilter {
        MinFilter::resolve(self.min_filter, self.generate_mipmaps)
    }

    /// Mag filter as it will be set on the device
    pub fn resolved_mag_filter(&self) -> MagFilter {
        self.mag_filter.into()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_desc_tests.rs"]
mod tests;
