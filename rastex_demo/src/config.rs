/// Demo command line (clap derive)

use clap::{Parser, ValueEnum};
use rastex_engine::rastex::device::DeviceConfig;
use rastex_engine::rastex::texture::{TextureDescriptor, WrapMode};
use std::path::PathBuf;

/// Which image sources to configure as textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageSource {
    /// Decode the raster file given by --image
    Raster,
    /// Synthesize the procedural test pattern
    Pattern,
    /// Raster first, then pattern
    Both,
}

/// Wrap mode names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WrapArg {
    Clamp,
    Repeat,
    Mirror,
}

impl From<WrapArg> for WrapMode {
    fn from(arg: WrapArg) -> Self {
        match arg {
            WrapArg::Clamp => WrapMode::ClampToEdge,
            WrapArg::Repeat => WrapMode::Repeat,
            WrapArg::Mirror => WrapMode::MirroredRepeat,
        }
    }
}

/// Load a raster image or a generated pattern and configure it as a GPU texture.
#[derive(Parser, Debug)]
#[command(name = "rastex_demo", version, about = "Raster to GPU texture upload demo")]
pub struct DemoConfig {
    /// Raster file (6-byte header followed by RGB bytes)
    #[arg(short, long, default_value = "ybrr.sif", value_name = "FILE")]
    pub image: PathBuf,

    /// Texture width in pixels (also the pixel read width for raster files)
    #[arg(long, default_value_t = 512)]
    pub width: u32,

    /// Texture height in pixels (also the pixel read height for raster files)
    #[arg(long, default_value_t = 512)]
    pub height: u32,

    /// Image source to upload (the pattern texture is configured last)
    #[arg(short, long, value_enum, default_value_t = ImageSource::Both)]
    pub source: ImageSource,

    /// Texture wrap mode on both axes
    #[arg(short, long, value_enum, default_value_t = WrapArg::Clamp)]
    pub wrap: WrapArg,

    /// Upload level 0 only and sample it without mipmaps
    #[arg(long)]
    pub no_mipmaps: bool,

    /// Enable the Vulkan validation layers (needs the vulkan-validation feature)
    #[arg(long)]
    pub validation: bool,

    /// Write engine logs to FILE instead of the console (truncated on start)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl DemoConfig {
    pub fn uses_raster(&self) -> bool {
        matches!(self.source, ImageSource::Raster | ImageSource::Both)
    }

    pub fn uses_pattern(&self) -> bool {
        matches!(self.source, ImageSource::Pattern | ImageSource::Both)
    }

    pub fn texture_descriptor(&self) -> TextureDescriptor {
        TextureDescriptor {
            wrap_mode: self.wrap.into(),
            generate_mipmaps: !self.no_mipmaps,
            ..TextureDescriptor::default()
        }
    }

    pub fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            enable_validation: self.validation,
            app_name: "Rastex Demo".to_string(),
            ..DeviceConfig::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
