//! Rastex demo: decode a raster file or generate a pattern, then configure it
//! as a sampled texture on a headless Vulkan device.
//!
//! Usage examples:
//!   rastex_demo --image ybrr.sif
//!   rastex_demo --source pattern --width 256 --height 256 --wrap repeat
//!   rastex_demo --source raster --no-mipmaps --log-file rastex.log

mod config;

use clap::Parser;
use config::DemoConfig;
use rastex_engine::rastex::{Engine, Result};
use rastex_engine::rastex::log::FileLogger;
use rastex_engine::rastex::device::SharedGraphicsDevice;
use rastex_engine::rastex::pixel::generate_pattern;
use rastex_engine::rastex::raster::load_raster_file;
use rastex_engine::rastex::texture::{Texture, TextureConfigurator};
use rastex_engine::{engine_error, engine_info};
use rastex_engine_renderer_vulkan::rastex::VulkanGraphicsDevice;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

fn main() -> ExitCode {
    let config = DemoConfig::parse();

    if let Some(path) = &config.log_file {
        match FileLogger::create(path) {
            Ok(logger) => Engine::set_logger(logger),
            Err(e) => {
                engine_error!("rastex::demo", "Cannot open log file {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            engine_error!("rastex::demo", "{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &DemoConfig) -> Result<()> {
    let device = VulkanGraphicsDevice::new(config.device_config())?;
    engine_info!("rastex::demo", "Using {}", device.device_name());

    let device: SharedGraphicsDevice = Arc::new(Mutex::new(device));
    let configurator = TextureConfigurator::new(device);
    let desc = config.texture_descriptor();

    let mut textures: Vec<(&str, Texture)> = Vec::new();

    if config.uses_raster() {
        let image = load_raster_file(&config.image, config.width, config.height)?;
        textures.push(("raster", configurator.configure(&image.pixels, &desc)?));
    }

    if config.uses_pattern() {
        let pixels = generate_pattern(config.width, config.height)?;
        textures.push(("pattern", configurator.configure(&pixels, &desc)?));
    }

    for (name, texture) in &textures {
        engine_info!(
            "rastex::demo",
            "{} texture {}: {}x{}, {} mip level(s), wrap {:?}, anisotropy {:?}",
            name,
            texture.id(),
            texture.width(),
            texture.height(),
            texture.mip_levels(),
            texture.descriptor().wrap_mode,
            texture.descriptor().anisotropy
        );
    }

    for (_, texture) in textures {
        texture.release()?;
    }
    Ok(())
}
