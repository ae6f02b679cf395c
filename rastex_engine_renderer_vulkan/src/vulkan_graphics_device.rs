/// VulkanGraphicsDevice - headless Vulkan implementation of the GraphicsDevice trait
///
/// No surface or swapchain: the device only owns a graphics queue used for
/// texture uploads and mip generation. Textures live in slots keyed by
/// TextureId; the slot's image is (re)created by each base level upload and
/// its sampler is rebuilt whenever a sampling parameter changes.

use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{to_rgba8, TEXTURE_FORMAT};
use crate::vulkan_texture::{Texture, TextureImage};
use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use rastex_engine::rastex::{GraphicsDevice, Result};
use rastex_engine::rastex::device::{
    Capability, CapabilityValue, DeviceConfig, TextureId, TextureUpload,
};
use rastex_engine::rastex::pixel::byte_len;
use rastex_engine::rastex::texture::{MagFilter, MinFilter, WrapAxis, WrapMode};
use rastex_engine::utils::IdAllocator;
use rastex_engine::{engine_bail, engine_debug, engine_err, engine_info, engine_trace, engine_warn};
use rustc_hash::FxHashMap;
use std::ffi::{CStr, CString};
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex};

/// What a renderer needs to sample a configured texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBinding {
    pub view: vk::ImageView,
    pub sampler: vk::Sampler,
    pub width: u32,
    pub height: u32,
    /// Levels holding valid data
    pub mip_levels: u32,
}

/// Physical device selected at startup, with the properties texture setup depends on
struct AdapterInfo {
    physical_device: vk::PhysicalDevice,
    graphics_family: u32,
    name: String,
    max_anisotropy: Option<f32>,
    max_image_dimension: u32,
    blit_filter: vk::Filter,
}

/// Headless Vulkan graphics device
pub struct VulkanGraphicsDevice {
    /// Keeps the Vulkan library loaded
    _entry: ash::Entry,
    instance: ash::Instance,
    ctx: Arc<GpuContext>,
    textures: FxHashMap<TextureId, Texture>,
    ids: IdAllocator,
    bound: Option<TextureId>,
    /// `None` when the samplerAnisotropy feature is unavailable
    max_anisotropy: Option<f32>,
    max_image_dimension: u32,
    /// Filter used for mip blits (nearest if the format cannot be linearly filtered)
    blit_filter: vk::Filter,
    device_name: String,
    #[cfg(feature = "vulkan-validation")]
    debug_messenger: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanGraphicsDevice {
    /// Create a headless device on the first suitable GPU (discrete preferred)
    pub fn new(config: DeviceConfig) -> Result<Self> {
        let validation = config.enable_validation && cfg!(feature = "vulkan-validation");
        if config.enable_validation && !validation {
            engine_warn!("rastex::vulkan", "Validation requested but the vulkan-validation feature is disabled");
        }

        let entry = unsafe { ash::Entry::load() }
            .map_err(|e| engine_err!("rastex::vulkan", "Failed to load Vulkan library: {:?}", e))?;

        let instance = Self::create_instance(&entry, &config, validation)?;

        match Self::with_instance(entry, instance.clone(), &config, validation) {
            Ok(device) => Ok(device),
            Err(e) => {
                unsafe { instance.destroy_instance(None); }
                Err(e)
            }
        }
    }

    fn create_instance(entry: &ash::Entry, config: &DeviceConfig, validation: bool) -> Result<ash::Instance> {
        let app_name = CString::new(config.app_name.as_str())
            .map_err(|_| engine_err!("rastex::vulkan", "Application name contains a NUL byte"))?;
        let (major, minor, patch) = config.app_version;

        let app_info = vk::ApplicationInfo::default()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(c"Rastex")
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_1);

        let mut extension_names = Vec::new();
        let mut layer_names = Vec::new();
        if validation {
            extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            layer_names.push(c"VK_LAYER_KHRONOS_validation".as_ptr());
        }

        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names);

        unsafe {
            entry.create_instance(&create_info, None)
                .map_err(|e| engine_err!("rastex::vulkan", "Failed to create Vulkan instance: {:?}", e))
        }
    }

    fn with_instance(
        entry: ash::Entry,
        instance: ash::Instance,
        config: &DeviceConfig,
        validation: bool,
    ) -> Result<Self> {
        let adapter = Self::pick_adapter(&instance)?;
        let device = Self::create_logical_device(&instance, &adapter)?;

        let ctx = match Self::create_context(&instance, &adapter, device.clone()) {
            Ok(ctx) => Arc::new(ctx),
            Err(e) => {
                unsafe { device.destroy_device(None); }
                return Err(e);
            }
        };

        engine_info!(
            "rastex::vulkan",
            "Vulkan device ready: {} (anisotropy: {})",
            adapter.name,
            adapter.max_anisotropy.map_or("unsupported".to_string(), |max| format!("up to {}x", max))
        );

        #[cfg(not(feature = "vulkan-validation"))]
        let _ = (validation, config.debug_severity);

        Ok(Self {
            #[cfg(feature = "vulkan-validation")]
            debug_messenger: if validation {
                Self::create_debug_messenger(&entry, &instance, config)
            } else {
                None
            },
            _entry: entry,
            instance,
            ctx,
            textures: FxHashMap::default(),
            ids: IdAllocator::new(),
            bound: None,
            max_anisotropy: adapter.max_anisotropy,
            max_image_dimension: adapter.max_image_dimension,
            blit_filter: adapter.blit_filter,
            device_name: adapter.name,
        })
    }

    fn pick_adapter(instance: &ash::Instance) -> Result<AdapterInfo> {
        unsafe {
            let physical_devices = instance.enumerate_physical_devices()
                .map_err(|e| engine_err!("rastex::vulkan", "Failed to enumerate physical devices: {:?}", e))?;

            let mut candidates: Vec<(vk::PhysicalDevice, u32, vk::PhysicalDeviceProperties)> = physical_devices
                .into_iter()
                .filter_map(|physical_device| {
                    let graphics_family = instance
                        .get_physical_device_queue_family_properties(physical_device)
                        .iter()
                        .position(|qf| qf.queue_flags.contains(vk::QueueFlags::GRAPHICS))?;
                    let properties = instance.get_physical_device_properties(physical_device);
                    Some((physical_device, graphics_family as u32, properties))
                })
                .collect();

            // Discrete GPUs first, enumeration order otherwise
            candidates.sort_by_key(|(_, _, properties)| {
                properties.device_type != vk::PhysicalDeviceType::DISCRETE_GPU
            });

            let (physical_device, graphics_family, properties) = candidates
                .into_iter()
                .next()
                .ok_or_else(|| engine_err!("rastex::vulkan", "No Vulkan GPU with a graphics queue found"))?;

            let features = instance.get_physical_device_features(physical_device);
            let max_anisotropy = (features.sampler_anisotropy == vk::TRUE)
                .then_some(properties.limits.max_sampler_anisotropy);

            let format_properties = instance.get_physical_device_format_properties(physical_device, TEXTURE_FORMAT);
            let blit_filter = if format_properties
                .optimal_tiling_features
                .contains(vk::FormatFeatureFlags::SAMPLED_IMAGE_FILTER_LINEAR)
            {
                vk::Filter::LINEAR
            } else {
                vk::Filter::NEAREST
            };

            // Null-terminated by the driver
            let name = CStr::from_ptr(properties.device_name.as_ptr())
                .to_string_lossy()
                .into_owned();

            Ok(AdapterInfo {
                physical_device,
                graphics_family,
                name,
                max_anisotropy,
                max_image_dimension: properties.limits.max_image_dimension2_d,
                blit_filter,
            })
        }
    }

    fn create_logical_device(instance: &ash::Instance, adapter: &AdapterInfo) -> Result<ash::Device> {
        let queue_priorities = [1.0];
        let queue_create_infos = [vk::DeviceQueueCreateInfo::default()
            .queue_family_index(adapter.graphics_family)
            .queue_priorities(&queue_priorities)];

        let device_features = vk::PhysicalDeviceFeatures::default()
            .sampler_anisotropy(adapter.max_anisotropy.is_some());

        let device_create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_features(&device_features);

        unsafe {
            instance.create_device(adapter.physical_device, &device_create_info, None)
                .map_err(|e| engine_err!("rastex::vulkan", "Failed to create logical device: {:?}", e))
        }
    }

    fn create_context(instance: &ash::Instance, adapter: &AdapterInfo, device: ash::Device) -> Result<GpuContext> {
        unsafe {
            let graphics_queue = device.get_device_queue(adapter.graphics_family, 0);

            let allocator = Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: device.clone(),
                physical_device: adapter.physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            })
            .map_err(|e| engine_err!("rastex::vulkan", "Failed to create GPU allocator: {:?}", e))?;

            // TRANSIENT + RESET for reusable one-shot uploads
            let pool_create_info = vk::CommandPoolCreateInfo::default()
                .queue_family_index(adapter.graphics_family)
                .flags(vk::CommandPoolCreateFlags::TRANSIENT | vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

            let upload_command_pool = device.create_command_pool(&pool_create_info, None)
                .map_err(|e| engine_err!("rastex::vulkan", "Failed to create upload command pool: {:?}", e))?;

            let upload_fence = match device.create_fence(&vk::FenceCreateInfo::default(), None) {
                Ok(fence) => fence,
                Err(e) => {
                    device.destroy_command_pool(upload_command_pool, None);
                    return Err(engine_err!("rastex::vulkan", "Failed to create upload fence: {:?}", e));
                }
            };

            Ok(GpuContext::new(
                device,
                Arc::new(Mutex::new(allocator)),
                graphics_queue,
                adapter.graphics_family,
                upload_command_pool,
                upload_fence,
            ))
        }
    }

    #[cfg(feature = "vulkan-validation")]
    fn create_debug_messenger(
        entry: &ash::Entry,
        instance: &ash::Instance,
        config: &DeviceConfig,
    ) -> Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);
        crate::vulkan_debug::init_debug_config(config.debug_severity);

        let create_info = crate::vulkan_debug::messenger_create_info(config.debug_severity);
        match unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) } {
            Ok(messenger) => Some((debug_utils, messenger)),
            Err(e) => {
                engine_warn!("rastex::vulkan", "Failed to create debug messenger, continuing without: {:?}", e);
                None
            }
        }
    }

    /// Name of the GPU in use
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Driver anisotropy limit, `None` when unsupported
    pub fn max_anisotropy(&self) -> Option<f32> {
        self.max_anisotropy
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// View and sampler of an uploaded texture, for descriptor writes
    pub fn texture_binding(&self, id: TextureId) -> Option<TextureBinding> {
        let texture = self.textures.get(&id)?;
        let image = texture.image.as_ref()?;
        Some(TextureBinding {
            view: image.view,
            sampler: texture.sampler,
            width: image.width,
            height: image.height,
            mip_levels: image.levels_ready,
        })
    }

    fn bound_id(&self) -> Result<TextureId> {
        self.bound
            .ok_or_else(|| engine_err!("rastex::vulkan", "No texture bound"))
    }

    fn bound_texture(&mut self) -> Result<&mut Texture> {
        let id = self.bound_id()?;
        self.textures
            .get_mut(&id)
            .ok_or_else(|| engine_err!("rastex::vulkan", "Bound texture {} no longer exists", id))
    }

    /// Apply a change to the bound texture's sampling parameters and rebuild its sampler
    fn update_sampler<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut crate::vulkan_sampler::SamplerState),
    {
        let ctx = Arc::clone(&self.ctx);
        let texture = self.bound_texture()?;

        let mut state = texture.sampler_state;
        change(&mut state);
        let sampler = state.create_sampler(&ctx)?;

        texture.sampler_state = state;
        texture.set_sampler(sampler);
        Ok(())
    }
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn create_texture(&mut self) -> Result<TextureId> {
        let id = self.ids.alloc()
            .map(TextureId)
            .ok_or_else(|| engine_err!("rastex::vulkan", "Texture ids exhausted"))?;

        self.textures.insert(id, Texture::new(Arc::clone(&self.ctx)));
        engine_trace!("rastex::vulkan", "Created texture {}", id);
        Ok(id)
    }

    fn bind_texture(&mut self, id: TextureId) -> Result<()> {
        if !self.textures.contains_key(&id) {
            engine_bail!("rastex::vulkan", "Cannot bind unknown texture {}", id);
        }
        self.bound = Some(id);
        Ok(())
    }

    fn unbind_texture(&mut self) -> Result<()> {
        self.bound = None;
        Ok(())
    }

    fn upload_base_level(&mut self, upload: &TextureUpload<'_>) -> Result<()> {
        let id = self.bound_id()?;

        if upload.width == 0 || upload.height == 0 {
            engine_bail!("rastex::vulkan", "Cannot upload a {}x{} image", upload.width, upload.height);
        }
        if upload.width > self.max_image_dimension || upload.height > self.max_image_dimension {
            engine_bail!(
                "rastex::vulkan",
                "{}x{} exceeds the device image limit of {}",
                upload.width, upload.height, self.max_image_dimension
            );
        }
        let expected = byte_len(upload.width, upload.height, upload.external_format)?;
        if upload.data.len() != expected {
            engine_bail!(
                "rastex::vulkan",
                "Upload data is {} bytes, {}x{} {:?} needs {}",
                upload.data.len(), upload.width, upload.height, upload.external_format, expected
            );
        }

        let rgba = to_rgba8(upload.data, upload.external_format)?;
        let mut image = TextureImage::create(&self.ctx, upload.width, upload.height, upload.internal_format)?;
        if let Err(e) = image.upload_base_level(&self.ctx, &rgba) {
            image.destroy(&self.ctx);
            return Err(e);
        }

        let ctx = Arc::clone(&self.ctx);
        match self.bound_texture() {
            Ok(texture) => texture.set_image(image),
            Err(e) => {
                image.destroy(&ctx);
                return Err(e);
            }
        }
        engine_debug!("rastex::vulkan", "Uploaded {}x{} base level to texture {}", upload.width, upload.height, id);
        Ok(())
    }

    fn generate_mipmaps(&mut self) -> Result<()> {
        let ctx = Arc::clone(&self.ctx);
        let filter = self.blit_filter;
        let texture = self.bound_texture()?;
        let image = texture.image.as_mut()
            .ok_or_else(|| engine_err!("rastex::vulkan", "Cannot generate mipmaps before level 0 is uploaded"))?;
        image.generate_mipmaps(&ctx, filter)
    }

    fn set_wrap_mode(&mut self, axis: WrapAxis, mode: WrapMode) -> Result<()> {
        self.update_sampler(|state| match axis {
            WrapAxis::S => state.wrap_s = mode,
            WrapAxis::T => state.wrap_t = mode,
        })
    }

    fn set_min_filter(&mut self, filter: MinFilter) -> Result<()> {
        self.update_sampler(|state| state.min_filter = filter)
    }

    fn set_mag_filter(&mut self, filter: MagFilter) -> Result<()> {
        self.update_sampler(|state| state.mag_filter = filter)
    }

    fn query_capability(&mut self, capability: Capability) -> Result<CapabilityValue> {
        match capability {
            Capability::MaxAnisotropy => Ok(match self.max_anisotropy {
                Some(max) => CapabilityValue::Supported(max),
                None => CapabilityValue::Unsupported,
            }),
        }
    }

    fn set_anisotropy(&mut self, level: f32) -> Result<()> {
        let Some(max) = self.max_anisotropy else {
            engine_bail!("rastex::vulkan", "Anisotropic filtering is not supported by {}", self.device_name);
        };
        if !(1.0..=max).contains(&level) {
            engine_bail!("rastex::vulkan", "Anisotropy {} outside the supported range 1..={}", level, max);
        }
        self.update_sampler(|state| state.anisotropy = Some(level))
    }

    fn delete_texture(&mut self, id: TextureId) -> Result<()> {
        if self.textures.remove(&id).is_none() {
            engine_bail!("rastex::vulkan", "Cannot delete unknown texture {}", id);
        }
        self.ids.free(id.0);
        if self.bound == Some(id) {
            self.bound = None;
        }
        engine_trace!("rastex::vulkan", "Deleted texture {}", id);
        Ok(())
    }
}

impl Drop for VulkanGraphicsDevice {
    fn drop(&mut self) {
        unsafe {
            // Wait for the GPU to finish all work
            self.ctx.device.device_wait_idle().ok();

            // Textures release their images and samplers through the shared context
            self.bound = None;
            self.textures.clear();

            if let Ok(pool) = self.ctx.upload_command_pool.lock() {
                self.ctx.device.destroy_command_pool(*pool, None);
            }
            self.ctx.device.destroy_fence(self.ctx.upload_fence, None);

            // Allocator must go before the device
            match Arc::get_mut(&mut self.ctx) {
                Some(ctx) => ManuallyDrop::drop(&mut ctx.allocator),
                None => engine_warn!("rastex::vulkan", "GPU context still shared at shutdown, leaking allocator"),
            }

            #[cfg(feature = "vulkan-validation")]
            {
                crate::vulkan_debug::cleanup_debug_config();
                if let Some((debug_utils, messenger)) = self.debug_messenger.take() {
                    debug_utils.destroy_debug_utils_messenger(messenger, None);
                }
            }

            self.ctx.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}
