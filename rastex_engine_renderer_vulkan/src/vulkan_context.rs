/// GpuContext - Shared GPU resources for all Vulkan objects
///
/// Contains everything needed for GPU operations:
/// - Device for Vulkan API calls
/// - Allocator for memory management
/// - Queue for command submission
/// - Command pool and fence for one-shot upload operations

use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme, Allocator};
use gpu_allocator::MemoryLocation;
use rastex_engine::rastex::{Error, Result};
use rastex_engine::{engine_err, engine_error};
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared GPU context for all Vulkan resources.
///
/// Shared (via `Arc`) by every texture so each one can release its own
/// image, view and sampler.
///
/// Note: Device and instance destruction is handled by VulkanGraphicsDevice::drop().
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// GPU memory allocator
    /// Wrapped in ManuallyDrop so it is dropped BEFORE the device is destroyed
    pub allocator: ManuallyDrop<Arc<Mutex<Allocator>>>,

    /// Queue used for uploads and mip generation (graphics capable, blits need it)
    pub graphics_queue: vk::Queue,

    /// Graphics queue family index
    pub graphics_queue_family: u32,

    /// Reusable command pool for one-shot upload operations
    /// (created with TRANSIENT + RESET_COMMAND_BUFFER flags)
    pub upload_command_pool: Mutex<vk::CommandPool>,

    /// Signalled when a one-shot submission has finished
    pub upload_fence: vk::Fence,
}

impl GpuContext {
    pub fn new(
        device: ash::Device,
        allocator: Arc<Mutex<Allocator>>,
        graphics_queue: vk::Queue,
        graphics_queue_family: u32,
        upload_command_pool: vk::CommandPool,
        upload_fence: vk::Fence,
    ) -> Self {
        Self {
            device,
            allocator: ManuallyDrop::new(allocator),
            graphics_queue,
            graphics_queue_family,
            upload_command_pool: Mutex::new(upload_command_pool),
            upload_fence,
        }
    }

    /// Lock the allocator, mapping a poisoned lock to an error
    pub fn lock_allocator(&self) -> Result<MutexGuard<'_, Allocator>> {
        self.allocator.lock()
            .map_err(|_| engine_err!("rastex::vulkan", "GPU allocator lock poisoned"))
    }

    /// Allocate and bind memory for a buffer or image
    pub fn allocate(
        &self,
        name: &str,
        requirements: vk::MemoryRequirements,
        location: MemoryLocation,
        linear: bool,
    ) -> Result<Allocation> {
        self.lock_allocator()?
            .allocate(&AllocationCreateDesc {
                name,
                requirements,
                location,
                linear,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            })
            .map_err(|e| {
                let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                engine_error!("rastex::vulkan", "Out of GPU memory for {} ({:.2} MB): {}", name, size_mb, e);
                Error::AllocationFailed(format!("{} ({:.2} MB): {}", name, size_mb, e))
            })
    }

    /// Return memory to the allocator
    pub fn free(&self, allocation: Allocation) {
        if let Ok(mut allocator) = self.allocator.lock() {
            allocator.free(allocation).ok();
        }
    }

    /// Record commands into a one-shot command buffer, submit and wait for completion
    pub fn submit_one_shot<F>(&self, record: F) -> Result<()>
    where
        F: FnOnce(&ash::Device, vk::CommandBuffer),
    {
        let pool = self.upload_command_pool.lock()
            .map_err(|_| engine_err!("rastex::vulkan", "Upload command pool lock poisoned"))?;

        unsafe {
            let allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(*pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            let command_buffer = self.device.allocate_command_buffers(&allocate_info)
                .map_err(|e| engine_err!("rastex::vulkan", "Failed to allocate upload command buffer: {:?}", e))?
                .into_iter()
                .next()
                .ok_or_else(|| engine_err!("rastex::vulkan", "Driver returned no command buffer"))?;

            let result = self.record_and_submit(command_buffer, record);

            self.device.free_command_buffers(*pool, &[command_buffer]);
            result
        }
    }

    unsafe fn record_and_submit<F>(&self, command_buffer: vk::CommandBuffer, record: F) -> Result<()>
    where
        F: FnOnce(&ash::Device, vk::CommandBuffer),
    {
        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        self.device.begin_command_buffer(command_buffer, &begin_info)
            .map_err(|e| engine_err!("rastex::vulkan", "Failed to begin upload command buffer: {:?}", e))?;

        record(&self.device, command_buffer);

        self.device.end_command_buffer(command_buffer)
            .map_err(|e| engine_err!("rastex::vulkan", "Failed to end upload command buffer: {:?}", e))?;

        let command_buffers = [command_buffer];
        let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);

        self.device.queue_submit(self.graphics_queue, &[submit_info], self.upload_fence)
            .map_err(|e| engine_err!("rastex::vulkan", "Failed to submit upload commands: {:?}", e))?;

        self.device.wait_for_fences(&[self.upload_fence], true, u64::MAX)
            .map_err(|e| engine_err!("rastex::vulkan", "Failed to wait for upload fence: {:?}", e))?;

        self.device.reset_fences(&[self.upload_fence])
            .map_err(|e| engine_err!("rastex::vulkan", "Failed to reset upload fence: {:?}", e))
    }

    /// Copy `data` into a host-visible staging buffer and run `use_buffer` with it
    ///
    /// The staging buffer is destroyed once `use_buffer` returns, whatever its result.
    pub fn with_staging_buffer<T, F>(&self, data: &[u8], use_buffer: F) -> Result<T>
    where
        F: FnOnce(vk::Buffer) -> Result<T>,
    {
        unsafe {
            let create_info = vk::BufferCreateInfo::default()
                .size(data.len() as u64)
                .usage(vk::BufferUsageFlags::TRANSFER_SRC)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = self.device.create_buffer(&create_info, None)
                .map_err(|e| engine_err!("rastex::vulkan", "Failed to create staging buffer: {:?}", e))?;

            let requirements = self.device.get_buffer_memory_requirements(buffer);
            let mut allocation = match self.allocate("texture_staging_buffer", requirements, MemoryLocation::CpuToGpu, true) {
                Ok(allocation) => allocation,
                Err(e) => {
                    self.device.destroy_buffer(buffer, None);
                    return Err(e);
                }
            };

            let result = self.fill_staging(buffer, &mut allocation, data)
                .and_then(|()| use_buffer(buffer));

            self.device.destroy_buffer(buffer, None);
            self.free(allocation);
            result
        }
    }

    unsafe fn fill_staging(&self, buffer: vk::Buffer, allocation: &mut Allocation, data: &[u8]) -> Result<()> {
        self.device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset())
            .map_err(|e| engine_err!("rastex::vulkan", "Failed to bind staging buffer memory: {:?}", e))?;

        let mapped = allocation.mapped_slice_mut()
            .ok_or_else(|| engine_err!("rastex::vulkan", "Staging buffer is not mapped"))?;
        let target = mapped.get_mut(..data.len())
            .ok_or_else(|| engine_err!("rastex::vulkan", "Staging buffer smaller than {} bytes", data.len()))?;
        target.copy_from_slice(data);
        Ok(())
    }
}
