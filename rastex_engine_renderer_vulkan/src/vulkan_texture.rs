/// Texture - Vulkan image, view and sampler behind one TextureId

use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{component_mapping, mip_extent, TEXTURE_FORMAT};
use crate::vulkan_sampler::SamplerState;
use ash::vk;
use gpu_allocator::vulkan::Allocation;
use gpu_allocator::MemoryLocation;
use rastex_engine::rastex::Result;
use rastex_engine::rastex::texture::{full_mip_levels, InternalFormat};
use rastex_engine::engine_err;
use std::sync::Arc;

/// Image storage, created by the first upload with room for the full mip chain
pub(crate) struct TextureImage {
    pub image: vk::Image,
    pub view: vk::ImageView,
    pub allocation: Option<Allocation>,
    pub width: u32,
    pub height: u32,
    pub internal_format: InternalFormat,
    /// Levels allocated in the image (full chain)
    pub mip_levels: u32,
    /// Levels holding valid data (1 after upload, `mip_levels` after generation)
    pub levels_ready: u32,
}

impl TextureImage {
    /// Create an RGBA8 image, bind its memory and create a view over every level
    ///
    /// All levels start in `UNDEFINED` layout with no valid data.
    pub(crate) fn create(
        ctx: &GpuContext,
        width: u32,
        height: u32,
        internal_format: InternalFormat,
    ) -> Result<Self> {
        let mip_levels = full_mip_levels(width, height);

        unsafe {
            let image_info = vk::ImageCreateInfo::default()
                .image_type(vk::ImageType::TYPE_2D)
                .format(TEXTURE_FORMAT)
                .extent(vk::Extent3D { width, height, depth: 1 })
                .mip_levels(mip_levels)
                .array_layers(1)
                .samples(vk::SampleCountFlags::TYPE_1)
                .tiling(vk::ImageTiling::OPTIMAL)
                .usage(
                    vk::ImageUsageFlags::SAMPLED
                        | vk::ImageUsageFlags::TRANSFER_DST
                        | vk::ImageUsageFlags::TRANSFER_SRC
                )
                .sharing_mode(vk::SharingMode::EXCLUSIVE)
                .initial_layout(vk::ImageLayout::UNDEFINED);

            let image = ctx.device.create_image(&image_info, None)
                .map_err(|e| engine_err!("rastex::vulkan", "Failed to create {}x{} image: {:?}", width, height, e))?;

            let requirements = ctx.device.get_image_memory_requirements(image);
            let allocation = match ctx.allocate("texture_image", requirements, MemoryLocation::GpuOnly, false) {
                Ok(allocation) => allocation,
                Err(e) => {
                    ctx.device.destroy_image(image, None);
                    return Err(e);
                }
            };

            if let Err(e) = ctx.device.bind_image_memory(image, allocation.memory(), allocation.offset()) {
                ctx.free(allocation);
                ctx.device.destroy_image(image, None);
                return Err(engine_err!("rastex::vulkan", "Failed to bind image memory: {:?}", e));
            }

            let view_info = vk::ImageViewCreateInfo::default()
                .image(image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(TEXTURE_FORMAT)
                .components(component_mapping(internal_format))
                .subresource_range(color_range(0, mip_levels));

            let view = match ctx.device.create_image_view(&view_info, None) {
                Ok(view) => view,
                Err(e) => {
                    ctx.free(allocation);
                    ctx.device.destroy_image(image, None);
                    return Err(engine_err!("rastex::vulkan", "Failed to create image view: {:?}", e));
                }
            };

            Ok(Self {
                image,
                view,
                allocation: Some(allocation),
                width,
                height,
                internal_format,
                mip_levels,
                levels_ready: 0,
            })
        }
    }

    /// Copy RGBA8 pixels into level 0
    ///
    /// Every level ends in `SHADER_READ_ONLY_OPTIMAL`; levels above 0 hold no data yet.
    pub(crate) fn upload_base_level(&mut self, ctx: &GpuContext, rgba: &[u8]) -> Result<()> {
        let image = self.image;
        let mip_levels = self.mip_levels;
        let extent = vk::Extent3D { width: self.width, height: self.height, depth: 1 };

        ctx.with_staging_buffer(rgba, |staging| {
            ctx.submit_one_shot(|device, cmd| unsafe {
                pipeline_barrier(
                    device,
                    cmd,
                    vk::PipelineStageFlags::TOP_OF_PIPE,
                    vk::PipelineStageFlags::TRANSFER,
                    layout_barrier(
                        image,
                        0,
                        mip_levels,
                        (vk::ImageLayout::UNDEFINED, vk::AccessFlags::empty()),
                        (vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::AccessFlags::TRANSFER_WRITE),
                    ),
                );

                let region = vk::BufferImageCopy::default()
                    .buffer_offset(0)
                    .buffer_row_length(0)
                    .buffer_image_height(0)
                    .image_subresource(color_layers(0))
                    .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
                    .image_extent(extent);

                device.cmd_copy_buffer_to_image(
                    cmd,
                    staging,
                    image,
                    vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                    &[region],
                );

                pipeline_barrier(
                    device,
                    cmd,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::PipelineStageFlags::FRAGMENT_SHADER,
                    layout_barrier(
                        image,
                        0,
                        mip_levels,
                        (vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::AccessFlags::TRANSFER_WRITE),
                        (vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL, vk::AccessFlags::SHADER_READ),
                    ),
                );
            })
        })?;

        self.levels_ready = 1;
        Ok(())
    }

    /// Fill levels 1.. by successive blits from level 0
    pub(crate) fn generate_mipmaps(&mut self, ctx: &GpuContext, filter: vk::Filter) -> Result<()> {
        if self.levels_ready == 0 {
            return Err(engine_err!("rastex::vulkan", "Cannot generate mipmaps before level 0 is uploaded"));
        }
        if self.mip_levels > 1 {
            self.record_blit_chain(ctx, filter)?;
        }
        self.levels_ready = self.mip_levels;
        Ok(())
    }

    fn record_blit_chain(&self, ctx: &GpuContext, filter: vk::Filter) -> Result<()> {
        let image = self.image;
        let mip_levels = self.mip_levels;
        let (width, height) = (self.width, self.height);

        ctx.submit_one_shot(|device, cmd| unsafe {
            // Previous contents of the upper levels are discarded
            pipeline_barrier(
                device,
                cmd,
                vk::PipelineStageFlags::TOP_OF_PIPE,
                vk::PipelineStageFlags::TRANSFER,
                layout_barrier(
                    image,
                    1,
                    mip_levels - 1,
                    (vk::ImageLayout::UNDEFINED, vk::AccessFlags::empty()),
                    (vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::AccessFlags::TRANSFER_WRITE),
                ),
            );
            pipeline_barrier(
                device,
                cmd,
                vk::PipelineStageFlags::FRAGMENT_SHADER,
                vk::PipelineStageFlags::TRANSFER,
                layout_barrier(
                    image,
                    0,
                    1,
                    (vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL, vk::AccessFlags::SHADER_READ),
                    (vk::ImageLayout::TRANSFER_SRC_OPTIMAL, vk::AccessFlags::TRANSFER_READ),
                ),
            );

            for level in 1..mip_levels {
                let (src_width, src_height) = mip_extent(width, height, level - 1);
                let (dst_width, dst_height) = mip_extent(width, height, level);

                let blit = vk::ImageBlit::default()
                    .src_subresource(color_layers(level - 1))
                    .src_offsets([
                        vk::Offset3D { x: 0, y: 0, z: 0 },
                        vk::Offset3D { x: src_width as i32, y: src_height as i32, z: 1 },
                    ])
                    .dst_subresource(color_layers(level))
                    .dst_offsets([
                        vk::Offset3D { x: 0, y: 0, z: 0 },
                        vk::Offset3D { x: dst_width as i32, y: dst_height as i32, z: 1 },
                    ]);

                device.cmd_blit_image(
                    cmd,
                    image,
                    vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                    image,
                    vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                    &[blit],
                    filter,
                );

                // The level just written becomes the source of the next blit
                pipeline_barrier(
                    device,
                    cmd,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::PipelineStageFlags::TRANSFER,
                    layout_barrier(
                        image,
                        level,
                        1,
                        (vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::AccessFlags::TRANSFER_WRITE),
                        (vk::ImageLayout::TRANSFER_SRC_OPTIMAL, vk::AccessFlags::TRANSFER_READ),
                    ),
                );
            }

            pipeline_barrier(
                device,
                cmd,
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::FRAGMENT_SHADER,
                layout_barrier(
                    image,
                    0,
                    mip_levels,
                    (vk::ImageLayout::TRANSFER_SRC_OPTIMAL, vk::AccessFlags::TRANSFER_READ),
                    (vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL, vk::AccessFlags::SHADER_READ),
                ),
            );
        })
    }

    /// Destroy the view and image and return the memory to the allocator
    pub(crate) fn destroy(mut self, ctx: &GpuContext) {
        unsafe {
            ctx.device.destroy_image_view(self.view, None);
            if let Some(allocation) = self.allocation.take() {
                ctx.free(allocation);
            }
            ctx.device.destroy_image(self.image, None);
        }
    }
}

fn color_range(base_mip_level: u32, level_count: u32) -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        base_mip_level,
        level_count,
        base_array_layer: 0,
        layer_count: 1,
    }
}

fn color_layers(mip_level: u32) -> vk::ImageSubresourceLayers {
    vk::ImageSubresourceLayers {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        mip_level,
        base_array_layer: 0,
        layer_count: 1,
    }
}

/// Layout transition for a range of mip levels, as (layout, access) pairs
fn layout_barrier(
    image: vk::Image,
    base_mip_level: u32,
    level_count: u32,
    from: (vk::ImageLayout, vk::AccessFlags),
    to: (vk::ImageLayout, vk::AccessFlags),
) -> vk::ImageMemoryBarrier<'static> {
    vk::ImageMemoryBarrier::default()
        .old_layout(from.0)
        .src_access_mask(from.1)
        .new_layout(to.0)
        .dst_access_mask(to.1)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(color_range(base_mip_level, level_count))
}

unsafe fn pipeline_barrier(
    device: &ash::Device,
    cmd: vk::CommandBuffer,
    src_stage: vk::PipelineStageFlags,
    dst_stage: vk::PipelineStageFlags,
    barrier: vk::ImageMemoryBarrier<'_>,
) {
    device.cmd_pipeline_barrier(
        cmd,
        src_stage,
        dst_stage,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[barrier],
    );
}

/// Vulkan texture slot
pub(crate) struct Texture {
    ctx: Arc<GpuContext>,
    pub(crate) image: Option<TextureImage>,
    pub(crate) sampler_state: SamplerState,
    pub(crate) sampler: vk::Sampler,
}

impl Texture {
    /// An empty texture: no storage, no sampler yet
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Self {
        Self {
            ctx,
            image: None,
            sampler_state: SamplerState::default(),
            sampler: vk::Sampler::null(),
        }
    }

    /// Replace the storage, releasing the previous image if any
    pub(crate) fn set_image(&mut self, image: TextureImage) {
        self.release_image();
        self.image = Some(image);
    }

    /// Replace the sampler, destroying the previous one
    pub(crate) fn set_sampler(&mut self, sampler: vk::Sampler) {
        if self.sampler != vk::Sampler::null() {
            unsafe { self.ctx.device.destroy_sampler(self.sampler, None); }
        }
        self.sampler = sampler;
    }

    fn release_image(&mut self) {
        if let Some(image) = self.image.take() {
            image.destroy(&self.ctx);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.set_sampler(vk::Sampler::null());
        self.release_image();
    }
}
