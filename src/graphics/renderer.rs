use std::sync::Arc;

use anyhow::Context;
use log::{error, info};
use tracing::{event, span, Level};

#[cfg(target_os = "macos")]
use vulkano::instance::InstanceCreateFlags;

use vulkano::{
    buffer::{
        allocator::{SubbufferAllocator, SubbufferAllocatorCreateInfo},
        BufferUsage,
    },
    command_buffer::{
        allocator::StandardCommandBufferAllocator, AutoCommandBufferBuilder,
        CommandBufferExecFuture, CommandBufferUsage, PrimaryAutoCommandBuffer,
        RenderPassBeginInfo, SubpassBeginInfo, SubpassContents,
    },
    device::{Device, DeviceCreateInfo, DeviceExtensions, Queue, QueueCreateInfo},
    image::ImageUsage,
    instance::{Instance, InstanceCreateInfo, InstanceExtensions},
    memory::allocator::{MemoryTypeFilter, StandardMemoryAllocator},
    pipeline::{graphics::viewport::Viewport, GraphicsPipeline},
    render_pass::{Framebuffer, RenderPass},
    shader::ShaderModule,
    swapchain::{
        self, PresentFuture, Surface, Swapchain, SwapchainAcquireFuture, SwapchainCreateInfo,
        SwapchainPresentInfo,
    },
    sync::{
        self,
        future::{FenceSignalFuture, JoinFuture},
        GpuFuture,
    },
    Validated, VulkanError,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::plot::Scene;

use super::{helpers, shaders};

/// Fence signalled once a presented frame is done with its swapchain image.
type FrameFence = FenceSignalFuture<
    PresentFuture<CommandBufferExecFuture<JoinFuture<Box<dyn GpuFuture>, SwapchainAcquireFuture>>>,
>;

/// Draws a [`Scene`] into the window's swapchain.
pub struct Renderer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    swapchain: Arc<Swapchain>,
    srgb: bool,

    viewport: Viewport,
    window_resized: bool,
    dimensions: PhysicalSize<u32>,
    need_swapchain_recreation: bool,

    vs: Arc<ShaderModule>,
    fs: Arc<ShaderModule>,
    render_pass: Arc<RenderPass>,
    framebuffers: Vec<Arc<Framebuffer>>,
    pipeline: Arc<GraphicsPipeline>,

    command_buffer_allocator: StandardCommandBufferAllocator,
    vertex_buffer_allocator: SubbufferAllocator,

    /// One slot per swapchain image.
    in_flight: Vec<Option<Arc<FrameFence>>>,
    last_image: usize,
}

impl Renderer {
    pub fn new(extensions: InstanceExtensions, window: Arc<Window>) -> anyhow::Result<Self> {
        let library = vulkano::VulkanLibrary::new().context("no local Vulkan library/DLL")?;

        let create_info = InstanceCreateInfo {
            #[cfg(target_os = "macos")]
            flags: InstanceCreateFlags::ENUMERATE_PORTABILITY,
            enabled_extensions: InstanceExtensions {
                #[cfg(target_os = "macos")]
                khr_portability_enumeration: true,
                ..extensions
            },
            ..Default::default()
        };

        let instance = Instance::new(library, create_info).context("creating instance")?;

        let surface = Surface::from_window(instance.clone(), window.clone())?;

        let device_extensions = DeviceExtensions {
            khr_swapchain: true,
            ..DeviceExtensions::empty()
        };

        let (physical_device, queue_family_index) =
            helpers::select_physical_device(&instance, &surface, &device_extensions)?;

        info!(
            "Current Graphics Device is {}",
            physical_device.properties().device_name
        );

        let (device, mut queues) = Device::new(
            physical_device.clone(),
            DeviceCreateInfo {
                queue_create_infos: vec![QueueCreateInfo {
                    queue_family_index,
                    ..Default::default()
                }],
                enabled_extensions: device_extensions,
                ..Default::default()
            },
        )
        .context("creating logical device")?;

        let queue = queues.next().context("getting a queue")?;

        let dimensions = window.inner_size();

        let (swapchain, images, srgb) = {
            let caps = physical_device
                .surface_capabilities(&surface, Default::default())
                .context("getting surface capabilities")?;

            let composite_alpha = caps
                .supported_composite_alpha
                .into_iter()
                .next()
                .context("getting supported composite alpha")?;
            let (image_format, srgb) = helpers::select_surface_format(
                &physical_device
                    .surface_formats(&surface, Default::default())
                    .context("getting surface formats")?,
            )?;

            let (swapchain, images) = Swapchain::new(
                device.clone(),
                surface,
                SwapchainCreateInfo {
                    min_image_count: caps.min_image_count,
                    image_format,
                    image_extent: dimensions.into(),
                    image_usage: ImageUsage::COLOR_ATTACHMENT,
                    composite_alpha,
                    ..Default::default()
                },
            )
            .context("creating swapchain")?;

            (swapchain, images, srgb)
        };

        let render_pass = helpers::get_render_pass(device.clone(), swapchain.image_format())?;
        let framebuffers = helpers::get_framebuffers(&images, render_pass.clone())?;

        let vs = shaders::vs::load(device.clone()).context("failed to create shader module")?;
        let fs = shaders::fs::load(device.clone()).context("failed to create shader module")?;

        let viewport = Viewport {
            offset: [0.0, 0.0],
            extent: dimensions.into(),
            depth_range: 0.0..=1.0,
        };

        let pipeline = helpers::get_pipeline(
            device.clone(),
            vs.clone(),
            fs.clone(),
            render_pass.clone(),
            viewport.clone(),
        )?;

        let memory_allocator = Arc::new(StandardMemoryAllocator::new_default(device.clone()));

        let vertex_buffer_allocator = SubbufferAllocator::new(
            memory_allocator,
            SubbufferAllocatorCreateInfo {
                buffer_usage: BufferUsage::VERTEX_BUFFER,
                memory_type_filter: MemoryTypeFilter::PREFER_DEVICE
                    | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                ..Default::default()
            },
        );

        let command_buffer_allocator =
            StandardCommandBufferAllocator::new(device.clone(), Default::default());

        let frames_in_flight = images.len();

        Ok(Renderer {
            device,
            queue,
            swapchain,
            srgb,
            viewport,
            window_resized: false,
            dimensions,
            need_swapchain_recreation: false,
            vs,
            fs,
            render_pass,
            framebuffers,
            pipeline,
            command_buffer_allocator,
            vertex_buffer_allocator,
            in_flight: vec![None; frames_in_flight],
            last_image: 0,
        })
    }

    pub fn window_resized(&mut self, new_size: PhysicalSize<u32>) {
        self.window_resized = true;
        self.dimensions = new_size;
    }

    pub fn draw(&mut self, scene: &Scene) -> anyhow::Result<()> {
        let is_zero_sized_window = self.dimensions.height == 0 || self.dimensions.width == 0;
        if is_zero_sized_window {
            return Ok(());
        }

        if self.window_resized || self.need_swapchain_recreation {
            self.resize_swapchain()?;
        }

        let acquire_image = span!(Level::INFO, "acquiring swapchain image").entered();
        let (image_i, suboptimal, acquire_future) =
            match swapchain::acquire_next_image(self.swapchain.clone(), None)
                .map_err(Validated::unwrap)
            {
                Ok(r) => r,
                Err(VulkanError::OutOfDate) => {
                    self.need_swapchain_recreation = true;
                    return Ok(());
                }
                Err(e) => return Err(e).context("acquiring next swapchain image"),
            };

        if suboptimal {
            self.need_swapchain_recreation = true;
        }
        acquire_image.exit();

        let image = image_i as usize;
        let previous_future = self.wait_for_image(image)?;
        let command_buffer = self.record(image, scene)?;

        let span = span!(Level::INFO, "present").entered();
        let future = previous_future
            .join(acquire_future)
            .then_execute(self.queue.clone(), command_buffer)?
            .then_swapchain_present(
                self.queue.clone(),
                SwapchainPresentInfo::swapchain_image_index(self.swapchain.clone(), image_i),
            )
            .then_signal_fence_and_flush();
        span.exit();

        self.in_flight[image] = match future.map_err(Validated::unwrap) {
            #[allow(clippy::arc_with_non_send_sync)]
            Ok(fence) => Some(Arc::new(fence)),
            Err(VulkanError::OutOfDate) => {
                self.need_swapchain_recreation = true;
                None
            }
            Err(e) => {
                error!("failed to flush frame: {:#?}", e);
                None
            }
        };

        self.last_image = image;
        Ok(())
    }

    /// Blocks until `image` is free again and returns the future the next
    /// submission has to follow.
    fn wait_for_image(&self, image: usize) -> anyhow::Result<Box<dyn GpuFuture>> {
        let _fence_wait = span!(Level::INFO, "awaiting fence").entered();
        if let Some(fence) = &self.in_flight[image] {
            fence.wait(None)?;
        }

        Ok(match self.in_flight[self.last_image].clone() {
            Some(fence) => fence.boxed(),
            None => {
                let mut now = sync::now(self.device.clone());
                now.cleanup_finished();
                now.boxed()
            }
        })
    }

    /// Uploads the scene's triangles and records one pass drawing them.
    fn record(
        &self,
        image: usize,
        scene: &Scene,
    ) -> anyhow::Result<Arc<PrimaryAutoCommandBuffer>> {
        let size = [
            self.dimensions.width as f32,
            self.dimensions.height as f32,
        ];
        let vertices = shaders::scene_vertices(scene, size, self.srgb);

        let mut builder = AutoCommandBufferBuilder::primary(
            &self.command_buffer_allocator,
            self.queue.queue_family_index(),
            CommandBufferUsage::OneTimeSubmit,
        )?;

        let [r, g, b] = scene.background();
        let clear = [r, g, b, 1.0];

        builder
            .begin_render_pass(
                RenderPassBeginInfo {
                    clear_values: vec![Some(clear.into())],
                    ..RenderPassBeginInfo::framebuffer(self.framebuffers[image].clone())
                },
                SubpassBeginInfo {
                    contents: SubpassContents::Inline,
                    ..Default::default()
                },
            )?
            .bind_pipeline_graphics(self.pipeline.clone())?;

        if !vertices.is_empty() {
            let vertex_buffer = self
                .vertex_buffer_allocator
                .allocate_slice::<shaders::VertexPositionColor>(vertices.len() as _)?;
            vertex_buffer.write()?.copy_from_slice(&vertices);

            event!(Level::DEBUG, vertices = vertices.len(), "drawing scene");
            builder
                .bind_vertex_buffers(0, vertex_buffer)?
                .draw(vertices.len() as u32, 1, 0, 0)?;
        }

        builder.end_render_pass(Default::default())?;
        builder.build().context("building scene command buffer")
    }

    fn resize_swapchain(&mut self) -> anyhow::Result<()> {
        let _resize_swapchain = span!(Level::INFO, "resizing swapchain").entered();
        event!(Level::INFO, "recreating swapchain");
        self.need_swapchain_recreation = false;

        let (new_swapchain, new_images) = self
            .swapchain
            .recreate(SwapchainCreateInfo {
                image_extent: self.dimensions.into(),
                ..self.swapchain.create_info()
            })
            .context("failed to recreate swapchain")?;

        self.swapchain = new_swapchain;
        self.framebuffers = helpers::get_framebuffers(&new_images, self.render_pass.clone())
            .context("recreating framebuffers")?;

        if self.window_resized {
            self.window_resized = false;
            self.viewport.extent = self.dimensions.into();
            self.pipeline = helpers::get_pipeline(
                self.device.clone(),
                self.vs.clone(),
                self.fs.clone(),
                self.render_pass.clone(),
                self.viewport.clone(),
            )?;
        }

        Ok(())
    }
}
