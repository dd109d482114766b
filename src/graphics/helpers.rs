use std::sync::Arc;

use anyhow::Context;
use vulkano::{
    device::{
        physical::{PhysicalDevice, PhysicalDeviceType},
        Device, DeviceExtensions, QueueFlags,
    },
    format::Format,
    image::{view::ImageView, Image},
    instance::Instance,
    pipeline::{
        graphics::{
            color_blend::{ColorBlendAttachmentState, ColorBlendState},
            input_assembly::InputAssemblyState,
            multisample::MultisampleState,
            rasterization::RasterizationState,
            vertex_input::{Vertex, VertexDefinition},
            viewport::{Viewport, ViewportState},
            GraphicsPipelineCreateInfo,
        },
        layout::PipelineDescriptorSetLayoutCreateInfo,
        GraphicsPipeline, PipelineLayout, PipelineShaderStageCreateInfo,
    },
    render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass, Subpass},
    shader::ShaderModule,
    swapchain::{ColorSpace, Surface},
};

use super::shaders::VertexPositionColor;

pub fn select_physical_device(
    instance: &Arc<Instance>,
    surface: &Arc<Surface>,
    device_extensions: &DeviceExtensions,
) -> anyhow::Result<(Arc<PhysicalDevice>, u32)> {
    instance
        .enumerate_physical_devices()
        .context("enumerating physical devices")?
        .filter(|p| p.supported_extensions().contains(device_extensions))
        .filter_map(|p| {
            p.queue_family_properties()
                .iter()
                .enumerate()
                .position(|(i, q)| {
                    q.queue_flags.contains(QueueFlags::GRAPHICS)
                        && p.surface_support(i as u32, surface).unwrap_or(false)
                })
                .map(|q| (p, q as u32))
        })
        .min_by_key(|(p, _)| match p.properties().device_type {
            PhysicalDeviceType::DiscreteGpu => 0,
            PhysicalDeviceType::IntegratedGpu => 1,
            PhysicalDeviceType::VirtualGpu => 2,
            PhysicalDeviceType::Cpu => 3,
            _ => 4,
        })
        .context("Selecting Physical Device")
}

/// Prefers a UNORM surface format so scene colors go out as-is. Returns the
/// format and whether it is sRGB encoded.
pub fn select_surface_format(formats: &[(Format, ColorSpace)]) -> anyhow::Result<(Format, bool)> {
    let unorm = formats
        .iter()
        .find(|(format, _)| matches!(format, Format::B8G8R8A8_UNORM | Format::R8G8B8A8_UNORM));

    let (format, _) = unorm
        .or_else(|| formats.first())
        .context("surface reports no formats")?;

    let srgb = matches!(
        format,
        Format::B8G8R8A8_SRGB | Format::R8G8B8A8_SRGB | Format::A8B8G8R8_SRGB_PACK32
    );
    Ok((*format, srgb))
}

pub fn get_render_pass(device: Arc<Device>, format: Format) -> anyhow::Result<Arc<RenderPass>> {
    vulkano::single_pass_renderpass!(
        device,
        attachments: {
            color: {
                format: format,
                samples: 1,
                load_op: Clear,
                store_op: Store,
            },
        },
        pass: {
            color: [color],
            depth_stencil: {},
        },
    )
    .context("Creating RenderPass")
}

pub fn get_framebuffers(
    images: &[Arc<Image>],
    render_pass: Arc<RenderPass>,
) -> anyhow::Result<Vec<Arc<Framebuffer>>> {
    images
        .iter()
        .map(|image| {
            let view = ImageView::new_default(image.clone())?;
            Framebuffer::new(
                render_pass.clone(),
                FramebufferCreateInfo {
                    attachments: vec![view],
                    ..Default::default()
                },
            )
            .context("Creating Framebuffer")
        })
        .collect::<anyhow::Result<Vec<Arc<Framebuffer>>>>()
}

pub fn get_pipeline(
    device: Arc<Device>,
    vs: Arc<ShaderModule>,
    fs: Arc<ShaderModule>,
    render_pass: Arc<RenderPass>,
    viewport: Viewport,
) -> anyhow::Result<Arc<GraphicsPipeline>> {
    let vs = vs.entry_point("main").context("getting vs entry point")?;
    let fs = fs.entry_point("main").context("getting fs entry point")?;

    let vertex_input_state = VertexPositionColor::per_vertex()
        .definition(&vs.info().input_interface)
        .context("creating vertex input state")?;

    let stages = [
        PipelineShaderStageCreateInfo::new(vs),
        PipelineShaderStageCreateInfo::new(fs),
    ];

    let layout = PipelineLayout::new(
        device.clone(),
        PipelineDescriptorSetLayoutCreateInfo::from_stages(&stages)
            .into_pipeline_layout_create_info(device.clone())
            .context("creating pipeline layout info")?,
    )?;

    let subpass =
        Subpass::from(render_pass.clone(), 0).context("getting subpass from renderpass")?;

    GraphicsPipeline::new(
        device.clone(),
        None,
        GraphicsPipelineCreateInfo {
            stages: stages.into_iter().collect(),
            vertex_input_state: Some(vertex_input_state),
            input_assembly_state: Some(InputAssemblyState::default()),
            viewport_state: Some(ViewportState {
                viewports: [viewport].into_iter().collect(),
                ..Default::default()
            }),
            rasterization_state: Some(RasterizationState::default()),
            multisample_state: Some(MultisampleState::default()),
            color_blend_state: Some(ColorBlendState::with_attachment_states(
                subpass.num_color_attachments(),
                ColorBlendAttachmentState::default(),
            )),
            subpass: Some(subpass.into()),
            ..GraphicsPipelineCreateInfo::layout(layout)
        },
    )
    .context("Creating Pipeline")
}
