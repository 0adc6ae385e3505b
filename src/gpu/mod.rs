//! wgpu drawing for star fields.
//!
//! One [`GpuContext`] (instance, adapter, device, queue) is shared by every
//! window. Each window gets a [`SurfaceTarget`] holding its surface, its own
//! pipeline and buffers. A frame is
//! [`begin_frame`](SurfaceTarget::begin_frame) →
//! [`draw_stars`](SurfaceTarget::draw_stars) → optional overlay passes →
//! [`Frame::present`].

#[cfg(feature = "egui")]
pub mod egui_integration;
mod shader;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::projection::StarInstance;
use shader::{Uniforms, STAR_SHADER};

const BACKGROUND: wgpu::Color = wgpu::Color::BLACK;
const MIN_INSTANCE_CAPACITY: usize = 64;
const STAR_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x2, // center
    1 => Float32,   // radius
    2 => Float32x3, // color
];

/// GPU objects shared by every surface.
pub struct GpuContext {
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Initialise wgpu against the first window and return the context along
    /// with that window's surface.
    pub async fn new(window: Arc<Window>) -> Result<(Self, wgpu::Surface<'static>), GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        tracing::info!(adapter = ?adapter.get_info().name, "using GPU adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Starfield Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        Ok((
            Self {
                instance,
                adapter,
                device,
                queue,
            },
            surface,
        ))
    }

    /// Create a surface for another window on the same device.
    pub fn create_surface(&self, window: Arc<Window>) -> Result<wgpu::Surface<'static>, GpuError> {
        Ok(self.instance.create_surface(window)?)
    }
}

/// One window's drawing state.
pub struct SurfaceTarget {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
}

impl SurfaceTarget {
    /// Configure `surface` for drawing stars.
    ///
    /// Fails with [`GpuError::IncompatibleSurface`] when the shared adapter
    /// cannot present to it, e.g. a monitor attached to another GPU.
    pub fn new(
        ctx: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        let device = &ctx.device;
        let surface_caps = surface.get_capabilities(&ctx.adapter);
        let (surface_format, alpha_mode) = choose_surface_format(&surface_caps)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(device, &config);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Star Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms::new(config.width, config.height)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Star Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Star Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Star Shader"),
            source: wgpu::ShaderSource::Wgsl(STAR_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Star Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Star Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &STAR_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let instance_buffer = create_instance_buffer(device, MIN_INSTANCE_CAPACITY);

        Ok(Self {
            surface,
            config,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            instance_capacity: MIN_INSTANCE_CAPACITY,
            instance_count: 0,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure for a new size. Zero-sized windows are ignored.
    pub fn resize(&mut self, ctx: &GpuContext, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.reconfigure(ctx);
        }
    }

    /// Re-apply the current configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self, ctx: &GpuContext) {
        self.surface.configure(&ctx.device, &self.config);
        ctx.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[Uniforms::new(self.config.width, self.config.height)]),
        );
    }

    /// Acquire the next surface texture and an encoder for it.
    pub fn begin_frame(&self, ctx: &GpuContext) -> Result<Frame, wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Star Encoder"),
            });
        Ok(Frame {
            output,
            view,
            encoder,
            prelude: Vec::new(),
        })
    }

    /// Clear the frame and draw every star in one instanced call.
    pub fn draw_stars(&mut self, ctx: &GpuContext, frame: &mut Frame, instances: &[StarInstance]) {
        self.upload_instances(ctx, instances);

        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Star Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if self.instance_count > 0 {
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            render_pass.draw(0..6, 0..self.instance_count);
        }
    }

    fn upload_instances(&mut self, ctx: &GpuContext, instances: &[StarInstance]) {
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&ctx.device, self.instance_capacity);
            tracing::debug!(capacity = self.instance_capacity, "grew star instance buffer");
        }
        if !instances.is_empty() {
            ctx.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
        self.instance_count = instances.len() as u32;
    }
}

/// Pick the surface format and alpha mode.
///
/// Star colours are authored as plain 8-bit values, so a non-sRGB format is
/// preferred to show them unaltered.
fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
) -> Result<(wgpu::TextureFormat, wgpu::CompositeAlphaMode), GpuError> {
    let format = caps
        .formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| caps.formats.first())
        .copied()
        .ok_or(GpuError::IncompatibleSurface)?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .ok_or(GpuError::IncompatibleSurface)?;
    Ok((format, alpha_mode))
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Star Instance Buffer"),
        size: (capacity * std::mem::size_of::<StarInstance>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// A frame being recorded.
pub struct Frame {
    output: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    /// Command buffers that must run before `encoder`.
    pub prelude: Vec<wgpu::CommandBuffer>,
}

impl Frame {
    /// Submit the recorded commands and show the frame.
    pub fn present(self, ctx: &GpuContext) {
        let commands = self
            .prelude
            .into_iter()
            .chain(std::iter::once(self.encoder.finish()));
        ctx.queue.submit(commands);
        self.output.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: Vec<wgpu::TextureFormat>,
        alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes,
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    #[test]
    fn test_prefers_non_srgb_format() {
        let caps = caps(
            vec![wgpu::TextureFormat::Bgra8UnormSrgb, wgpu::TextureFormat::Bgra8Unorm],
            vec![wgpu::CompositeAlphaMode::Opaque],
        );
        let (format, alpha) = choose_surface_format(&caps).unwrap();
        assert_eq!(format, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(alpha, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn test_falls_back_to_first_srgb_format() {
        let caps = caps(
            vec![wgpu::TextureFormat::Rgba8UnormSrgb],
            vec![wgpu::CompositeAlphaMode::Auto],
        );
        let (format, _) = choose_surface_format(&caps).unwrap();
        assert_eq!(format, wgpu::TextureFormat::Rgba8UnormSrgb);
    }

    #[test]
    fn test_surface_without_formats_is_incompatible() {
        let no_formats = caps(Vec::new(), vec![wgpu::CompositeAlphaMode::Opaque]);
        assert!(matches!(
            choose_surface_format(&no_formats),
            Err(GpuError::IncompatibleSurface)
        ));

        let no_alpha = caps(vec![wgpu::TextureFormat::Bgra8Unorm], Vec::new());
        assert!(matches!(
            choose_surface_format(&no_alpha),
            Err(GpuError::IncompatibleSurface)
        ));
    }
}
