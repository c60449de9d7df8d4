use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::canvas::BufferStrategy;
use crate::coords::Size;
use crate::surface::PixelBuffer;

use super::surface::frame_format;
use super::{Gpu, GpuInit};

/// Frame texture and the bind group sampling it.
struct FrameTexture {
    size: Size,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// [`BufferStrategy`] that shows canvas frames in a window.
///
/// Each `show` uploads the device-sized back buffer into a texture and
/// draws it over the swapchain image with a fullscreen triangle.
pub struct GpuPresenter {
    window: Arc<Window>,
    gpu: Gpu,
    showing: bool,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    frame: Option<FrameTexture>,
}

impl GpuPresenter {
    /// Creates the device and blit pipeline for `window`.
    pub async fn new(window: Arc<Window>, init: &GpuInit) -> Result<Self> {
        let gpu = Gpu::new(Arc::clone(&window), init)
            .await
            .context("failed to initialize GPU")?;
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("kiln blit shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("kiln blit bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("kiln blit pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("kiln blit pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
            multiview_mask: None,
            cache: None,
        });

        // The back buffer is already device-sized; scaling happens on the CPU.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("kiln blit sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        log::info!(
            "presenter ready ({:?}, {}x{})",
            gpu.surface_format(),
            gpu.size().width,
            gpu.size().height
        );

        Ok(Self {
            window,
            gpu,
            showing: true,
            pipeline,
            bind_group_layout,
            sampler,
            frame: None,
        })
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    fn ensure_frame_texture(&mut self, size: Size) {
        if self.frame.as_ref().is_some_and(|f| f.size == size) {
            return;
        }

        let device = self.gpu.device();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("kiln frame texture"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: frame_format(self.gpu.surface_format()),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kiln frame bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        log::debug!("frame texture {}x{}", size.width, size.height);
        self.frame = Some(FrameTexture { size, texture, bind_group });
    }
}

impl BufferStrategy for GpuPresenter {
    fn is_showing(&self) -> bool {
        self.showing
    }

    fn set_showing(&mut self, showing: bool) {
        self.showing = showing;
    }

    fn parent_size(&self) -> Size {
        self.gpu.size()
    }

    fn resize(&mut self, size: Size) {
        self.gpu.resize(size);
    }

    fn show(&mut self, back: &PixelBuffer) -> Result<()> {
        let size = back.size();
        if size.is_empty() {
            return Ok(());
        }

        self.ensure_frame_texture(size);
        let Some(frame_tex) = self.frame.as_ref() else {
            return Ok(());
        };
        self.gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &frame_tex.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            back.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
        );

        let Some(mut frame) = self.gpu.acquire()? else {
            return Ok(());
        };

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("kiln blit"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &frame_tex.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);
        Ok(())
    }
}
