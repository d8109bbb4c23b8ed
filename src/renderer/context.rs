//! GPU renderer
//!
//! Owns the wgpu surface, the batched pipelines, and the per-frame
//! submission path. Batches arrive as CPU vertex lists with texture ids; the
//! renderer resolves ids to registered views, binds them as a slot array,
//! and draws. Texture id zero is always the white fallback.

use std::num::NonZeroU32;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::batch::{DrawBatch, PrimitiveBatch, SpriteBatch, MAX_TEXTURE_SLOTS};
use super::camera::Camera2D;
use super::text::{Font, GlyphCache};
use super::texture::Texture;
use super::vertex::QuadVertex;
use crate::assets::AssetHandle;

/// Texture id reserved for the 1x1 white fallback
pub const WHITE_TEXTURE: u64 = 0;

/// Uniform buffer for the camera matrices
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Main 2D renderer
pub struct Renderer2d {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: (u32, u32),
    sprite_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: AssetHandle<Texture>,
    /// Registered textures by handle id
    textures: FxHashMap<u64, AssetHandle<Texture>>,
    glyphs: GlyphCache,
    /// Draw calls issued in the last frame
    pub draw_calls: usize,
    /// Clear color
    pub clear_color: wgpu::Color,
}

impl Renderer2d {
    /// Create a new renderer bound to a window
    pub async fn new(window: Arc<Window>, vsync: bool) -> Self {
        let size = window.inner_size();
        let size = (size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find GPU adapter");

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Renderer Device"),
                    required_features: wgpu::Features::TEXTURE_BINDING_ARRAY
                        | wgpu::Features::SAMPLED_TEXTURE_AND_STORAGE_BUFFER_ARRAY_NON_UNIFORM_INDEXING,
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.0,
            height: size.1,
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Batched 2D Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader2d.wgsl").into()),
        });

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Slot Array Layout"),
                entries: &[
                    // Texture slot array
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: NonZeroU32::new(MAX_TEXTURE_SLOTS as u32),
                    },
                    // Shared sampler
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Batched Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[QuadVertex::layout()],
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
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        };

        let sprite_pipeline = make_pipeline("Sprite Pipeline", wgpu::PrimitiveTopology::TriangleList);
        let line_pipeline = make_pipeline("Line Pipeline", wgpu::PrimitiveTopology::LineList);
        let point_pipeline = make_pipeline("Point Pipeline", wgpu::PrimitiveTopology::PointList);

        let sampler = Texture::atlas_sampler(&device);
        let white = AssetHandle::new(Texture::white(&device, &queue));

        let mut textures = FxHashMap::default();
        textures.insert(WHITE_TEXTURE, white.clone());

        Self {
            surface,
            device,
            queue,
            config,
            size,
            sprite_pipeline,
            line_pipeline,
            point_pipeline,
            camera_buffer,
            camera_bind_group,
            texture_bind_group_layout,
            sampler,
            white,
            textures,
            glyphs: GlyphCache::new(),
            draw_calls: 0,
            clear_color: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.08,
                a: 1.0,
            },
        }
    }

    /// Get the device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Get the queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Surface size in pixels
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Handle a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Make a loaded texture addressable by the batcher
    pub fn register_texture(&mut self, handle: &AssetHandle<Texture>) {
        self.textures.insert(handle.id(), handle.clone());
    }

    /// Upload camera matrices for this frame
    pub fn update_camera(&self, camera: &Camera2D) {
        let uniform = CameraUniform {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Queue a text run, rasterizing and registering glyph textures on
    /// demand. Returns the pen advance.
    #[allow(clippy::too_many_arguments)]
    pub fn queue_text(
        &mut self,
        batch: &mut SpriteBatch,
        font: &Font,
        content: &str,
        origin: Vec2,
        font_size: f32,
        color: [f32; 4],
    ) -> f32 {
        let Self {
            device,
            queue,
            textures,
            glyphs,
            ..
        } = self;
        let mut upload = |coverage: &[u8], dimensions: (u32, u32)| -> u64 {
            let texture = Texture::from_coverage(device, queue, coverage, dimensions, Some("glyph"));
            let handle = AssetHandle::new(texture);
            let id = handle.id();
            textures.insert(id, handle);
            id
        };
        super::text::queue_text(
            batch, glyphs, font, content, origin, font_size, color, &mut upload,
        )
    }

    /// Build the slot-array bind group for one submission.
    ///
    /// Unregistered ids fall back to the white texture, so a stale handle
    /// degrades to an untextured quad instead of failing the bind.
    fn texture_array_bind_group(&self, slots: &[u64]) -> wgpu::BindGroup {
        let mut views: Vec<&wgpu::TextureView> = Vec::with_capacity(MAX_TEXTURE_SLOTS);
        for &id in slots.iter().take(MAX_TEXTURE_SLOTS) {
            let view = self
                .textures
                .get(&id)
                .map(|t| &t.get().view)
                .unwrap_or(&self.white.get().view);
            views.push(view);
        }
        while views.len() < MAX_TEXTURE_SLOTS {
            views.push(&self.white.get().view);
        }

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Slot Array"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureViewArray(&views),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Render the frame: every quad submission in order, then lines, then
    /// points. Returns early when the surface is lost.
    pub fn render(&mut self, batches: &[DrawBatch], primitives: &PrimitiveBatch) {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {e:?}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Buffers and bind groups must outlive the pass
        let mut gpu_batches = Vec::with_capacity(batches.len());
        for batch in batches {
            if batch.vertices.is_empty() {
                continue;
            }
            let vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Batch Vertex Buffer"),
                    contents: bytemuck::cast_slice(&batch.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            let index_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Batch Index Buffer"),
                    contents: bytemuck::cast_slice(&batch.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
            let bind_group = self.texture_array_bind_group(&batch.textures);
            gpu_batches.push((vertex_buffer, index_buffer, batch.indices.len() as u32, bind_group));
        }

        let primitive_buffers: Vec<(wgpu::Buffer, u32, &wgpu::RenderPipeline)> =
            [
                (&primitives.lines, &self.line_pipeline),
                (&primitives.points, &self.point_pipeline),
            ]
            .into_iter()
            .filter(|(vertices, _)| !vertices.is_empty())
            .map(|(vertices, pipeline)| {
                let buffer = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Primitive Vertex Buffer"),
                        contents: bytemuck::cast_slice(vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                (buffer, vertices.len() as u32, pipeline)
            })
            .collect();
        let primitive_bind_group = self.texture_array_bind_group(&[WHITE_TEXTURE]);

        self.draw_calls = 0;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Batched Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.sprite_pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for (vertex_buffer, index_buffer, index_count, bind_group) in &gpu_batches {
                pass.set_bind_group(1, bind_group, &[]);
                pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..*index_count, 0, 0..1);
                self.draw_calls += 1;
            }

            for (buffer, count, pipeline) in &primitive_buffers {
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(1, &primitive_bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..*count, 0..1);
                self.draw_calls += 1;
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
