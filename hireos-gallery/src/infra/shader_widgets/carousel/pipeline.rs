//! GPU side of the carousel: meshes, pipelines and per-scene resources

use std::collections::{HashMap, HashSet};

use bytemuck::{Pod, Zeroable};
use iced::advanced::graphics::Viewport;
use iced::widget::shader::Pipeline;
use iced::{Rectangle, wgpu};
use wgpu::util::DeviceExt;

use crate::domains::gallery::handle::take_retired_scenes;
use crate::domains::gallery::scene::{FrameSnapshot, SceneId};
use crate::infra::constants::card as card_cfg;
use crate::infra::image_loader::MipLevel;

/// Per-card uniforms
///
/// Total size: 176 bytes (11 * 16 bytes, all 16-byte aligned)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CardUniforms {
    /// Camera view-projection (offset 0, size 64)
    pub view_projection: [f32; 16],
    /// Card model matrix (offset 64, size 64)
    pub model: [f32; 16],
    /// Card size in world units (offset 128, size 8)
    pub plane_size: [f32; 2],
    /// Source image size in pixels, zero until loaded (offset 136, size 8)
    pub image_size: [f32; 2],
    /// [corner_radius, hover_blend, speed, time] (offset 144, size 16)
    pub params: [f32; 4],
    /// Fill used while no image is bound (offset 160, size 16)
    pub backdrop: [f32; 4],
}

const _: () = assert!(
    std::mem::size_of::<CardUniforms>() == 176,
    "CardUniforms must be 176 bytes"
);

/// Per-label uniforms (128 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LabelUniforms {
    pub view_projection: [f32; 16],
    pub model: [f32; 16],
}

const _: () = assert!(
    std::mem::size_of::<LabelUniforms>() == 128,
    "LabelUniforms must be 128 bytes"
);

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Unit plane centred on the origin in the XY plane, `uv` (0,0) at the
/// top-left corner.
pub fn plane_mesh(
    width_segments: u32,
    height_segments: u32,
) -> (Vec<Vertex>, Vec<u32>) {
    let columns = width_segments.max(1);
    let rows = height_segments.max(1);
    let mut vertices =
        Vec::with_capacity(((columns + 1) * (rows + 1)) as usize);
    for iy in 0..=rows {
        let v = iy as f32 / rows as f32;
        for ix in 0..=columns {
            let u = ix as f32 / columns as f32;
            vertices.push(Vertex {
                position: [u - 0.5, 0.5 - v, 0.0],
                uv: [u, v],
            });
        }
    }

    let stride = columns + 1;
    let mut indices = Vec::with_capacity((columns * rows * 6) as usize);
    for iy in 0..rows {
        for ix in 0..columns {
            let a = iy * stride + ix;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    (vertices, indices)
}

#[derive(Debug)]
struct Mesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    fn new(device: &wgpu::Device, label: &str, segments: (u32, u32)) -> Self {
        let (vertices, indices) = plane_mesh(segments.0, segments.1);
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertices: vertex_buffer,
            indices: index_buffer,
            index_count: indices.len() as u32,
        }
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertices.slice(..));
        render_pass.set_index_buffer(
            self.indices.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[derive(Debug)]
struct TextureBinding {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Uniform buffers for one ring slot.
#[derive(Debug)]
struct Slot {
    card_buffer: wgpu::Buffer,
    card_bind_group: wgpu::BindGroup,
    label_buffer: wgpu::Buffer,
    label_bind_group: wgpu::BindGroup,
}

#[derive(Debug, Clone, Copy)]
struct DrawCommand {
    slot: usize,
    image: Option<u64>,
    label: Option<u64>,
}

/// Physical widget rectangle plus the full surface, for viewport setup.
#[derive(Debug, Clone, Copy)]
struct DrawTarget {
    bounds: [f32; 4],
    surface: [f32; 2],
}

#[derive(Debug, Default)]
struct SceneResources {
    slots: Vec<Slot>,
    images: HashMap<u64, TextureBinding>,
    labels: HashMap<u64, TextureBinding>,
    draws: Vec<DrawCommand>,
    target: Option<DrawTarget>,
}

#[derive(Debug)]
pub struct CarouselPipeline {
    card_pipeline: wgpu::RenderPipeline,
    label_pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    card_mesh: Mesh,
    label_mesh: Mesh,
    blank: TextureBinding,
    scenes: HashMap<SceneId, SceneResources>,
}

impl Pipeline for CarouselPipeline {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
    ) -> Self {
        CarouselPipeline::create(device, queue, format)
    }
}

impl CarouselPipeline {
    pub fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
    ) -> Self {
        let uniform_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Carousel Uniforms"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Carousel Texture"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(
                            wgpu::SamplerBindingType::Filtering,
                        ),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float {
                                filterable: true,
                            },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                ],
            });

        let layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Carousel Pipeline Layout"),
                bind_group_layouts: &[&uniform_layout, &texture_layout],
                push_constant_ranges: &[],
            });

        let card_shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Carousel Card Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../shaders/carousel_card.wgsl").into(),
                ),
            });
        let label_shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Carousel Label Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../shaders/carousel_label.wgsl").into(),
                ),
            });

        let card_pipeline = render_pipeline(
            device,
            "Carousel Card Pipeline",
            &layout,
            &card_shader,
            format,
        );
        let label_pipeline = render_pipeline(
            device,
            "Carousel Label Pipeline",
            &layout,
            &label_shader,
            format,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Carousel Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let blank_pixel = MipLevel {
            width: 1,
            height: 1,
            pixels: vec![0; 4],
        };
        let blank = upload_texture(
            device,
            queue,
            &texture_layout,
            &sampler,
            "Carousel Blank Texture",
            std::slice::from_ref(&blank_pixel),
        );

        log::debug!("Created carousel pipeline for {format:?}");

        Self {
            card_pipeline,
            label_pipeline,
            card_mesh: Mesh::new(
                device,
                "Carousel Card",
                (
                    card_cfg::MESH_WIDTH_SEGMENTS,
                    card_cfg::MESH_HEIGHT_SEGMENTS,
                ),
            ),
            label_mesh: Mesh::new(device, "Carousel Label", (1, 1)),
            uniform_layout,
            texture_layout,
            sampler,
            blank,
            scenes: HashMap::new(),
        }
    }

    /// Number of scenes currently holding GPU resources.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn release_scene(&mut self, scene: SceneId) {
        if self.scenes.remove(&scene).is_some() {
            log::debug!("Released GPU resources of scene {}", scene.get());
        }
    }

    /// Release every scene destroyed since the last call.
    pub fn release_retired(&mut self) {
        for retired in take_retired_scenes() {
            self.release_scene(retired);
        }
    }

    /// Upload uniforms and any new textures for `snapshot`.
    pub fn prepare_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        snapshot: &FrameSnapshot,
        bounds: &Rectangle,
        viewport: &Viewport,
    ) {
        self.release_retired();

        let scale = viewport.scale_factor() as f32;
        let surface = viewport.physical_size();
        let view_projection = snapshot.view_projection.to_cols_array();

        let resources = self.scenes.entry(snapshot.scene).or_default();
        resources.target = Some(DrawTarget {
            bounds: [
                bounds.x * scale,
                bounds.y * scale,
                bounds.width * scale,
                bounds.height * scale,
            ],
            surface: [surface.width as f32, surface.height as f32],
        });

        while resources.slots.len() < snapshot.cards.len() {
            resources.slots.push(create_slot(device, &self.uniform_layout));
        }
        resources.slots.truncate(snapshot.cards.len());

        resources.draws.clear();
        let mut used_images = HashSet::new();
        let mut used_labels = HashSet::new();

        for (index, card) in snapshot.cards.iter().enumerate() {
            let slot = &resources.slots[index];

            let image_size = card.image.as_ref().map_or([0.0, 0.0], |image| {
                [image.width as f32, image.height as f32]
            });
            let uniforms = CardUniforms {
                view_projection,
                model: card.model.to_cols_array(),
                plane_size: card.plane_size.to_array(),
                image_size,
                params: [
                    card.corner_radius,
                    card.hover_blend,
                    card.speed,
                    card.time,
                ],
                backdrop: card_cfg::BACKDROP_RGBA,
            };
            queue.write_buffer(
                &slot.card_buffer,
                0,
                bytemuck::bytes_of(&uniforms),
            );

            let image = card.image.as_ref().map(|image| {
                used_images.insert(image.id);
                resources.images.entry(image.id).or_insert_with(|| {
                    log::debug!(
                        "Uploading card texture {} ({}x{})",
                        image.id,
                        image.width,
                        image.height
                    );
                    upload_texture(
                        device,
                        queue,
                        &self.texture_layout,
                        &self.sampler,
                        "Carousel Card Texture",
                        &image.levels,
                    )
                });
                image.id
            });

            let label = card.label.as_ref().map(|label| {
                let uniforms = LabelUniforms {
                    view_projection,
                    model: label.model.to_cols_array(),
                };
                queue.write_buffer(
                    &slot.label_buffer,
                    0,
                    bytemuck::bytes_of(&uniforms),
                );
                let bitmap = &label.bitmap;
                used_labels.insert(bitmap.id);
                resources.labels.entry(bitmap.id).or_insert_with(|| {
                    let level = MipLevel {
                        width: bitmap.width,
                        height: bitmap.height,
                        pixels: bitmap.pixels.clone(),
                    };
                    upload_texture(
                        device,
                        queue,
                        &self.texture_layout,
                        &self.sampler,
                        "Carousel Label Texture",
                        std::slice::from_ref(&level),
                    )
                });
                bitmap.id
            });

            resources.draws.push(DrawCommand {
                slot: index,
                image,
                label,
            });
        }

        resources.images.retain(|id, _| used_images.contains(id));
        resources.labels.retain(|id, _| used_labels.contains(id));
    }

    /// Record the prepared frame of `scene`. Returns `false` if nothing was
    /// prepared for it.
    pub fn draw_frame(
        &self,
        scene: SceneId,
        render_pass: &mut wgpu::RenderPass<'_>,
    ) -> bool {
        let Some(resources) = self.scenes.get(&scene) else {
            return false;
        };
        let Some(target) = resources.target else {
            return false;
        };
        let [x, y, width, height] = target.bounds;
        if width <= 0.0 || height <= 0.0 {
            return false;
        }

        render_pass.set_viewport(x, y, width, height, 0.0, 1.0);

        for command in &resources.draws {
            let Some(slot) = resources.slots.get(command.slot) else {
                continue;
            };

            let texture = command
                .image
                .and_then(|id| resources.images.get(&id))
                .unwrap_or(&self.blank);
            render_pass.set_pipeline(&self.card_pipeline);
            render_pass.set_bind_group(0, &slot.card_bind_group, &[]);
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            self.card_mesh.draw(render_pass);

            if let Some(label) =
                command.label.and_then(|id| resources.labels.get(&id))
            {
                render_pass.set_pipeline(&self.label_pipeline);
                render_pass.set_bind_group(0, &slot.label_bind_group, &[]);
                render_pass.set_bind_group(1, &label.bind_group, &[]);
                self.label_mesh.draw(render_pass);
            }
        }

        let [surface_width, surface_height] = target.surface;
        render_pass.set_viewport(
            0.0,
            0.0,
            surface_width,
            surface_height,
            0.0,
            1.0,
        );
        true
    }
}

fn render_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
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
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        // Ring order decides overlap; no depth attachment.
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn create_slot(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Slot {
    let uniform = |label: &str, size: usize| {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        (buffer, bind_group)
    };

    let (card_buffer, card_bind_group) = uniform(
        "Carousel Card Uniforms",
        std::mem::size_of::<CardUniforms>(),
    );
    let (label_buffer, label_bind_group) = uniform(
        "Carousel Label Uniforms",
        std::mem::size_of::<LabelUniforms>(),
    );
    Slot {
        card_buffer,
        card_bind_group,
        label_buffer,
        label_bind_group,
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    levels: &[MipLevel],
) -> TextureBinding {
    let (width, height) = levels
        .first()
        .map_or((1, 1), |level| (level.width.max(1), level.height.max(1)));

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: levels.len().max(1) as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (mip, level) in levels.iter().enumerate() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: mip as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &level.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(level.width * 4),
                rows_per_image: Some(level.height),
            },
            wgpu::Extent3d {
                width: level.width,
                height: level.height,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&view),
            },
        ],
    });

    TextureBinding {
        _texture: texture,
        bind_group,
    }
}
