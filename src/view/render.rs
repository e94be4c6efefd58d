use wgpu::*;
use wgpu::util::DeviceExt;

use crate::config::DemoConfig;
use crate::controller::{FrameUniforms, LightingUniform, TransformUniform};
use crate::utils::{self, MeshBuffer, Vertex};
use crate::view::GpuContext;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Facing marker radius
const MARKER_RADIUS: f32 = 0.45;

// Shared graphics setup
pub struct CameraResources {
    pub camera_buffer: wgpu::Buffer,
    pub lighting_buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub camera_bind_group: wgpu::BindGroup,
}

/// Per-object transform uniform and its bind group
pub struct ObjectResources {
    pub transform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

pub struct PipelineResources {
    pub lit_pipeline: wgpu::RenderPipeline,
    pub line_pipeline: wgpu::RenderPipeline,
    pub object_bind_group_layout: wgpu::BindGroupLayout,
}

/// egui output for one frame, already tessellated
pub struct EguiFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen_descriptor: egui_wgpu::ScreenDescriptor,
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn create_camera_resources(device: &wgpu::Device) -> CameraResources {
    let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("camera_buffer"),
        size: 64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("lighting_buffer"),
        contents: bytemuck::bytes_of(&LightingUniform::default()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera_bind_group_layout"),
        entries: &[
            uniform_entry(0, ShaderStages::VERTEX),
            uniform_entry(1, ShaderStages::FRAGMENT),
        ],
    });

    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("camera_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            wgpu::BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
        ],
    });

    CameraResources { camera_buffer, lighting_buffer, bind_group_layout, camera_bind_group }
}

pub fn create_object_resources(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> ObjectResources {
    let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label}_transform")),
        contents: bytemuck::bytes_of(&TransformUniform::from_translation(glam::Vec3::ZERO)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label}_bind_group")),
        layout,
        entries: &[wgpu::BindGroupEntry { binding: 0, resource: transform_buffer.as_entire_binding() }],
    });
    ObjectResources { transform_buffer, bind_group }
}

fn create_mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: TextureFormat,
    topology: PrimitiveTopology,
    fragment_entry: &str,
) -> RenderPipeline {
    let cull_mode = match topology {
        PrimitiveTopology::TriangleList => Some(Face::Back),
        _ => None,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 24, shader_location: 2, format: wgpu::VertexFormat::Float32x4 },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState { format, blend: Some(wgpu::BlendState::ALPHA_BLENDING), write_mask: wgpu::ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

pub fn create_pipelines(
    device: &wgpu::Device,
    format: TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
) -> PipelineResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("mesh_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
    });

    let object_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("object_bind_group_layout"),
        entries: &[uniform_entry(0, ShaderStages::VERTEX)],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pipeline_layout"),
        bind_group_layouts: &[camera_layout, &object_bind_group_layout],
        push_constant_ranges: &[],
    });

    let lit_pipeline = create_mesh_pipeline(
        device, "lit_pipeline", &pipeline_layout, &shader, format,
        PrimitiveTopology::TriangleList, "fs_lit",
    );
    let line_pipeline = create_mesh_pipeline(
        device, "line_pipeline", &pipeline_layout, &shader, format,
        PrimitiveTopology::LineList, "fs_unlit",
    );

    PipelineResources { lit_pipeline, line_pipeline, object_bind_group_layout }
}

///////////////////////////////////////////////////////////////////////////////

/// Everything needed to draw a frame
pub struct RenderState {
    clear_color: Color,

    camera: CameraResources,
    pipelines: PipelineResources,
    _depth_texture: Texture,
    depth_view: TextureView,

    capsule_mesh: MeshBuffer,
    marker_mesh: MeshBuffer,
    grid_mesh: MeshBuffer,
    capsule: ObjectResources,
    marker: ObjectResources,
    grid: ObjectResources,

    pub egui_renderer: egui_wgpu::Renderer,
}

impl RenderState {
    pub fn new(gpu: &GpuContext, config: &DemoConfig) -> Self {
        let device = gpu.device.as_ref();
        let (width, height) = (gpu.config.width, gpu.config.height);

        let camera = create_camera_resources(device);
        let pipelines = create_pipelines(device, gpu.format, &camera.bind_group_layout);
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);

        let player = &config.player;
        let capsule_mesh = utils::create_capsule_mesh(
            player.capsule_height,
            player.capsule_radius,
            16,
            4,
            utils::srgb_color(utils::BEIGE),
        )
        .upload(device, "capsule");
        let marker_mesh = utils::create_capsule_mesh(0.0, MARKER_RADIUS, 12, 4, utils::srgb_color(utils::MAROON))
            .upload(device, "marker");
        let grid_mesh = utils::create_grid_mesh(
            config.grid.slices,
            config.grid.spacing,
            utils::srgb_color(utils::LIGHTGRAY),
            utils::srgb_color(utils::GRAY),
        )
        .upload(device, "grid");

        let capsule = create_object_resources(device, &pipelines.object_bind_group_layout, "capsule");
        let marker = create_object_resources(device, &pipelines.object_bind_group_layout, "marker");
        let grid = create_object_resources(device, &pipelines.object_bind_group_layout, "grid");

        let [r, g, b, a] = utils::srgb_color(utils::RAYWHITE);
        let clear_color = Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 };

        let egui_renderer = egui_wgpu::Renderer::new(device, gpu.format, egui_wgpu::RendererOptions::default());

        Self {
            clear_color,
            camera,
            pipelines,
            _depth_texture: depth_texture,
            depth_view,
            capsule_mesh,
            marker_mesh,
            grid_mesh,
            capsule,
            marker,
            grid,
            egui_renderer,
        }
    }

    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    pub fn write_uniforms(&self, queue: &Queue, uniforms: &FrameUniforms) {
        queue.write_buffer(&self.camera.camera_buffer, 0, bytemuck::bytes_of(&uniforms.camera));
        queue.write_buffer(&self.capsule.transform_buffer, 0, bytemuck::bytes_of(&uniforms.capsule));
        queue.write_buffer(&self.marker.transform_buffer, 0, bytemuck::bytes_of(&uniforms.marker));
    }

    fn draw_mesh(rp: &mut RenderPass<'_>, object: &ObjectResources, mesh: &MeshBuffer) {
        rp.set_bind_group(1, &object.bind_group, &[]);
        rp.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        rp.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint32);
        rp.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    pub fn draw_frame(&mut self, gpu: &GpuContext, egui_frame: EguiFrame) -> Result<(), SurfaceError> {
        let device = gpu.device.as_ref();
        let queue = gpu.queue.as_ref();

        let frame = gpu.surface.get_current_texture()?;
        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rp.set_bind_group(0, &self.camera.camera_bind_group, &[]);

            rp.set_pipeline(&self.pipelines.lit_pipeline);
            Self::draw_mesh(&mut rp, &self.capsule, &self.capsule_mesh);
            Self::draw_mesh(&mut rp, &self.marker, &self.marker_mesh);

            rp.set_pipeline(&self.pipelines.line_pipeline);
            Self::draw_mesh(&mut rp, &self.grid, &self.grid_mesh);
        }

        // Upload egui textures
        for (id, image_delta) in &egui_frame.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &egui_frame.primitives,
            &egui_frame.screen_descriptor,
        );

        // Render egui overlay
        {
            let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(
                &mut egui_pass.forget_lifetime(),
                &egui_frame.primitives,
                &egui_frame.screen_descriptor,
            );
        }

        for id in &egui_frame.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
