use backdrop_core::{
    background_vec3, nebula_angle, Camera, ParticleField, BLOOM_INTENSITY, BLOOM_SMOOTHING,
    BLOOM_THRESHOLD, FOG_FAR, FOG_NEAR, NEBULA_COLOR, NEBULA_OPACITY, NEBULA_SIZE, NEBULA_Z,
    PARTICLE_OPACITY, PARTICLE_SIZE,
};
use web_sys as web;
use wgpu;
use wgpu::util::DeviceExt;

mod helpers;
mod post;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    fog_color: [f32; 4],
    // x = fog near, y = fog far, z = particle size, w = particle opacity
    fog_params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct NebulaUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    // rgb = wash color, w = opacity
    color: [f32; 4],
    // x = cos(angle), y = sin(angle), z = edge size, w = plane z
    params: [f32; 4],
    // x = fog near, y = fog far
    fog: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    intensity: f32,
    threshold: f32,
    smoothing: f32,
    _pad: f32,
}

pub struct RenderTargets {
    pub hdr_view: wgpu::TextureView,
    pub bloom_a_view: wgpu::TextureView,
    pub bloom_b_view: wgpu::TextureView,
}

const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

fn create_targets(device: &wgpu::Device, width: u32, height: u32) -> RenderTargets {
    let (_, hdr_view) = helpers::create_color_texture(device, "hdr_tex", width, height, HDR_FORMAT);
    // Bloom works at half resolution; the blur radius comes for free.
    let bw = (width.max(1) / 2).max(1);
    let bh = (height.max(1) / 2).max(1);
    let (_, bloom_a_view) = helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT);
    let (_, bloom_b_view) = helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT);
    RenderTargets {
        hdr_view,
        bloom_a_view,
        bloom_b_view,
    }
}

/// WebGPU state for the backdrop: the instanced particle pass rendered
/// additively into an HDR target, followed by the bloom chain.
pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    scene_pipeline: wgpu::RenderPipeline,
    scene_uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    nebula_pipeline: wgpu::RenderPipeline,
    nebula_uniform_buffer: wgpu::Buffer,
    nebula_bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    position_vb: wgpu::Buffer,
    color_vb: wgpu::Buffer,
    particle_count: u32,

    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: post::PostResources,
    bg_hdr: wgpu::BindGroup,
    bg_from_bloom_a: wgpu::BindGroup,
    bg_from_bloom_b: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    /// Acquire the WebGPU surface and build every pipeline. Any failure here
    /// is terminal for the mount; there is no degraded rendering path.
    pub async fn new(canvas: &'a web::HtmlCanvasElement, field: &ParticleField) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = create_targets(&device, width, height);

        // Scene: instanced particle quads
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particles_shader"),
            source: wgpu::ShaderSource::Wgsl(backdrop_core::PARTICLES_WGSL.into()),
        });
        let scene_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let position_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("position_vb"),
            size: (std::mem::size_of::<[f32; 3]>() * field.count()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Colors are frozen at build; uploaded once and never rewritten.
        let color_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("color_vb"),
            contents: bytemuck::cast_slice(field.colors()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
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
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform_buffer.as_entire_binding(),
            }],
        });
        let scene_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&scene_bgl],
            push_constant_ranges: &[],
        });
        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: per-particle position (rewritten every dirty frame)
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                }],
            },
            // slot 2: per-particle color (static)
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 2,
                }],
            },
        ];
        // Additive blending, no depth buffer: overlapping particles brighten
        // instead of occluding.
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };
        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&scene_pl),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Nebula backplane: same uniform layout, quad-only vertex input
        let nebula_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("nebula_shader"),
            source: wgpu::ShaderSource::Wgsl(backdrop_core::NEBULA_WGSL.into()),
        });
        let nebula_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("nebula_uniforms"),
            size: std::mem::size_of::<NebulaUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let nebula_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nebula_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: nebula_uniform_buffer.as_entire_binding(),
            }],
        });
        let nebula_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("nebula_pipeline"),
            layout: Some(&scene_pl),
            vertex: wgpu::VertexState {
                module: &nebula_shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers[..1],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &nebula_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Bloom chain
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(backdrop_core::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, &post_shader, HDR_FORMAT, format);
        write_post_uniforms(&queue, &post, width, height);
        let (bg_hdr, bg_from_bloom_a, bg_from_bloom_b, bg_bloom_a_only) =
            build_post_bind_groups(&device, &post, &targets, &linear_sampler);

        let bg = background_vec3();
        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene_pipeline,
            scene_uniform_buffer,
            scene_bind_group,
            nebula_pipeline,
            nebula_uniform_buffer,
            nebula_bind_group,
            quad_vb,
            position_vb,
            color_vb,
            particle_count: field.count() as u32,
            targets,
            linear_sampler,
            post,
            bg_hdr,
            bg_from_bloom_a,
            bg_from_bloom_b,
            bg_bloom_a_only,
            width,
            height,
            clear_color: wgpu::Color {
                r: bg.x as f64,
                g: bg.y as f64,
                b: bg.z as f64,
                a: 1.0,
            },
        })
    }

    /// Reconfigure the surface and offscreen targets for a new viewport.
    /// Particle state is untouched; only the projection changes.
    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets = create_targets(&self.device, width, height);
            write_post_uniforms(&self.queue, &self.post, width, height);
            let (bg_hdr, bg_from_bloom_a, bg_from_bloom_b, bg_bloom_a_only) =
                build_post_bind_groups(&self.device, &self.post, &self.targets, &self.linear_sampler);
            self.bg_hdr = bg_hdr;
            self.bg_from_bloom_a = bg_from_bloom_a;
            self.bg_from_bloom_b = bg_from_bloom_b;
            self.bg_bloom_a_only = bg_bloom_a_only;
        }
    }

    /// Re-run surface configuration at the current size; the recovery path
    /// for a lost or outdated surface.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame. Borrows the field's buffers read-only for the duration
    /// of the call; positions are re-uploaded only when the field marked them
    /// dirty this frame. `elapsed_secs` drives the nebula's absolute rotation.
    pub fn render(
        &mut self,
        field: &mut ParticleField,
        elapsed_secs: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        let camera = Camera::backdrop(self.width as f32 / self.height.max(1) as f32);
        let view_mat = camera.view_matrix().to_cols_array_2d();
        let proj_mat = camera.projection_matrix().to_cols_array_2d();
        let bg = background_vec3();
        let uniforms = SceneUniforms {
            view: view_mat,
            proj: proj_mat,
            fog_color: [bg.x, bg.y, bg.z, 1.0],
            fog_params: [FOG_NEAR, FOG_FAR, PARTICLE_SIZE, PARTICLE_OPACITY],
        };
        self.queue
            .write_buffer(&self.scene_uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        let (sin_a, cos_a) = nebula_angle(elapsed_secs).sin_cos();
        let nebula = NebulaUniforms {
            view: view_mat,
            proj: proj_mat,
            color: [NEBULA_COLOR[0], NEBULA_COLOR[1], NEBULA_COLOR[2], NEBULA_OPACITY],
            params: [cos_a, sin_a, NEBULA_SIZE, NEBULA_Z],
            fog: [FOG_NEAR, FOG_FAR, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.nebula_uniform_buffer, 0, bytemuck::bytes_of(&nebula));
        if field.take_dirty() {
            self.queue
                .write_buffer(&self.position_vb, 0, bytemuck::cast_slice(field.positions()));
        }

        // Pass 1: nebula backplane, then particles, into the HDR target
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
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
            rpass.set_pipeline(&self.nebula_pipeline);
            rpass.set_bind_group(0, &self.nebula_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.draw(0..6, 0..1);

            rpass.set_pipeline(&self.scene_pipeline);
            rpass.set_bind_group(0, &self.scene_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.position_vb.slice(..));
            rpass.set_vertex_buffer(2, self.color_vb.slice(..));
            rpass.draw(0..6, 0..self.particle_count);
        }

        // Post uniforms were written at init/resize; each pass binds the
        // buffer carrying its own blur direction.

        // Pass 2: bright pass -> bloom_a
        self.blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.bg_hdr,
            None,
        );

        // Pass 3: blur horizontal bloom_a -> bloom_b
        self.blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bg_from_bloom_a,
            None,
        );

        // Pass 4: blur vertical bloom_b -> bloom_a
        self.blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bg_from_bloom_b,
            None,
        );

        // Pass 5: composite to the swapchain
        self.blit(
            &mut encoder,
            "composite",
            &view,
            self.clear_color,
            &self.post.composite_pipeline,
            &self.bg_hdr,
            Some(&self.bg_bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        target: &wgpu::TextureView,
        clear: wgpu::Color,
        pipeline: &wgpu::RenderPipeline,
        bg0: &wgpu::BindGroup,
        bg1: Option<&wgpu::BindGroup>,
    ) {
        let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        r.set_pipeline(pipeline);
        r.set_bind_group(0, bg0, &[]);
        if let Some(g1) = bg1 {
            r.set_bind_group(1, g1, &[]);
        }
        r.draw(0..3, 0..1);
        drop(r);
    }
}

// Contents depend only on the viewport, so these are written at init and on
// resize rather than every frame.
fn write_post_uniforms(queue: &wgpu::Queue, post: &post::PostResources, width: u32, height: u32) {
    let base = PostUniforms {
        resolution: [width as f32 / 2.0, height as f32 / 2.0],
        blur_dir: [0.0, 0.0],
        intensity: BLOOM_INTENSITY,
        threshold: BLOOM_THRESHOLD,
        smoothing: BLOOM_SMOOTHING,
        _pad: 0.0,
    };
    queue.write_buffer(&post.base_uniforms, 0, bytemuck::bytes_of(&base));
    let blur_h = PostUniforms {
        blur_dir: [1.0, 0.0],
        ..base
    };
    queue.write_buffer(&post.blur_h_uniforms, 0, bytemuck::bytes_of(&blur_h));
    let blur_v = PostUniforms {
        blur_dir: [0.0, 1.0],
        ..base
    };
    queue.write_buffer(&post.blur_v_uniforms, 0, bytemuck::bytes_of(&blur_v));
}

fn build_post_bind_groups(
    device: &wgpu::Device,
    post: &post::PostResources,
    targets: &RenderTargets,
    sampler: &wgpu::Sampler,
) -> (
    wgpu::BindGroup,
    wgpu::BindGroup,
    wgpu::BindGroup,
    wgpu::BindGroup,
) {
    let make_bg0 = |label: &str, view: &wgpu::TextureView, uniforms: &wgpu::Buffer| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &post.bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        })
    };
    let bg_hdr = make_bg0("bg_hdr", &targets.hdr_view, &post.base_uniforms);
    let bg_from_bloom_a = make_bg0("bg_from_bloom_a", &targets.bloom_a_view, &post.blur_h_uniforms);
    let bg_from_bloom_b = make_bg0("bg_from_bloom_b", &targets.bloom_b_view, &post.blur_v_uniforms);
    let bg_bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg_bloom_a_only"),
        layout: &post.bgl1,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    (bg_hdr, bg_from_bloom_a, bg_from_bloom_b, bg_bloom_a_only)
}
