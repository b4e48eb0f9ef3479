use crate::core::{
    Camera, SceneError, SceneGraph, PARTICLE_COLOR, PARTICLE_SIZE, TORUS_COLOR,
};
use glam::Mat4;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use web_sys as web;

mod helpers;
mod targets;
use targets::RenderTargets;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    sprite: [f32; 4],
}

impl SceneUniforms {
    fn new(camera: &Camera, model: Mat4, color: [f32; 4], sprite_size: f32) -> Self {
        Self {
            view: camera.view().to_cols_array_2d(),
            proj: camera.projection().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color,
            sprite: [sprite_size, 0.0, 0.0, 0.0],
        }
    }
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<SceneUniforms>() as u64,
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
        Self { buffer, bind_group }
    }
}

struct PointBatch {
    instances: wgpu::Buffer,
    count: u32,
}

struct LineBatch {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,

    point_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_uniforms: UniformSlot,
    line_uniforms: UniformSlot,

    points: Option<PointBatch>,
    torus: Option<LineBatch>,

    device_lost: Arc<AtomicBool>,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, antialias: bool) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        // Falls back to WebGL when navigator.gpu exists but yields no adapter
        let instance =
            wgpu::util::new_instance_with_webgpu_detection(&wgpu::InstanceDescriptor::default())
                .await;
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // WebGL2-compatible limits so the same request works on both web backends
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let device_lost = Arc::new(AtomicBool::new(false));
        {
            let flag = device_lost.clone();
            device.set_device_lost_callback(move |reason, message| {
                log::warn!("[gpu] device lost ({:?}): {}", reason, message);
                flag.store(true, Ordering::SeqCst);
            });
        }

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
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // Transparent canvas so the page background shows through
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let msaa_supported = adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(4);
        let sample_count = if antialias && msaa_supported { 4 } else { 1 };
        let targets = RenderTargets::new(&device, format, width, height, sample_count);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let point_pipeline = helpers::make_scene_pipeline(
            &device,
            &pl,
            &shader,
            helpers::PipelineSpec {
                label: "points_pipeline",
                vs_entry: "vs_point",
                fs_entry: "fs_point",
                buffers: &[helpers::position_layout(wgpu::VertexStepMode::Instance)],
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: helpers::ADDITIVE_BLEND,
            },
            format,
            sample_count,
        );
        let line_pipeline = helpers::make_scene_pipeline(
            &device,
            &pl,
            &shader,
            helpers::PipelineSpec {
                label: "torus_pipeline",
                vs_entry: "vs_line",
                fs_entry: "fs_line",
                buffers: &[helpers::position_layout(wgpu::VertexStepMode::Vertex)],
                topology: wgpu::PrimitiveTopology::LineList,
                blend: wgpu::BlendState::ALPHA_BLENDING,
            },
            format,
            sample_count,
        );

        let point_uniforms = UniformSlot::new(&device, &bgl, "points_uniforms");
        let line_uniforms = UniformSlot::new(&device, &bgl, "torus_uniforms");

        log::info!(
            "[gpu] surface {}x{} {:?}, msaa x{}",
            width,
            height,
            format,
            sample_count
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            point_pipeline,
            line_pipeline,
            point_uniforms,
            line_uniforms,
            points: None,
            torus: None,
            device_lost,
        })
    }

    /// Create vertex/index buffers for the scene's static geometry.
    pub fn upload(&mut self, scene: &SceneGraph) {
        self.release_geometry();
        if let Some(points) = &scene.points {
            let data: Vec<[f32; 3]> = points.positions.iter().map(|p| p.to_array()).collect();
            self.points = Some(PointBatch {
                instances: helpers::create_vertex_buffer(&self.device, "points_instances", &data),
                count: data.len() as u32,
            });
        }
        if let Some(torus) = &scene.torus {
            let verts: Vec<[f32; 3]> = torus
                .geometry
                .vertices
                .iter()
                .map(|v| v.to_array())
                .collect();
            self.torus = Some(LineBatch {
                vertices: helpers::create_vertex_buffer(&self.device, "torus_vertices", &verts),
                indices: helpers::create_index_buffer(
                    &self.device,
                    "torus_indices",
                    &torus.geometry.line_indices,
                ),
                index_count: torus.geometry.line_indices.len() as u32,
            });
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets
                .recreate(&self.device, self.config.format, width, height);
        }
    }

    pub fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), SceneError> {
        if self.device_lost.load(Ordering::SeqCst) {
            return Err(SceneError::DeviceLost("device reported lost".into()));
        }
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure and pick the frame up next tick
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(e) => return Err(SceneError::frame(format!("{:?}", e))),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(points) = &scene.points {
            let u = SceneUniforms::new(camera, points.model(), PARTICLE_COLOR, PARTICLE_SIZE);
            self.queue
                .write_buffer(&self.point_uniforms.buffer, 0, bytemuck::bytes_of(&u));
        }
        if let Some(torus) = &scene.torus {
            let u = SceneUniforms::new(camera, torus.model(), TORUS_COLOR, 0.0);
            self.queue
                .write_buffer(&self.line_uniforms.buffer, 0, bytemuck::bytes_of(&u));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let (target, resolve_target) = self.targets.attachment(&view);
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let (Some(batch), Some(_)) = (&self.points, &scene.points) {
                rpass.set_pipeline(&self.point_pipeline);
                rpass.set_bind_group(0, &self.point_uniforms.bind_group, &[]);
                rpass.set_vertex_buffer(0, batch.instances.slice(..));
                rpass.draw(0..6, 0..batch.count);
            }
            if let (Some(batch), Some(_)) = (&self.torus, &scene.torus) {
                rpass.set_pipeline(&self.line_pipeline);
                rpass.set_bind_group(0, &self.line_uniforms.bind_group, &[]);
                rpass.set_vertex_buffer(0, batch.vertices.slice(..));
                rpass.set_index_buffer(batch.indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..batch.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn release_geometry(&mut self) {
        if let Some(batch) = self.points.take() {
            batch.instances.destroy();
        }
        if let Some(batch) = self.torus.take() {
            batch.vertices.destroy();
            batch.indices.destroy();
        }
    }

    /// Free every GPU allocation now instead of waiting for drop.
    pub fn destroy(mut self) {
        self.release_geometry();
        self.point_uniforms.buffer.destroy();
        self.line_uniforms.buffer.destroy();
        self.targets.destroy();
        log::info!("[gpu] resources released");
    }
}
