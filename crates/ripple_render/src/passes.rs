//! wgpu implementation of the wave passes
//!
//! Every pass records into its own command encoder and is submitted before the
//! call returns, so queue order is program order. Splash and simulation passes
//! only render the visible band of the grid; rows below it stay at rest.

use crate::gpu::GpuContext;
use crate::mask::MaskTexture;
use crate::mipmap::MipGenerator;
use crate::ring::RingTextures;
use crate::{RenderError, MASK_FORMAT, WAVE_FORMAT};
use ripple_core::{MaskImage, RingPointer, SplashPlan, Viewport, WavePasses, WaveSettings};
use wgpu::util::DeviceExt;

const SPLASH_SHADER: &str = include_str!("../shaders/splash.wgsl");
const SIMULATION_SHADER: &str = include_str!("../shaders/simulation.wgsl");
const DISPLAY_SHADER: &str = include_str!("../shaders/display.wgsl");

/// Sand, shown through wall texels.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.76,
    g: 0.70,
    b: 0.50,
    a: 0.875,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
    uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Two triangles covering clip space. `v` runs from 0 at the top edge to
/// `v_max` at the bottom edge.
fn quad(v_max: f32) -> [Vertex; 6] {
    let top_left = Vertex { position: [-1.0, 1.0], uv: [0.0, 0.0] };
    let top_right = Vertex { position: [1.0, 1.0], uv: [1.0, 0.0] };
    let bottom_left = Vertex { position: [-1.0, -1.0], uv: [0.0, v_max] };
    let bottom_right = Vertex { position: [1.0, -1.0], uv: [1.0, v_max] };
    [top_left, bottom_left, bottom_right, top_left, bottom_right, top_right]
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SplashUniforms {
    center: [f32; 2],
    radius: f32,
    width: f32,
    height: f32,
    resolution: f32,
    use_base: u32,
    _padding: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SimUniforms {
    dt: f32,
    speed: f32,
    damping: f32,
    resolution: f32,
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn quad_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

pub struct GpuPasses {
    gpu: GpuContext,
    ring: RingTextures,
    wave_mips: MipGenerator,
    viewport: Viewport,

    grid_quad: wgpu::Buffer,
    display_quad: wgpu::Buffer,

    splash_pipeline: wgpu::RenderPipeline,
    /// One buffer per splash copy, both written before the plan is submitted.
    splash_uniforms: [wgpu::Buffer; 2],
    /// Indexed by `[copy][base slot]`.
    splash_bind_groups: [[wgpu::BindGroup; 3]; 2],

    sim_pipeline: wgpu::RenderPipeline,
    /// Indexed by ring pointer.
    sim_bind_groups: [wgpu::BindGroup; 3],

    display_pipeline: wgpu::RenderPipeline,
    /// Indexed by the slot shown.
    display_bind_groups: [wgpu::BindGroup; 3],

    fatal: Option<RenderError>,
}

impl GpuPasses {
    pub async fn new(
        gpu: GpuContext,
        settings: &WaveSettings,
        viewport: Viewport,
        mask: &MaskImage,
    ) -> Result<Self, RenderError> {
        let resolution = settings.resolution;
        let limit = gpu.capabilities.max_texture_size;
        if resolution > limit {
            return Err(RenderError::ResolutionTooLarge { resolution, limit });
        }
        if mask.resolution() != resolution {
            return Err(RenderError::MaskSize {
                mask: mask.resolution(),
                grid: resolution,
            });
        }

        let device = &gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let wave_mips = MipGenerator::new(device, WAVE_FORMAT);
        let mask_mips = MipGenerator::new(device, MASK_FORMAT);
        let ring = RingTextures::new(device, resolution, &wave_mips);
        let mask_texture = MaskTexture::upload(device, &gpu.queue, &mask_mips, mask);

        let grid_quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Quad"),
            contents: bytemuck::cast_slice(&quad(1.0)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let display_quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Display Quad"),
            contents: bytemuck::cast_slice(&quad(viewport.visible_fraction())),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Splash
        let splash_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Splash Bind Group Layout"),
            entries: &[uniform_entry(0), texture_entry(1), texture_entry(2)],
        });
        let splash_pipeline = quad_pipeline(
            device,
            "Splash Pipeline",
            SPLASH_SHADER,
            &splash_layout,
            WAVE_FORMAT,
            None,
        );
        let splash_uniforms = [0u8, 1].map(|_| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Splash Uniforms"),
                size: std::mem::size_of::<SplashUniforms>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        let splash_bind_groups = [0usize, 1].map(|copy| {
            [0usize, 1, 2].map(|base| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Splash Bind Group"),
                    layout: &splash_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: splash_uniforms[copy].as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&mask_texture.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::TextureView(
                                &ring.slot(base).sample_view,
                            ),
                        },
                    ],
                })
            })
        });

        // Simulation
        let sim_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Simulation Bind Group Layout"),
            entries: &[
                uniform_entry(0),
                texture_entry(1),
                texture_entry(2),
                texture_entry(3),
            ],
        });
        let sim_pipeline = quad_pipeline(
            device,
            "Simulation Pipeline",
            SIMULATION_SHADER,
            &sim_layout,
            WAVE_FORMAT,
            None,
        );
        let sim_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Simulation Uniforms"),
            contents: bytemuck::bytes_of(&SimUniforms {
                dt: settings.dt(),
                speed: settings.speed,
                damping: settings.damping,
                resolution: resolution as f32,
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let sim_bind_groups = [0usize, 1, 2].map(|index| {
            let pointer = RingPointer::new(index);
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Simulation Bind Group"),
                layout: &sim_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: sim_uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&mask_texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(
                            &ring.slot(pointer.oldest()).sample_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(
                            &ring.slot(pointer.previous()).sample_view,
                        ),
                    },
                ],
            })
        });

        // Display
        let display_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Display Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let display_pipeline = quad_pipeline(
            device,
            "Display Pipeline",
            DISPLAY_SHADER,
            &display_layout,
            gpu.config.format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Display Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let display_bind_groups = [0usize, 1, 2].map(|slot| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Display Bind Group"),
                layout: &display_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&ring.slot(slot).sample_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&mask_texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            })
        });

        if let Some(error) = device.pop_error_scope().await {
            return Err(RenderError::Program(error.to_string()));
        }

        tracing::info!(
            resolution,
            surface_format = ?gpu.config.format,
            "wave passes ready"
        );

        Ok(Self {
            gpu,
            ring,
            wave_mips,
            viewport,
            grid_quad,
            display_quad,
            splash_pipeline,
            splash_uniforms,
            splash_bind_groups,
            sim_pipeline,
            sim_bind_groups,
            display_pipeline,
            display_bind_groups,
            fatal: None,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    /// Follow the window size. The grid keeps the aspect ratio it started with.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Error that makes further presentation pointless, if one occurred.
    pub fn take_fatal(&mut self) -> Option<RenderError> {
        self.fatal.take()
    }

    fn encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    fn submit(&self, encoder: wgpu::CommandEncoder) {
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Draw the grid quad into `target`, limited to the visible band.
    fn grid_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        target: &wgpu::TextureView,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
    ) {
        let rect = self.viewport.grid_rect();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_viewport(rect.x, rect.y, rect.width, rect.height, 0.0, 1.0);
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, self.grid_quad.slice(..));
        pass.draw(0..6, 0..1);
    }
}

impl WavePasses for GpuPasses {
    fn add_splash(&mut self, plan: &SplashPlan) {
        let resolution = self.viewport.resolution() as f32;
        for (buffer, write) in self.splash_uniforms.iter().zip(&plan.writes) {
            let uniforms = SplashUniforms {
                center: write.splash.center.to_array(),
                radius: write.splash.radius,
                width: write.splash.width,
                height: write.splash.height,
                resolution,
                use_base: plan.use_base as u32,
                _padding: 0,
            };
            self.gpu
                .queue
                .write_buffer(buffer, 0, bytemuck::bytes_of(&uniforms));
        }

        let mut encoder = self.encoder("Splash Encoder");
        for (copy, write) in plan.writes.iter().enumerate() {
            self.grid_pass(
                &mut encoder,
                "Splash Pass",
                &self.ring.slot(write.target).target_view,
                &self.splash_pipeline,
                &self.splash_bind_groups[copy][write.base],
            );
        }
        for write in &plan.writes {
            self.wave_mips
                .generate(&mut encoder, &self.ring.slot(write.target).mips);
        }
        self.submit(encoder);
    }

    fn step(&mut self, pointer: RingPointer) {
        let newest = self.ring.at(pointer, 2);
        let mut encoder = self.encoder("Simulation Encoder");
        self.grid_pass(
            &mut encoder,
            "Simulation Pass",
            &newest.target_view,
            &self.sim_pipeline,
            &self.sim_bind_groups[pointer.index()],
        );
        self.wave_mips.generate(&mut encoder, &newest.mips);
        self.submit(encoder);
    }

    fn present(&mut self, pointer: RingPointer) {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("out of memory acquiring surface texture");
                self.fatal = Some(RenderError::OutOfMemory);
                return;
            }
            Err(other) => {
                tracing::warn!(error = %other, "frame skipped");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (width, height) = self.gpu.size();
        let shown_height = (width as f32 / self.viewport.aspect_ratio()).min(height as f32);

        let mut encoder = self.encoder("Display Encoder");
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Display Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_viewport(0.0, 0.0, width as f32, shown_height, 0.0, 1.0);
            pass.set_pipeline(&self.display_pipeline);
            pass.set_bind_group(0, &self.display_bind_groups[pointer.newest()], &[]);
            pass.set_vertex_buffer(0, self.display_quad.slice(..));
            pass.draw(0..6, 0..1);
        }
        self.submit(encoder);
        frame.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<SplashUniforms>(), 32);
        assert_eq!(std::mem::size_of::<SimUniforms>(), 16);
    }

    #[test]
    fn display_quad_maps_top_edge_to_first_row() {
        let vertices = quad(0.75);
        for vertex in vertices {
            let expected_v = if vertex.position[1] > 0.0 { 0.0 } else { 0.75 };
            assert_eq!(vertex.uv[1], expected_v);
            assert_eq!(vertex.uv[0], (vertex.position[0] + 1.0) * 0.5);
        }
    }
}
