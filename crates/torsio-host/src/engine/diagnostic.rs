use std::num::NonZeroU64;

use torsio_sync::marshal::unflatten_row_major;
use torsio_sync::{BoundaryError, EngineBoundary, PixelFormat};

use crate::device::texture_format_of;

use super::marker::{MarkerState, MarkerUniform};

struct MarkerPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    ubo: wgpu::Buffer,
}

/// wgpu-backed engine that records into the host's render pass.
pub struct DiagnosticEngine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: Option<MarkerPipeline>,
    state: MarkerState,
}

impl DiagnosticEngine {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            pipeline: None,
            state: MarkerState::default(),
        }
    }

    fn build_pipeline(&self, format: wgpu::TextureFormat) -> MarkerPipeline {
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("torsio marker shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/marker.wgsl").into()),
            });

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("torsio marker bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: NonZeroU64::new(
                                std::mem::size_of::<MarkerUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("torsio marker pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("torsio marker pipeline"),
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
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("torsio marker ubo"),
            size: std::mem::size_of::<MarkerUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("torsio marker bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        MarkerPipeline {
            pipeline,
            bind_group,
            ubo,
        }
    }
}

impl EngineBoundary for DiagnosticEngine {
    type Encoder<'a> = wgpu::RenderPass<'a>;

    fn create_pipeline_states(&mut self, format: PixelFormat) -> Result<(), BoundaryError> {
        if !format.is_8bit() {
            return Err(BoundaryError::UnsupportedPixelFormat(format));
        }
        let texture_format =
            texture_format_of(format).ok_or(BoundaryError::UnsupportedPixelFormat(format))?;

        self.pipeline = Some(self.build_pipeline(texture_format));
        log::debug!("marker pipeline built for {texture_format:?}");
        Ok(())
    }

    fn update_screen_sizes(&mut self, width: f64, height: f64) -> Result<(), BoundaryError> {
        self.state.set_screen(width, height);
        Ok(())
    }

    fn set_camera_matrices(
        &mut self,
        view: &[f32; 16],
        projection: &[f32; 16],
        _transform: &[f32; 16],
    ) -> Result<(), BoundaryError> {
        self.state
            .set_camera(unflatten_row_major(view), unflatten_row_major(projection));
        Ok(())
    }

    fn update_world(&mut self, acceleration: &[f32; 3], strength: f32) -> Result<(), BoundaryError> {
        self.state.step(acceleration, strength);
        log::trace!("needle angle {:.3} rad", self.state.needle().angle);
        Ok(())
    }

    fn encode(&mut self, pass: &mut Self::Encoder<'_>) -> Result<(), BoundaryError> {
        let Some(marker) = self.pipeline.as_ref() else {
            return Err(BoundaryError::engine("encode", "pipeline not created"));
        };
        if self.state.anchor_ndc().is_none() {
            return Ok(());
        }

        // Staged on the queue; lands before the frame's command buffer runs.
        self.queue
            .write_buffer(&marker.ubo, 0, bytemuck::bytes_of(&self.state.uniform()));

        pass.set_pipeline(&marker.pipeline);
        pass.set_bind_group(0, &marker.bind_group, &[]);
        pass.draw(0..6, 0..1);
        Ok(())
    }
}
