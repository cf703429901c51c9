//! Implementation of the RenderDevice trait for GraphicsContext.

use std::ops::Range;
use std::sync::atomic::Ordering;

use spritebatch_test_utils::{
    DeviceError, GpuBuffer, GpuRenderPipeline, GpuTexture, RenderDevice, SpritePipelineDescriptor,
    SpriteUniforms, TextureId,
};
use wgpu::{BufferDescriptor, TextureDescriptor};

use crate::context::GraphicsContext;

impl GraphicsContext {
    /// Run `f` inside a validation error scope and map any error with `wrap`.
    fn validated<T>(
        &self,
        f: impl FnOnce() -> T,
        wrap: impl FnOnce(String) -> DeviceError,
    ) -> Result<T, DeviceError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f();
        match pollster::block_on(self.device.pop_error_scope()) {
            None => Ok(value),
            Some(error) => {
                let error = wrap(error.to_string());
                tracing::error!("{}", error);
                Err(error)
            }
        }
    }
}

impl RenderDevice for GraphicsContext {
    fn create_sprite_pipeline(
        &self,
        desc: &SpritePipelineDescriptor<'_>,
    ) -> Result<GpuRenderPipeline, DeviceError> {
        let shader = self.validated(
            || {
                self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: desc.label,
                    source: wgpu::ShaderSource::Wgsl(desc.shader_source.into()),
                })
            },
            DeviceError::ShaderCompilation,
        )?;

        let pipeline = self.validated(
            || {
                let layout = self
                    .device
                    .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: desc.label,
                        bind_group_layouts: &[&self.texture_layout, &self.uniform_layout],
                        push_constant_ranges: &[],
                    });

                self.device
                    .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: desc.label,
                        layout: Some(&layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: std::slice::from_ref(&desc.vertex_layout),
                            compilation_options: wgpu::PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: Some("fs_main"),
                            targets: &[Some(wgpu::ColorTargetState {
                                format: self.target_format,
                                blend: desc.blend,
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                            compilation_options: wgpu::PipelineCompilationOptions::default(),
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
                    })
            },
            DeviceError::PipelineCreation,
        )?;

        Ok(GpuRenderPipeline::from_wgpu(pipeline))
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<GpuBuffer, DeviceError> {
        let buffer = self.validated(
            || self.device.create_buffer(desc),
            DeviceError::BufferCreation,
        )?;
        Ok(GpuBuffer::from_wgpu(buffer))
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> Result<GpuTexture, DeviceError> {
        let texture = self.validated(
            || self.device.create_texture(desc),
            DeviceError::TextureCreation,
        )?;

        let id = TextureId(self.next_texture_id.fetch_add(1, Ordering::Relaxed));
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: desc.label,
            layout: &self.texture_layout,
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
        self.textures.write().insert(id, bind_group);

        Ok(GpuTexture::from_wgpu(id, texture))
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer.as_wgpu(), offset, data);
    }

    fn write_texture(&self, texture: &GpuTexture, rgba: &[u8]) {
        let size = wgpu::Extent3d {
            width: texture.width(),
            height: texture.height(),
            depth_or_array_layers: 1,
        };
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: texture.as_wgpu(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * texture.width()),
                rows_per_image: Some(texture.height()),
            },
            size,
        );
    }

    fn bind_pipeline(&self, pipeline: &GpuRenderPipeline) {
        self.state.lock().pipeline = Some(pipeline.as_wgpu().clone());
    }

    fn bind_vertex_buffer(&self, buffer: &GpuBuffer) {
        self.state.lock().vertex_buffer = Some(buffer.as_wgpu().clone());
    }

    fn bind_index_buffer(&self, buffer: &GpuBuffer) {
        self.state.lock().index_buffer = Some(buffer.as_wgpu().clone());
    }

    fn set_uniforms(&self, uniforms: &SpriteUniforms) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    fn bind_texture(&self, texture: TextureId) {
        self.state.lock().texture = Some(texture);
    }

    fn draw_indexed(&self, indices: Range<u32>) {
        let target = self.target.lock();
        let Some(target) = target.as_ref() else {
            tracing::error!("Sprite draw skipped: {}", DeviceError::NoTarget);
            return;
        };

        let state = self.state.lock();
        let (Some(pipeline), Some(vertex_buffer), Some(index_buffer), Some(texture)) = (
            state.pipeline.as_ref(),
            state.vertex_buffer.as_ref(),
            state.index_buffer.as_ref(),
            state.texture,
        ) else {
            tracing::warn!("Sprite draw skipped: pipeline, buffers and texture must all be bound");
            return;
        };

        let textures = self.textures.read();
        let Some(texture_bind_group) = textures.get(&texture) else {
            tracing::warn!("Sprite draw skipped: {} was not created by this context", texture);
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_draw"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, texture_bind_group, &[]);
            pass.set_bind_group(1, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(indices, 0, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.target
            .lock()
            .as_ref()
            .map_or((0, 0), |target| (target.width, target.height))
    }
}
