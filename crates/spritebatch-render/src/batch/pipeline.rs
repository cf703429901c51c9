//! Sprite pipelines, one per blend mode.

use spritebatch_core::alloc::HashMap;
use spritebatch_test_utils::{
    DeviceError, GpuBuffer, GpuRenderPipeline, RenderDevice, SpritePipelineDescriptor,
};

use crate::blend::BlendMode;

use super::vertex::{SPRITE_STRIDE, SpriteVertex, build_indices};

pub const SPRITE_SHADER: &str = include_str!("../shaders/sprite.wgsl");

/// Lazily built pipelines keyed by blend mode.
#[derive(Default)]
pub struct PipelineCache {
    pipelines: HashMap<BlendMode, GpuRenderPipeline>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline for `mode`, building it on first use.
    pub fn get_or_create(
        &mut self,
        device: &dyn RenderDevice,
        mode: BlendMode,
    ) -> Result<&GpuRenderPipeline, DeviceError> {
        if !self.pipelines.contains_key(&mode) {
            let pipeline = device
                .create_sprite_pipeline(&SpritePipelineDescriptor {
                    label: Some(mode.pipeline_label()),
                    shader_source: SPRITE_SHADER,
                    vertex_layout: SpriteVertex::layout(),
                    blend: mode.to_blend_state(),
                })
                .inspect_err(|err| {
                    tracing::error!("Failed to build sprite pipeline for {:?}: {}", mode, err)
                })?;
            tracing::debug!("Created sprite pipeline for {:?}", mode);
            self.pipelines.insert(mode, pipeline);
        }

        self.pipelines
            .get(&mode)
            .ok_or_else(|| DeviceError::PipelineCreation(format!("{:?} pipeline missing", mode)))
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

/// Vertex ring holding `sprites` quads.
pub fn create_vertex_ring(device: &dyn RenderDevice, sprites: u32) -> Result<GpuBuffer, DeviceError> {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("sprite_vertex_ring"),
        size: sprites as u64 * SPRITE_STRIDE,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Index buffer for `sprites` quads, filled once and never rewritten.
pub fn create_index_buffer(device: &dyn RenderDevice, sprites: u32) -> Result<GpuBuffer, DeviceError> {
    let mut indices = build_indices(sprites);
    // Buffer writes must be a multiple of 4 bytes.
    if indices.len() % 2 != 0 {
        indices.push(0);
    }
    let bytes: &[u8] = bytemuck::cast_slice(&indices);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("sprite_index_buffer"),
        size: bytes.len() as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })?;
    device.write_buffer(&buffer, 0, bytes);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spritebatch_test_utils::mock_render::{MockRenderDevice, RenderCall};

    #[test]
    fn test_pipeline_built_once_per_mode() {
        let device = MockRenderDevice::new();
        let mut cache = PipelineCache::new();

        cache.get_or_create(&device, BlendMode::Alpha).unwrap();
        cache.get_or_create(&device, BlendMode::Alpha).unwrap();
        cache.get_or_create(&device, BlendMode::Additive).unwrap();

        assert_eq!(device.count_pipeline_creates(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_pipeline_failure_is_not_cached() {
        let device = MockRenderDevice::new();
        device.fail_next_pipeline(DeviceError::ShaderCompilation("line 3".into()));
        let mut cache = PipelineCache::new();

        let err = cache.get_or_create(&device, BlendMode::Alpha).unwrap_err();
        assert_eq!(err, DeviceError::ShaderCompilation("line 3".into()));
        assert!(cache.is_empty());

        assert!(cache.get_or_create(&device, BlendMode::Alpha).is_ok());
    }

    #[test]
    fn test_index_buffer_contents() {
        let device = MockRenderDevice::new();
        let buffer = create_index_buffer(&device, 200).unwrap();
        assert_eq!(buffer.size(), 200 * 6 * 2);

        let id = buffer.mock_id().unwrap();
        let bytes = device.buffer_contents(id).unwrap();
        let indices: &[u16] = bytemuck::cast_slice(&bytes);
        assert_eq!(&indices[..6], &[0, 1, 2, 1, 3, 2]);
        assert_eq!(&indices[1194..], &[796, 797, 798, 797, 799, 798]);

        assert!(matches!(
            device.calls()[0],
            RenderCall::CreateBuffer { size: 2400, .. }
        ));
    }

    #[test]
    fn test_vertex_ring_size() {
        let device = MockRenderDevice::new();
        let ring = create_vertex_ring(&device, 200).unwrap();
        assert_eq!(ring.size(), 200 * 128);
    }
}
