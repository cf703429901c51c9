//! Packing sprite runs into the vertex ring and issuing draws.

use std::sync::Arc;

use spritebatch_test_utils::{
    DeviceError, GpuBuffer, GpuRenderPipeline, RenderDevice, SpriteUniforms, TextureId,
};

use super::pipeline::{create_index_buffer, create_vertex_ring};
use super::ring::RingCursor;
use super::types::{FrameStats, SpriteRecord};
use super::vertex::{INDICES_PER_SPRITE, SPRITE_STRIDE, SpriteVertex, pack_sprites};

/// Owns the vertex ring, the static index buffer and the ring cursor.
pub struct DrawEmitter {
    device: Arc<dyn RenderDevice>,
    ring: RingCursor,
    vertex_ring: GpuBuffer,
    index_buffer: GpuBuffer,
    staging: Vec<SpriteVertex>,
}

impl DrawEmitter {
    pub fn new(
        device: Arc<dyn RenderDevice>,
        max_batch: u32,
        min_batch: u32,
    ) -> Result<Self, DeviceError> {
        let vertex_ring = create_vertex_ring(device.as_ref(), max_batch)?;
        let index_buffer = create_index_buffer(device.as_ref(), max_batch)?;

        Ok(Self {
            device,
            ring: RingCursor::new(max_batch, min_batch),
            vertex_ring,
            index_buffer,
            staging: Vec::with_capacity(max_batch as usize * 4),
        })
    }

    pub fn device(&self) -> &Arc<dyn RenderDevice> {
        &self.device
    }

    /// Current ring slot.
    pub fn cursor(&self) -> u32 {
        self.ring.position()
    }

    /// Bind the pipeline, both buffers and the uniforms for the draws that follow.
    pub fn prepare(&self, pipeline: &GpuRenderPipeline, uniforms: &SpriteUniforms) {
        self.device.bind_pipeline(pipeline);
        self.device.bind_vertex_buffer(&self.vertex_ring);
        self.device.bind_index_buffer(&self.index_buffer);
        self.device.set_uniforms(uniforms);
    }

    /// Draw `records`, which all use `texture`.
    ///
    /// The run is cut into spans that fit the ring. Each span is packed,
    /// written as a single sub-range of the vertex ring and drawn with one
    /// indexed call.
    pub fn render_batch(
        &mut self,
        texture: TextureId,
        records: &[SpriteRecord],
        stats: &mut FrameStats,
    ) {
        self.device.bind_texture(texture);
        stats.batches += 1;

        let mut packed = 0;
        while packed < records.len() {
            let span = self.ring.reserve((records.len() - packed) as u32);
            if span.discarded > 0 {
                tracing::trace!("Ring rewound, {} tail slots skipped", span.discarded);
            }

            let end = packed + span.count as usize;
            pack_sprites(&records[packed..end], &mut self.staging);
            self.device.write_buffer(
                &self.vertex_ring,
                span.first_slot as u64 * SPRITE_STRIDE,
                bytemuck::cast_slice(&self.staging),
            );

            let first_index = span.first_slot * INDICES_PER_SPRITE;
            self.device
                .draw_indexed(first_index..first_index + span.count * INDICES_PER_SPRITE);
            tracing::trace!(
                "Draw {}: {} quads at slot {}",
                texture,
                span.count,
                span.first_slot
            );

            stats.sprites += span.count;
            stats.draw_calls += 1;
            stats.discarded_slots += span.discarded;
            packed = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use spritebatch_test_utils::mock_render::{MockRenderDevice, RenderCall};

    use crate::batch::types::SpriteOptions;

    fn records(n: usize) -> Vec<SpriteRecord> {
        (0..n)
            .map(|i| {
                SpriteOptions::new(TextureId(1), Vec2::splat(8.0))
                    .at(Vec2::new(i as f32, 0.0))
                    .resolve()
            })
            .collect()
    }

    fn emitter() -> (Arc<MockRenderDevice>, DrawEmitter) {
        let device = Arc::new(MockRenderDevice::new());
        let emitter = DrawEmitter::new(device.clone(), 200, 20).unwrap();
        device.clear_calls();
        (device, emitter)
    }

    #[test]
    fn test_single_span_draw() {
        let (device, mut emitter) = emitter();
        let mut stats = FrameStats::default();

        emitter.render_batch(TextureId(1), &records(10), &mut stats);

        let draws = device.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].first_index, 0);
        assert_eq!(draws[0].index_count, 60);
        assert_eq!(draws[0].texture, Some(TextureId(1)));
        assert_eq!(emitter.cursor(), 10);
        assert_eq!(
            stats,
            FrameStats { sprites: 10, batches: 1, draw_calls: 1, discarded_slots: 0 }
        );
    }

    #[test]
    fn test_write_covers_only_the_span() {
        let (device, mut emitter) = emitter();
        let mut stats = FrameStats::default();

        emitter.render_batch(TextureId(1), &records(3), &mut stats);
        emitter.render_batch(TextureId(1), &records(2), &mut stats);

        let writes: Vec<_> = device
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                RenderCall::WriteBuffer { offset, size, .. } => Some((offset, size)),
                _ => None,
            })
            .collect();
        assert_eq!(writes, vec![(0, 3 * 128), (3 * 128, 2 * 128)]);
    }

    #[test]
    fn test_batch_larger_than_ring() {
        let (device, mut emitter) = emitter();
        let mut stats = FrameStats::default();

        emitter.render_batch(TextureId(1), &records(450), &mut stats);

        let quads: Vec<_> = device.draws().iter().map(|d| (d.first_quad(), d.quads())).collect();
        assert_eq!(quads, vec![(0, 200), (0, 200), (0, 50)]);
        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.sprites, 450);
        assert_eq!(emitter.cursor(), 50);
    }
}
