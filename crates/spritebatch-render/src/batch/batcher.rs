//! The sprite batch: frame lifecycle over queue, sorter and emitter.

use std::sync::Arc;

use glam::Mat4;
use spritebatch_assets::{LoadReport, SpriteSource, TextureLoader};
use spritebatch_core::BatchConfig;
use spritebatch_core::profiling::{self, profile_function, profile_scope};
use spritebatch_core::transform::to_gpu;
use spritebatch_test_utils::{RenderDevice, SpriteUniforms};

use crate::blend::BlendMode;
use crate::error::{BatchError, BatchResult};

use super::assemble::{BatchRange, build_batches};
use super::emit::DrawEmitter;
use super::pipeline::PipelineCache;
use super::queue::SpriteQueue;
use super::sort::DepthSorter;
use super::types::{FrameStats, SortMode, SpriteOptions};

#[derive(Debug, Clone, Copy)]
struct Frame {
    sort_mode: SortMode,
    blend: BlendMode,
}

/// Collects sprite draws between [`begin`](Self::begin) and
/// [`end`](Self::end) and emits them in as few draw calls as the sort order
/// allows.
///
/// ```rust,ignore
/// let mut batch = SpriteBatch::new(device)?;
///
/// batch.begin(SortMode::BackToFront, BlendMode::Alpha)?;
/// batch.draw(&SpriteOptions::from_texture(&hero, Vec2::new(40.0, 80.0)).with_depth(1))?;
/// batch.draw(&SpriteOptions::from_texture(&tree, Vec2::new(60.0, 40.0)).with_depth(2))?;
/// let stats = batch.end()?;
/// ```
///
/// In [`SortMode::Immediate`] every `draw` is emitted on the spot with its
/// own draw call. In the other modes sprites are queued, sorted at `end`,
/// grouped into same-texture runs and written into a ring of
/// `max_batch_size` sprite slots.
pub struct SpriteBatch {
    config: BatchConfig,
    queue: SpriteQueue,
    sorter: DepthSorter,
    batches: Vec<BatchRange>,
    emitter: DrawEmitter,
    pipelines: PipelineCache,
    loader: TextureLoader,
    transform: Mat4,
    frame: Option<Frame>,
    stats: FrameStats,
    last_stats: FrameStats,
}

impl SpriteBatch {
    /// Sprite batch with the default sizes (200 sprite ring, 20 sprite minimum).
    pub fn new(device: Arc<dyn RenderDevice>) -> BatchResult<Self> {
        Self::with_config(device, BatchConfig::default())
    }

    /// Create the vertex ring, index buffer and default pipeline.
    ///
    /// The configuration is validated before anything is created on the device.
    pub fn with_config(device: Arc<dyn RenderDevice>, config: BatchConfig) -> BatchResult<Self> {
        profile_function!();
        config.validate()?;

        let mut pipelines = PipelineCache::new();
        pipelines.get_or_create(device.as_ref(), BlendMode::default())?;

        let emitter = DrawEmitter::new(device, config.max_batch_size, config.min_batch_size)
            .inspect_err(|err| tracing::error!("Failed to create sprite buffers: {}", err))?;

        tracing::info!(
            "Sprite batch ready: ring of {} sprites, min batch {}, queue of {}",
            config.max_batch_size,
            config.min_batch_size,
            config.queue_capacity
        );

        let queue_capacity = config.queue_capacity as usize;
        Ok(Self {
            config,
            queue: SpriteQueue::with_capacity(queue_capacity),
            sorter: DepthSorter::with_capacity(queue_capacity),
            batches: Vec::new(),
            emitter,
            pipelines,
            loader: TextureLoader::new(),
            transform: Mat4::IDENTITY,
            frame: None,
            stats: FrameStats::default(),
            last_stats: FrameStats::default(),
        })
    }

    /// Replace the loader used by [`load_sprites`](Self::load_sprites).
    pub fn with_loader(mut self, loader: TextureLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn device(&self) -> &Arc<dyn RenderDevice> {
        self.emitter.device()
    }

    /// Start a frame. Also opens a new profiler frame.
    ///
    /// Beginning while a frame is active drops the sprites queued so far.
    /// The pipeline for `blend` is created here the first time it is used.
    pub fn begin(&mut self, sort_mode: SortMode, blend: BlendMode) -> BatchResult<()> {
        if sort_mode == SortMode::Texture {
            return Err(BatchError::UnsupportedSortMode(sort_mode));
        }
        profiling::new_frame();

        let dropped = self.queue.reset();
        if self.frame.take().is_some() {
            tracing::warn!(
                "begin() called during an active frame; {} queued sprites dropped",
                dropped
            );
        }
        self.stats = FrameStats::default();

        self.pipelines.get_or_create(self.emitter.device().as_ref(), blend)?;

        self.frame = Some(Frame { sort_mode, blend });
        if sort_mode == SortMode::Immediate {
            self.prepare(blend)?;
        }
        Ok(())
    }

    /// Queue a sprite, or draw it right away in immediate mode.
    pub fn draw(&mut self, options: &SpriteOptions) -> BatchResult<()> {
        let frame = self.frame.ok_or(BatchError::NoActiveFrame)?;

        if frame.sort_mode.is_deferred() {
            self.queue.push(options)?;
        } else {
            let record = *self.queue.stage(options)?;
            self.emitter
                .render_batch(record.texture, std::slice::from_ref(&record), &mut self.stats);
        }
        Ok(())
    }

    /// Sort, batch and emit everything queued since `begin`.
    pub fn end(&mut self) -> BatchResult<FrameStats> {
        profile_function!();
        let frame = self.frame.take().ok_or(BatchError::NoActiveFrame)?;

        if frame.sort_mode.is_deferred() && !self.queue.is_empty() {
            self.prepare(frame.blend)?;

            {
                profile_scope!("sort");
                let max_depth = self.queue.max_depth();
                self.sorter
                    .sort(self.queue.records_mut(), frame.sort_mode, max_depth);
            }

            {
                profile_scope!("assemble");
                self.batches.clear();
                build_batches(self.queue.records(), &mut self.batches);
            }

            {
                profile_scope!("emit");
                let records = self.queue.records();
                for batch in &self.batches {
                    self.emitter.render_batch(
                        batch.texture,
                        &records[batch.start..batch.end()],
                        &mut self.stats,
                    );
                }
            }
        }

        self.queue.reset();
        self.last_stats = self.stats;
        tracing::debug!(
            "Frame ended: {} sprites, {} batches, {} draw calls",
            self.stats.sprites,
            self.stats.batches,
            self.stats.draw_calls
        );
        Ok(self.stats)
    }

    /// Bind pipeline, buffers and uniforms ahead of the frame's draws.
    fn prepare(&mut self, blend: BlendMode) -> BatchResult<()> {
        let device = self.emitter.device().clone();
        let pipeline = self.pipelines.get_or_create(device.as_ref(), blend)?;
        let uniforms = SpriteUniforms::new(to_gpu(&self.transform), device.viewport_size());
        self.emitter.prepare(pipeline, &uniforms);
        Ok(())
    }

    /// Global transform applied to every sprite, in pixel space.
    ///
    /// Takes effect at the next point where device state is prepared: the
    /// next `end` of a queued frame, or the next immediate-mode `begin`.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn is_active(&self) -> bool {
        self.frame.is_some()
    }

    /// Sort mode of the active frame.
    pub fn sort_mode(&self) -> Option<SortMode> {
        self.frame.map(|frame| frame.sort_mode)
    }

    /// Sprites waiting for `end`.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Current ring slot; persists across frames.
    pub fn ring_cursor(&self) -> u32 {
        self.emitter.cursor()
    }

    /// Statistics of the last completed frame.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Load textures for sprites and call `on_ready` once all have settled.
    pub fn load_sprites<F>(&self, sources: &[SpriteSource], on_ready: F)
    where
        F: FnOnce(LoadReport),
    {
        self.loader
            .load_sprites(self.emitter.device().as_ref(), sources, on_ready);
    }
}
