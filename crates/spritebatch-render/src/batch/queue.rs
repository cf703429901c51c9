//! Fixed-capacity sprite queue.

use crate::error::{BatchError, BatchResult};

use super::types::{SpriteOptions, SpriteRecord};

/// Preallocated arena of sprite records.
///
/// Queuing a sprite resolves it into the next free slot and bumps the
/// active count; ending a frame rewinds the count. Slots are never
/// reallocated, only overwritten.
#[derive(Debug)]
pub struct SpriteQueue {
    slots: Vec<SpriteRecord>,
    len: usize,
    max_depth: u32,
}

impl SpriteQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![SpriteRecord::EMPTY; capacity],
            len: 0,
            max_depth: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest depth seen since the last [`reset`](Self::reset).
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Resolve `options` into the next slot.
    ///
    /// Fails without touching any slot when the queue is full.
    pub fn push(&mut self, options: &SpriteOptions) -> BatchResult<usize> {
        let index = self.len;
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(BatchError::CapacityExceeded {
                capacity: self.slots.len() as u32,
            });
        };
        options.resolve_into(slot);
        self.max_depth = self.max_depth.max(options.depth);
        self.len += 1;
        Ok(index)
    }

    /// Resolve `options` into the first free slot without queuing it.
    ///
    /// Used by immediate mode, where the sprite is packed straight away.
    pub fn stage(&mut self, options: &SpriteOptions) -> BatchResult<&SpriteRecord> {
        let capacity = self.slots.len() as u32;
        let slot = self
            .slots
            .get_mut(self.len)
            .ok_or(BatchError::CapacityExceeded { capacity })?;
        options.resolve_into(slot);
        self.max_depth = self.max_depth.max(options.depth);
        Ok(slot)
    }

    pub fn records(&self) -> &[SpriteRecord] {
        &self.slots[..self.len]
    }

    pub fn records_mut(&mut self) -> &mut [SpriteRecord] {
        &mut self.slots[..self.len]
    }

    /// Forget every queued sprite. Returns how many were dropped.
    pub fn reset(&mut self) -> usize {
        let dropped = self.len;
        self.len = 0;
        self.max_depth = 0;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use spritebatch_test_utils::TextureId;

    fn sprite(texture: u64, depth: u32) -> SpriteOptions {
        SpriteOptions::new(TextureId(texture), Vec2::splat(16.0)).with_depth(depth)
    }

    #[test]
    fn test_push_until_full() {
        let mut queue = SpriteQueue::with_capacity(3);
        for i in 0..3 {
            assert_eq!(queue.push(&sprite(i, 0)).unwrap(), i as usize);
        }

        let err = queue.push(&sprite(99, 0)).unwrap_err();
        assert_eq!(err, BatchError::CapacityExceeded { capacity: 3 });

        let textures: Vec<_> = queue.records().iter().map(|r| r.texture).collect();
        assert_eq!(textures, vec![TextureId(0), TextureId(1), TextureId(2)]);
    }

    #[test]
    fn test_max_depth_tracks_and_resets() {
        let mut queue = SpriteQueue::with_capacity(4);
        queue.push(&sprite(1, 3)).unwrap();
        queue.push(&sprite(1, 7)).unwrap();
        queue.push(&sprite(1, 2)).unwrap();
        assert_eq!(queue.max_depth(), 7);

        assert_eq!(queue.reset(), 3);
        assert!(queue.is_empty());
        assert_eq!(queue.max_depth(), 0);
        assert_eq!(queue.capacity(), 4);
    }

    #[test]
    fn test_stage_does_not_queue() {
        let mut queue = SpriteQueue::with_capacity(2);
        let staged = *queue.stage(&sprite(5, 0)).unwrap();
        assert_eq!(staged.texture, TextureId(5));
        assert!(queue.is_empty());

        queue.stage(&sprite(6, 0)).unwrap();
        assert_eq!(queue.len(), 0);
    }
}
