//! Depth ordering for queued sprites.
//!
//! Depths are small non-negative integers, so ordering is a bucket pass per
//! depth value rather than a comparison sort. Each pass moves every sprite
//! with the current depth up to the low-water mark, in queue order, and
//! leaves the rest behind it in queue order. Passes only visit depths that
//! are still present below the mark and stop once a single sprite is left,
//! so cost is `O(len * distinct_depths)` however large the depth values are.

use super::types::{SortMode, SpriteRecord};

/// Reorders sprites in place according to a [`SortMode`].
///
/// Holds a scratch buffer so sorting a frame never allocates once warm.
#[derive(Debug, Default)]
pub struct DepthSorter {
    scratch: Vec<SpriteRecord>,
}

impl DepthSorter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Sort `records` for `mode`.
    ///
    /// `max_depth` bounds the buckets visited. Sprites deeper than it are
    /// left after all sorted sprites, in their original order. Deferred and
    /// immediate modes keep queue order; texture mode is not implemented and
    /// also keeps it.
    pub fn sort(&mut self, records: &mut [SpriteRecord], mode: SortMode, max_depth: u32) {
        match mode {
            SortMode::FrontToBack => self.partition(records, max_depth, false),
            SortMode::BackToFront => self.partition(records, max_depth, true),
            SortMode::Deferred | SortMode::Immediate | SortMode::Texture => {}
        }
    }

    fn partition(&mut self, records: &mut [SpriteRecord], max_depth: u32, descending: bool) {
        let mut placed = 0;
        // A lone unplaced sprite is already in its final slot.
        while placed + 1 < records.len() {
            let unplaced = records[placed..]
                .iter()
                .map(|record| record.depth)
                .filter(|&depth| depth <= max_depth);
            let next = if descending {
                unplaced.max()
            } else {
                unplaced.min()
            };
            let Some(depth) = next else {
                break;
            };

            self.scratch.clear();
            let mut write = placed;
            for read in placed..records.len() {
                let record = records[read];
                if record.depth == depth {
                    records[write] = record;
                    write += 1;
                } else {
                    self.scratch.push(record);
                }
            }

            records[write..].copy_from_slice(&self.scratch);
            placed = write;
        }
    }
}
