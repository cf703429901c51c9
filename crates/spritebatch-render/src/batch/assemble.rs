//! Grouping sorted sprites into same-texture runs.

use spritebatch_test_utils::TextureId;

use super::types::SpriteRecord;

/// A maximal run of consecutive sprites sharing one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRange {
    pub texture: TextureId,
    /// Index of the first sprite in the queue.
    pub start: usize,
    pub count: usize,
}

impl BatchRange {
    pub fn end(&self) -> usize {
        self.start + self.count
    }
}

/// Split `records` into runs, in queue order, appending them to `batches`.
///
/// A new run starts whenever the texture differs from the previous sprite.
/// Sprites with the same texture that are not adjacent stay in separate
/// runs.
pub fn build_batches(records: &[SpriteRecord], batches: &mut Vec<BatchRange>) {
    let Some(first) = records.first() else {
        return;
    };

    let mut current = first.texture;
    let mut start = 0;

    for (i, record) in records.iter().enumerate().skip(1) {
        if record.texture != current {
            batches.push(BatchRange {
                texture: current,
                start,
                count: i - start,
            });
            current = record.texture;
            start = i;
        }
    }

    // Final run
    batches.push(BatchRange {
        texture: current,
        start,
        count: records.len() - start,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::batch::types::SpriteOptions;

    fn records(textures: &[u64]) -> Vec<SpriteRecord> {
        textures
            .iter()
            .map(|&t| SpriteOptions::new(TextureId(t), Vec2::ONE).resolve())
            .collect()
    }

    fn batches(textures: &[u64]) -> Vec<BatchRange> {
        let mut out = Vec::new();
        build_batches(&records(textures), &mut out);
        out
    }

    #[test]
    fn test_runs_split_on_texture_change() {
        let out = batches(&[1, 1, 2, 2, 2, 1]);
        assert_eq!(
            out,
            vec![
                BatchRange { texture: TextureId(1), start: 0, count: 2 },
                BatchRange { texture: TextureId(2), start: 2, count: 3 },
                BatchRange { texture: TextureId(1), start: 5, count: 1 },
            ]
        );
    }

    #[test]
    fn test_single_run_is_flushed() {
        let out = batches(&[4, 4, 4]);
        assert_eq!(out, vec![BatchRange { texture: TextureId(4), start: 0, count: 3 }]);
    }

    #[test]
    fn test_empty_queue_has_no_runs() {
        assert!(batches(&[]).is_empty());
    }

    #[test]
    fn test_runs_cover_queue_exactly_once() {
        let textures = [3, 1, 1, 2, 3, 3, 3, 1, 2, 2];
        let out = batches(&textures);

        let mut next = 0;
        for batch in &out {
            assert_eq!(batch.start, next);
            assert!(batch.count > 0);
            for i in batch.start..batch.end() {
                assert_eq!(TextureId(textures[i]), batch.texture);
            }
            next = batch.end();
        }
        assert_eq!(next, textures.len());

        for pair in out.windows(2) {
            assert_ne!(pair[0].texture, pair[1].texture);
        }
    }
}
