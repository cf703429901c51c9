//! Batch sizing configuration.

use std::fmt;

/// Largest ring size whose vertices can still be addressed by 16-bit indices.
pub const MAX_RING_SPRITES: u32 = u16::MAX as u32 / 4 + 1;

/// Sizing knobs for a sprite batch.
///
/// `max_batch_size` is both the ring buffer capacity (in sprites) and the
/// largest number of quads a single draw call may cover. When the space left
/// at the ring cursor is smaller than `min_batch_size`, that tail is skipped
/// and the cursor rewinds to slot 0 instead of issuing a tiny draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub max_batch_size: u32,
    pub min_batch_size: u32,
    /// Number of sprites that may be queued between `begin` and `end`.
    pub queue_capacity: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            max_batch_size: 200,
            min_batch_size: 20,
            queue_capacity: 200,
        }
    }
}

impl BatchConfig {
    pub fn with_queue_capacity(mut self, queue_capacity: u32) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_batch_sizes(mut self, max_batch_size: u32, min_batch_size: u32) -> Self {
        self.max_batch_size = max_batch_size;
        self.min_batch_size = min_batch_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_batch_size == 0 {
            return Err(ConfigError::ZeroMinBatchSize);
        }
        if self.min_batch_size > self.max_batch_size {
            return Err(ConfigError::MinExceedsMax {
                min: self.min_batch_size,
                max: self.max_batch_size,
            });
        }
        if self.max_batch_size > MAX_RING_SPRITES {
            return Err(ConfigError::RingTooLarge {
                max: self.max_batch_size,
                limit: MAX_RING_SPRITES,
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

/// Rejected [`BatchConfig`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroMinBatchSize,
    MinExceedsMax { min: u32, max: u32 },
    RingTooLarge { max: u32, limit: u32 },
    ZeroQueueCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMinBatchSize => write!(f, "min_batch_size must be at least 1"),
            ConfigError::MinExceedsMax { min, max } => write!(
                f,
                "min_batch_size ({}) must not exceed max_batch_size ({})",
                min, max
            ),
            ConfigError::RingTooLarge { max, limit } => write!(
                f,
                "max_batch_size ({}) exceeds the 16-bit index limit of {} sprites",
                max, limit
            ),
            ConfigError::ZeroQueueCapacity => write!(f, "queue_capacity must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
