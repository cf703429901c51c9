//! Error types for the sprite batching engine.

use std::fmt;

use spritebatch_core::ConfigError;
use spritebatch_test_utils::DeviceError;

use crate::batch::SortMode;

/// Errors surfaced by [`SpriteBatch`](crate::SpriteBatch).
#[derive(Debug, Clone, PartialEq)]
pub enum BatchError {
    /// `draw` was called with the sprite queue already full.
    ///
    /// The frame is still active and the queued sprites are intact; the
    /// caller can `end` the frame to flush them and start another.
    CapacityExceeded { capacity: u32 },

    /// `draw` or `end` was called outside a `begin`/`end` pair.
    NoActiveFrame,

    /// The sort mode is declared but has no implementation.
    UnsupportedSortMode(SortMode),

    /// The batch configuration was rejected before any resource was created.
    InvalidConfig(ConfigError),

    /// The device refused to create a shader, pipeline or buffer.
    ResourceCreation(DeviceError),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::CapacityExceeded { capacity } => write!(
                f,
                "Sprite queue is full ({} sprites); end the frame or raise queue_capacity",
                capacity
            ),
            BatchError::NoActiveFrame => write!(f, "No active frame; call begin() first"),
            BatchError::UnsupportedSortMode(mode) => {
                write!(f, "Sort mode {:?} is not supported", mode)
            }
            BatchError::InvalidConfig(err) => write!(f, "Invalid batch configuration: {}", err),
            BatchError::ResourceCreation(err) => write!(f, "Resource creation failed: {}", err),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::InvalidConfig(err) => Some(err),
            BatchError::ResourceCreation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DeviceError> for BatchError {
    fn from(err: DeviceError) -> Self {
        BatchError::ResourceCreation(err)
    }
}

impl From<ConfigError> for BatchError {
    fn from(err: ConfigError) -> Self {
        BatchError::InvalidConfig(err)
    }
}

/// Result type alias for batching operations.
pub type BatchResult<T> = Result<T, BatchError>;
