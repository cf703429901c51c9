//! Error types for texture loading.

use std::fmt;
use std::path::PathBuf;

use spritebatch_test_utils::DeviceError;

/// Errors that can occur while loading a sprite texture.
#[derive(Debug)]
pub enum AssetError {
    /// The requested file does not exist.
    NotFound {
        path: String,
    },

    /// Failed to read asset bytes.
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The bytes are not a decodable image.
    DecodeFailed {
        source: String,
        message: String,
    },

    /// The image decoded but reported no usable dimensions.
    InvalidDimensions {
        source: String,
        width: u32,
        height: u32,
    },

    /// The device rejected the texture upload.
    Device {
        source: String,
        error: DeviceError,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound { path } => {
                write!(f, "Asset not found: {}", path)
            }
            AssetError::IoError { path, source } => {
                write!(f, "IO error loading '{}': {}", path.display(), source)
            }
            AssetError::DecodeFailed { source, message } => {
                write!(f, "Failed to decode '{}': {}", source, message)
            }
            AssetError::InvalidDimensions {
                source,
                width,
                height,
            } => {
                write!(
                    f,
                    "Unable to get image dimensions for '{}' ({}x{})",
                    source, width, height
                )
            }
            AssetError::Device { source, error } => {
                write!(f, "Device rejected texture '{}': {}", source, error)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::IoError { source, .. } => Some(source),
            AssetError::Device { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Result type alias for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
