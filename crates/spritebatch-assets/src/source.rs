//! Where sprite textures come from.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The source of a sprite texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpriteSource {
    /// Load from a file, relative to the reader's base path unless absolute.
    Disk { path: PathBuf },

    /// Decode bytes that are already in memory.
    Bytes {
        /// Identifier used in logs and errors.
        id: String,
        data: Arc<[u8]>,
    },
}

impl SpriteSource {
    pub fn disk(path: impl AsRef<Path>) -> Self {
        SpriteSource::Disk {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn bytes(id: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        SpriteSource::Bytes {
            id: id.into(),
            data: data.into(),
        }
    }

    /// Human-readable name for logs and error messages.
    pub fn label(&self) -> String {
        match self {
            SpriteSource::Disk { path } => path.display().to_string(),
            SpriteSource::Bytes { id, .. } => id.clone(),
        }
    }
}

impl From<&str> for SpriteSource {
    fn from(path: &str) -> Self {
        SpriteSource::disk(path)
    }
}

impl From<PathBuf> for SpriteSource {
    fn from(path: PathBuf) -> Self {
        SpriteSource::Disk { path }
    }
}
