//! Byte readers for texture sources.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::error::{AssetError, AssetResult};

/// Future type for async byte loading.
pub type BytesFuture = Pin<Box<dyn Future<Output = AssetResult<Vec<u8>>> + Send + 'static>>;

/// Trait for loading bytes from a path.
pub trait BytesReader: Send + Sync {
    /// Read all bytes from a path.
    fn read_bytes(&self, path: &Path) -> BytesFuture;
}

/// File reader resolving relative paths against a base directory.
///
/// Reads are blocking and wrapped in ready futures.
pub struct FileReader {
    base_path: PathBuf,
}

impl FileReader {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    pub fn read_bytes_sync(&self, path: &Path) -> AssetResult<Vec<u8>> {
        let full_path = self.resolve_path(path);
        std::fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound {
                    path: full_path.display().to_string(),
                }
            } else {
                AssetError::IoError {
                    path: full_path.clone(),
                    source: e,
                }
            }
        })
    }
}

impl Default for FileReader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl BytesReader for FileReader {
    fn read_bytes(&self, path: &Path) -> BytesFuture {
        let result = self.read_bytes_sync(path);
        Box::pin(async move { result })
    }
}
