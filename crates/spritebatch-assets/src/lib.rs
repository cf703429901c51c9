//! Texture loading for the sprite batching engine.
//!
//! Requests are described by [`SpriteSource`]s (files on disk or in-memory
//! bytes). The [`TextureLoader`] reads and decodes each one, uploads it
//! through a [`RenderDevice`](spritebatch_test_utils::RenderDevice), and
//! reports the outcome through a [`LoadTracker`]. The completion callback
//! fires exactly once, after every request has either produced a texture or
//! been recorded as a failure.

pub mod decode;
pub mod error;
pub mod io;
pub mod loader;
pub mod source;
pub mod tracker;

pub use decode::DecodedImage;
pub use error::{AssetError, AssetResult};
pub use io::{BytesReader, FileReader};
pub use loader::{LoadedTexture, TextureLoader};
pub use source::SpriteSource;
pub use tracker::{LoadReport, LoadTracker, SlotState};
