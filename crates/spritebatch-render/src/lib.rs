//! Sprite batching engine.
//!
//! Turns a frame's worth of individual sprite draws into as few GPU draw
//! calls as the requested ordering allows:
//!
//! - sprites are queued into a fixed-capacity arena between `begin` and `end`;
//! - depth sort modes reorder them with a stable bucket pass;
//! - consecutive sprites sharing a texture become one batch;
//! - batches are packed into a fixed ring of vertex slots and drawn with a
//!   static 16-bit index buffer, one draw per contiguous span.
//!
//! The device is reached only through
//! [`RenderDevice`](spritebatch_test_utils::RenderDevice). [`GraphicsContext`]
//! implements it on top of wgpu; tests use the recording mock device.

pub mod batch;
pub mod blend;
mod context;
mod context_impl;
pub mod error;

pub use batch::{
    BatchRange, DepthSorter, Destination, FrameStats, RingCursor, RingSpan, SortMode,
    SpriteBatch, SpriteOptions, SpriteRecord, SpriteVertex, WHITE,
};
pub use blend::BlendMode;
pub use context::{GraphicsContext, GraphicsContextDescriptor, GraphicsError};
pub use error::{BatchError, BatchResult};

pub use spritebatch_assets::{AssetError, LoadReport, LoadedTexture, SpriteSource, TextureLoader};
pub use spritebatch_core::{BatchConfig, Rect};
pub use spritebatch_test_utils::{DeviceError, RenderDevice, TextureId};
