//! Sprite batching engine.
//!
//! A frame flows through these stages:
//!
//! | Stage | Module | Work |
//! |-------|--------|------|
//! | Queue | [`queue`] | Resolve draw options into preallocated records |
//! | Sort | [`sort`] | Bucket pass by depth (back-to-front / front-to-back) |
//! | Assemble | [`assemble`] | Split into maximal same-texture runs |
//! | Emit | [`emit`], [`ring`] | Pack runs into the vertex ring, one draw per span |
//!
//! [`SpriteBatch`] ties them together behind `begin` / `draw` / `end`.

pub mod assemble;
mod batcher;
pub mod emit;
pub mod pipeline;
pub mod queue;
pub mod ring;
pub mod sort;
mod types;
pub mod vertex;

pub use assemble::{BatchRange, build_batches};
pub use batcher::SpriteBatch;
pub use ring::{RingCursor, RingSpan};
pub use sort::DepthSorter;
pub use types::*;
pub use vertex::SpriteVertex;
