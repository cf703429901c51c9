//! Graphics device contract for the sprite batching engine.
//!
//! The batching engine never talks to `wgpu` directly. It goes through the
//! narrow [`RenderDevice`] trait defined here: create buffers, textures and
//! a sprite pipeline, write byte ranges into buffers, bind state, and issue
//! indexed draws.
//!
//! - [`RenderDevice`] - the device trait
//! - GPU wrapper types ([`GpuBuffer`], [`GpuTexture`], [`GpuRenderPipeline`]) - real or mock
//! - `MockRenderDevice` - recording implementation (requires the `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use spritebatch_test_utils::{MockRenderDevice, RenderDevice};
//! use wgpu::*;
//!
//! let mock = MockRenderDevice::new();
//! let buffer = mock
//!     .create_buffer(&BufferDescriptor {
//!         label: Some("test_buffer"),
//!         size: 1024,
//!         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
//!         mapped_at_creation: false,
//!     })
//!     .unwrap();
//! mock.write_buffer(&buffer, 0, &[1, 2, 3, 4]);
//!
//! assert_eq!(mock.count_buffer_writes(), 1);
//! assert!(buffer.is_mock());
//! # }
//! ```
//!
//! # Design
//!
//! All wrapper types are owned and cheap to clone, so no device lifetime
//! leaks into the engine. Devices take `&self` and use interior mutability,
//! which keeps the trait object-safe (`dyn RenderDevice`).

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_device;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_device::*;
