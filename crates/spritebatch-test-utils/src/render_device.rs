//! The graphics device contract consumed by the sprite batching engine.

use std::fmt;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::{BufferDescriptor, TextureDescriptor};

use crate::gpu_types::*;

/// Uniform block shared by every sprite draw.
///
/// ```text
/// Offset | Field     | Size
/// -------|-----------|------
/// 0      | transform | 64 bytes (mat4x4<f32>, column-major)
/// 64     | viewport  | 8 bytes (vec2<f32>, pixels)
/// 72     | _padding  | 8 bytes
/// Total: 80 bytes
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteUniforms {
    pub transform: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub _padding: [f32; 2],
}

impl SpriteUniforms {
    pub const IDENTITY: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    pub fn new(transform: [[f32; 4]; 4], viewport: (u32, u32)) -> Self {
        Self {
            transform,
            viewport: [viewport.0 as f32, viewport.1 as f32],
            _padding: [0.0; 2],
        }
    }
}

/// Everything the device needs to build the sprite pipeline.
#[derive(Debug, Clone)]
pub struct SpritePipelineDescriptor<'a> {
    pub label: Option<&'a str>,
    /// WGSL source with `vs_main` and `fs_main` entry points.
    pub shader_source: &'a str,
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
    pub blend: Option<wgpu::BlendState>,
}

/// Failures reported by the device while creating resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The shader module failed to parse or validate.
    ShaderCompilation(String),
    /// The render pipeline failed to link.
    PipelineCreation(String),
    BufferCreation(String),
    TextureCreation(String),
    /// A draw was issued with no render target attached.
    NoTarget,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShaderCompilation(msg) => write!(f, "Shader compilation failed: {}", msg),
            Self::PipelineCreation(msg) => write!(f, "Render pipeline creation failed: {}", msg),
            Self::BufferCreation(msg) => write!(f, "Buffer creation failed: {}", msg),
            Self::TextureCreation(msg) => write!(f, "Texture creation failed: {}", msg),
            Self::NoTarget => write!(f, "No render target attached to the device"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// Trait abstracting the graphics device.
///
/// The device is a stateful, non-reentrant resource: the engine binds a
/// pipeline, buffers and exactly one texture, then issues an indexed draw.
/// Bindings persist until replaced.
///
/// Methods take `&self`; implementations use interior mutability so that the
/// device can be shared between the engine and the texture loader.
///
/// # Example
///
/// ```rust,no_run
/// use spritebatch_test_utils::{DeviceError, RenderDevice};
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload(device: &dyn RenderDevice) -> Result<(), DeviceError> {
///     let buffer = device.create_buffer(&BufferDescriptor {
///         label: None,
///         size: 16,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     })?;
///     device.write_buffer(&buffer, 0, &[0u8; 16]);
///     Ok(())
/// }
/// ```
pub trait RenderDevice: Send + Sync {
    // Resource creation

    /// Compile the sprite shader and link it into a render pipeline.
    fn create_sprite_pipeline(
        &self,
        desc: &SpritePipelineDescriptor<'_>,
    ) -> Result<GpuRenderPipeline, DeviceError>;

    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<GpuBuffer, DeviceError>;

    /// Create a 2D RGBA8 texture that can be bound for sprite drawing.
    fn create_texture(&self, desc: &TextureDescriptor) -> Result<GpuTexture, DeviceError>;

    // Data upload

    /// Write `data` into `buffer` starting at byte `offset`, without reallocating.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    /// Replace the full contents of `texture` with tightly packed RGBA8 rows.
    fn write_texture(&self, texture: &GpuTexture, rgba: &[u8]);

    // State binding

    fn bind_pipeline(&self, pipeline: &GpuRenderPipeline);

    fn bind_vertex_buffer(&self, buffer: &GpuBuffer);

    fn bind_index_buffer(&self, buffer: &GpuBuffer);

    fn set_uniforms(&self, uniforms: &SpriteUniforms);

    /// Bind `texture` to the sprite sampler slot.
    fn bind_texture(&self, texture: TextureId);

    // Drawing

    /// Draw triangles from the bound 16-bit index buffer.
    fn draw_indexed(&self, indices: Range<u32>);

    /// Current viewport size in pixels.
    fn viewport_size(&self) -> (u32, u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<SpriteUniforms>(), 80);
    }

    #[test]
    fn test_uniforms_viewport() {
        let uniforms = SpriteUniforms::new(SpriteUniforms::IDENTITY, (800, 600));
        assert_eq!(uniforms.viewport, [800.0, 600.0]);
    }

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::ShaderCompilation("unknown identifier".into());
        assert!(err.to_string().contains("unknown identifier"));
    }
}
