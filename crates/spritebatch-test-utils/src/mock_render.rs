//! Mock implementation of RenderDevice for testing.
//!
//! Records every device call without touching a GPU. Buffer writes are also
//! applied to an in-memory copy of the buffer so tests can decode the exact
//! bytes the engine uploaded.

use std::ops::Range;

use parking_lot::Mutex;
use wgpu::*;

use crate::{gpu_types::*, render_device::*};

/// Records a device call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        size: usize,
    },
    CreateTexture {
        texture: TextureId,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    WriteTexture {
        texture: TextureId,
        size: usize,
    },
    CreatePipeline {
        label: Option<String>,
        blend: Option<BlendState>,
    },
    BindPipeline {
        pipeline_id: usize,
    },
    BindVertexBuffer {
        buffer_id: usize,
    },
    BindIndexBuffer {
        buffer_id: usize,
    },
    SetUniforms {
        uniforms: SpriteUniforms,
    },
    BindTexture {
        texture: TextureId,
    },
    DrawIndexed {
        first_index: u32,
        index_count: u32,
    },
}

/// An indexed draw as seen by the device, with the texture bound at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDraw {
    pub texture: Option<TextureId>,
    pub first_index: u32,
    pub index_count: u32,
}

impl MockDraw {
    /// First quad (ring slot) covered by this draw.
    pub fn first_quad(&self) -> u32 {
        self.first_index / 6
    }

    /// Number of quads covered by this draw.
    pub fn quads(&self) -> u32 {
        self.index_count / 6
    }
}

#[derive(Debug, Clone)]
struct MockBuffer {
    size: u64,
    usage: BufferUsages,
    data: Vec<u8>,
}

/// Mock implementation of RenderDevice for testing.
///
/// Methods take `&self` but need to mutate internal state, so everything sits
/// behind `parking_lot::Mutex`, which keeps the mock `Send + Sync`.
///
/// # Example
///
/// ```rust
/// use spritebatch_test_utils::{MockRenderDevice, RenderDevice, TextureId};
///
/// let mock = MockRenderDevice::new();
/// mock.bind_texture(TextureId(7));
/// mock.draw_indexed(0..12);
///
/// let draws = mock.draws();
/// assert_eq!(draws.len(), 1);
/// assert_eq!(draws[0].texture, Some(TextureId(7)));
/// assert_eq!(draws[0].quads(), 2);
/// ```
pub struct MockRenderDevice {
    calls: Mutex<Vec<RenderCall>>,
    buffers: Mutex<Vec<MockBuffer>>,
    viewport: Mutex<(u32, u32)>,
    next_texture_id: Mutex<u64>,
    next_pipeline_id: Mutex<usize>,
    pipeline_failure: Mutex<Option<DeviceError>>,
}

impl MockRenderDevice {
    pub fn new() -> Self {
        Self::with_viewport(800, 600)
    }

    pub fn with_viewport(width: u32, height: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            buffers: Mutex::new(Vec::new()),
            viewport: Mutex::new((width, height)),
            next_texture_id: Mutex::new(1),
            next_pipeline_id: Mutex::new(0),
            pipeline_failure: Mutex::new(None),
        }
    }

    /// Make the next pipeline creation fail with `error`.
    pub fn fail_next_pipeline(&self, error: DeviceError) {
        *self.pipeline_failure.lock() = Some(error);
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        *self.viewport.lock() = (width, height);
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBuffer { .. }))
    }

    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    pub fn count_texture_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    pub fn count_pipeline_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreatePipeline { .. }))
    }

    pub fn count_draws(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::DrawIndexed { .. }))
    }

    fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Every indexed draw in call order, paired with the texture bound at the time.
    pub fn draws(&self) -> Vec<MockDraw> {
        let mut bound = None;
        let mut draws = Vec::new();
        for call in self.calls.lock().iter() {
            match call {
                RenderCall::BindTexture { texture } => bound = Some(*texture),
                RenderCall::DrawIndexed {
                    first_index,
                    index_count,
                } => draws.push(MockDraw {
                    texture: bound,
                    first_index: *first_index,
                    index_count: *index_count,
                }),
                _ => {}
            }
        }
        draws
    }

    /// The most recently bound vertex buffer.
    pub fn bound_vertex_buffer(&self) -> Option<usize> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::BindVertexBuffer { buffer_id } => Some(*buffer_id),
            _ => None,
        })
    }

    /// The most recently bound index buffer.
    pub fn bound_index_buffer(&self) -> Option<usize> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::BindIndexBuffer { buffer_id } => Some(*buffer_id),
            _ => None,
        })
    }

    /// The most recently uploaded uniforms.
    pub fn last_uniforms(&self) -> Option<SpriteUniforms> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::SetUniforms { uniforms } => Some(*uniforms),
            _ => None,
        })
    }

    /// Current bytes of a mock buffer, with every write applied.
    pub fn buffer_contents(&self, buffer_id: usize) -> Option<Vec<u8>> {
        self.buffers
            .lock()
            .get(buffer_id)
            .map(|buffer| buffer.data.clone())
    }

    pub fn buffer_usage(&self, buffer_id: usize) -> Option<BufferUsages> {
        self.buffers.lock().get(buffer_id).map(|buffer| buffer.usage)
    }
}

impl Default for MockRenderDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderDevice for MockRenderDevice {
    fn create_sprite_pipeline(
        &self,
        desc: &SpritePipelineDescriptor<'_>,
    ) -> Result<GpuRenderPipeline, DeviceError> {
        if let Some(error) = self.pipeline_failure.lock().take() {
            return Err(error);
        }

        let mut id = self.next_pipeline_id.lock();
        let pipeline_id = *id;
        *id += 1;

        self.calls.lock().push(RenderCall::CreatePipeline {
            label: desc.label.map(|s| s.to_string()),
            blend: desc.blend,
        });

        Ok(GpuRenderPipeline::mock(pipeline_id))
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<GpuBuffer, DeviceError> {
        let mut buffers = self.buffers.lock();
        let id = buffers.len();

        buffers.push(MockBuffer {
            size: desc.size,
            usage: desc.usage,
            data: vec![0; desc.size as usize],
        });

        self.calls.lock().push(RenderCall::CreateBuffer {
            size: desc.size,
            usage: desc.usage,
        });

        Ok(GpuBuffer::mock(id, desc.size))
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> Result<GpuTexture, DeviceError> {
        if desc.size.width == 0 || desc.size.height == 0 {
            return Err(DeviceError::TextureCreation(format!(
                "zero-sized texture {}x{}",
                desc.size.width, desc.size.height
            )));
        }

        let mut next = self.next_texture_id.lock();
        let texture = TextureId(*next);
        *next += 1;

        self.calls.lock().push(RenderCall::CreateTexture {
            texture,
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });

        Ok(GpuTexture::mock(texture, desc.size.width, desc.size.height))
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };

        if let Some(mock) = self.buffers.lock().get_mut(buffer_id) {
            let start = offset as usize;
            let end = start + data.len();
            assert!(
                end as u64 <= mock.size,
                "write of {} bytes at offset {} overflows buffer of {} bytes",
                data.len(),
                offset,
                mock.size
            );
            mock.data[start..end].copy_from_slice(data);
        }

        self.calls.lock().push(RenderCall::WriteBuffer {
            buffer_id,
            offset,
            size: data.len(),
        });
    }

    fn write_texture(&self, texture: &GpuTexture, rgba: &[u8]) {
        self.calls.lock().push(RenderCall::WriteTexture {
            texture: texture.id(),
            size: rgba.len(),
        });
    }

    fn bind_pipeline(&self, pipeline: &GpuRenderPipeline) {
        if let Some(pipeline_id) = pipeline.mock_id() {
            self.calls
                .lock()
                .push(RenderCall::BindPipeline { pipeline_id });
        }
    }

    fn bind_vertex_buffer(&self, buffer: &GpuBuffer) {
        if let Some(buffer_id) = buffer.mock_id() {
            self.calls
                .lock()
                .push(RenderCall::BindVertexBuffer { buffer_id });
        }
    }

    fn bind_index_buffer(&self, buffer: &GpuBuffer) {
        if let Some(buffer_id) = buffer.mock_id() {
            self.calls
                .lock()
                .push(RenderCall::BindIndexBuffer { buffer_id });
        }
    }

    fn set_uniforms(&self, uniforms: &SpriteUniforms) {
        self.calls.lock().push(RenderCall::SetUniforms {
            uniforms: *uniforms,
        });
    }

    fn bind_texture(&self, texture: TextureId) {
        self.calls.lock().push(RenderCall::BindTexture { texture });
    }

    fn draw_indexed(&self, indices: Range<u32>) {
        self.calls.lock().push(RenderCall::DrawIndexed {
            first_index: indices.start,
            index_count: indices.end - indices.start,
        });
    }

    fn viewport_size(&self) -> (u32, u32) {
        *self.viewport.lock()
    }
}
