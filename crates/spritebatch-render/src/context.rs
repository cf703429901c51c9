use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use parking_lot::{Mutex, RwLock};
use spritebatch_core::alloc::HashMap;
use spritebatch_test_utils::{SpriteUniforms, TextureId};

/// Failures while acquiring a GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// No adapter matched the requested backends and power preference.
    NoAdapter(String),
    /// The adapter refused to create a device.
    DeviceRequest(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::NoAdapter(msg) => write!(f, "Failed to find a suitable GPU adapter: {}", msg),
            GraphicsError::DeviceRequest(msg) => write!(f, "Failed to create device: {}", msg),
        }
    }
}

impl std::error::Error for GraphicsError {}

/// The texture view sprites are drawn into.
pub(crate) struct RenderTarget {
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Bindings in effect for the next draw.
#[derive(Default)]
pub(crate) struct DrawState {
    pub pipeline: Option<wgpu::RenderPipeline>,
    pub vertex_buffer: Option<wgpu::Buffer>,
    pub index_buffer: Option<wgpu::Buffer>,
    pub texture: Option<TextureId>,
}

/// A wgpu device and queue, set up to draw sprites.
///
/// Implements [`RenderDevice`](spritebatch_test_utils::RenderDevice), so it
/// can be handed to a [`SpriteBatch`](crate::SpriteBatch) directly:
///
/// ```rust,no_run
/// use spritebatch_render::{GraphicsContext, SpriteBatch};
///
/// let ctx = GraphicsContext::new_owned_sync().expect("no GPU");
/// let batch = SpriteBatch::new(ctx.clone()).expect("sprite resources");
/// ```
///
/// Every draw is recorded into its own render pass and submitted right
/// away, so vertex data written just before it is visible to it even when
/// the ring reuses the same slots later in the frame.
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub(crate) target_format: wgpu::TextureFormat,
    pub(crate) texture_layout: wgpu::BindGroupLayout,
    pub(crate) uniform_layout: wgpu::BindGroupLayout,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) uniform_bind_group: wgpu::BindGroup,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) textures: RwLock<HashMap<TextureId, wgpu::BindGroup>>,
    pub(crate) next_texture_id: AtomicU64,
    pub(crate) state: Mutex<DrawState>,
    pub(crate) target: Mutex<Option<RenderTarget>>,
}

impl GraphicsContext {
    /// Creates a new graphics context with default settings.
    pub async fn new_owned() -> Result<Arc<Self>, GraphicsError> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Creates a new graphics context synchronously.
    ///
    /// This blocks the current thread until the context is created.
    pub fn new_owned_sync() -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new_owned())
    }

    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        let context = Self::create_context_internal(descriptor).await?;
        Ok(Arc::new(context))
    }

    async fn create_context_internal(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Self, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await
            .map_err(|e| GraphicsError::NoAdapter(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: descriptor.label,
                ..Default::default()
            })
            .await
            .map_err(|e| GraphicsError::DeviceRequest(e.to_string()))?;

        tracing::info!(
            "Created graphics context on {} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_uniforms"),
            size: std::mem::size_of::<SpriteUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_uniform_bg"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: descriptor.texture_filter,
            min_filter: descriptor.texture_filter,
            ..Default::default()
        });

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            target_format: descriptor.target_format,
            texture_layout,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            sampler,
            textures: RwLock::new(HashMap::default()),
            next_texture_id: AtomicU64::new(1),
            state: Mutex::new(DrawState::default()),
            target: Mutex::new(None),
        })
    }

    /// Get device info
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Format of the color targets sprite pipelines render into.
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Draw into `view` from now on. Its size becomes the viewport size.
    ///
    /// The view must use [`target_format`](Self::target_format).
    pub fn set_target(&self, view: wgpu::TextureView, width: u32, height: u32) {
        *self.target.lock() = Some(RenderTarget {
            view,
            width,
            height,
        });
    }

    /// Detach the current target, e.g. before presenting a surface texture.
    pub fn take_target(&self) -> Option<wgpu::TextureView> {
        self.target.lock().take().map(|target| target.view)
    }

    /// Clear the current target to `color`.
    pub fn clear(&self, color: wgpu::Color) {
        let target = self.target.lock();
        let Some(target) = target.as_ref() else {
            tracing::warn!("clear() called with no render target attached");
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_clear"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Number of textures created through this context that can be bound.
    pub fn texture_count(&self) -> usize {
        self.textures.read().len()
    }
}

/// Descriptor for configuring graphics context creation.
pub struct GraphicsContextDescriptor {
    /// GPU backends to use
    pub backends: wgpu::Backends,
    /// Power preference for adapter selection
    pub power_preference: wgpu::PowerPreference,
    /// Whether to force fallback adapter
    pub force_fallback_adapter: bool,
    /// Color format of the targets sprites are drawn into
    pub target_format: wgpu::TextureFormat,
    /// Min/mag filter for sprite textures; nearest keeps pixel art crisp
    pub texture_filter: wgpu::FilterMode,
    /// Optional label for debugging
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            target_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            texture_filter: wgpu::FilterMode::Nearest,
            label: None,
        }
    }
}

impl GraphicsContextDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    pub fn target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.target_format = format;
        self
    }

    pub fn texture_filter(mut self, filter: wgpu::FilterMode) -> Self {
        self.texture_filter = filter;
        self
    }

    pub fn force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}
