//! Reading, decoding and uploading sprite textures.

use glam::Vec2;
use spritebatch_core::profiling::profile_function;
use spritebatch_test_utils::{GpuTexture, RenderDevice, TextureId};

use crate::decode::{DecodedImage, decode_rgba};
use crate::error::{AssetError, AssetResult};
use crate::io::{BytesReader, FileReader};
use crate::source::SpriteSource;
use crate::tracker::{LoadReport, LoadTracker};

/// Format every sprite texture is uploaded as.
pub const SPRITE_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// A texture resident on the device, with the label it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedTexture {
    label: String,
    texture: GpuTexture,
}

impl LoadedTexture {
    pub fn new(label: impl Into<String>, texture: GpuTexture) -> Self {
        Self {
            label: label.into(),
            texture,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id(&self) -> TextureId {
        self.texture.id()
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    /// Texel size as a float vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn texture(&self) -> &GpuTexture {
        &self.texture
    }
}

/// Loads sprite textures and uploads them through a [`RenderDevice`].
pub struct TextureLoader {
    reader: Box<dyn BytesReader>,
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureLoader {
    /// Loader reading files relative to the working directory.
    pub fn new() -> Self {
        Self::with_reader(FileReader::default())
    }

    pub fn with_reader(reader: impl BytesReader + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    /// Read, decode and upload a single texture.
    pub async fn load_one(
        &self,
        device: &dyn RenderDevice,
        source: &SpriteSource,
    ) -> AssetResult<LoadedTexture> {
        let label = source.label();
        let decoded = match source {
            SpriteSource::Disk { path } => {
                let bytes = self.reader.read_bytes(path).await?;
                decode_rgba(&label, &bytes)?
            }
            SpriteSource::Bytes { data, .. } => decode_rgba(&label, data)?,
        };
        upload(device, &label, &decoded)
    }

    /// Load every source and call `on_ready` once all have settled.
    ///
    /// Failures are logged and reported in the [`LoadReport`]; they never
    /// stop the remaining requests from being processed.
    pub fn load_sprites<F>(&self, device: &dyn RenderDevice, sources: &[SpriteSource], on_ready: F)
    where
        F: FnOnce(LoadReport),
    {
        profile_function!();

        let labels = sources.iter().map(SpriteSource::label).collect();
        let mut tracker = LoadTracker::new(labels, on_ready);

        futures_lite::future::block_on(async {
            for (index, source) in sources.iter().enumerate() {
                let result = self.load_one(device, source).await;
                tracker.complete(index, result);
            }
        });
    }
}

/// Create a device texture for `image` and copy its pixels in.
pub fn upload(
    device: &dyn RenderDevice,
    label: &str,
    image: &DecodedImage,
) -> AssetResult<LoadedTexture> {
    let texture = device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SPRITE_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
        .map_err(|error| AssetError::Device {
            source: label.to_string(),
            error,
        })?;

    device.write_texture(&texture, &image.rgba);

    Ok(LoadedTexture::new(label, texture))
}
