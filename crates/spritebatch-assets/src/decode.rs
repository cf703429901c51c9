//! Image decoding into GPU-ready RGBA8 pixels.

use crate::error::{AssetError, AssetResult};

/// Tightly packed RGBA8 pixels, rows stored bottom-up.
///
/// Rows are flipped at decode time so that texture coordinate `v = 1` samples
/// the top of the source image. The sprite packer emits UVs with that
/// convention (texel row 0 maps to `v = 1`), so the flip happens here once
/// and never per sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode PNG or JPEG bytes.
pub fn decode_rgba(label: &str, bytes: &[u8]) -> AssetResult<DecodedImage> {
    let decoded = image::load_from_memory(bytes).map_err(|e| AssetError::DecodeFailed {
        source: label.to_string(),
        message: e.to_string(),
    })?;

    let mut rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::InvalidDimensions {
            source: label.to_string(),
            width,
            height,
        });
    }

    image::imageops::flip_vertical_in_place(&mut rgba);

    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_flips_rows() {
        let mut image = RgbaImage::new(1, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));

        let decoded = decode_rgba("two_rows", &png_bytes(&image)).unwrap();

        assert_eq!((decoded.width, decoded.height), (1, 2));
        // Bottom row first.
        assert_eq!(&decoded.rgba[..4], &[0, 0, 255, 255]);
        assert_eq!(&decoded.rgba[4..], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_rgba("garbage", b"not an image").unwrap_err();
        assert!(matches!(err, AssetError::DecodeFailed { .. }));
        assert!(err.to_string().contains("garbage"));
    }
}
