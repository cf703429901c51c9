//! Vertex format and quad packing.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::types::SpriteRecord;

pub const VERTICES_PER_SPRITE: usize = 4;
pub const INDICES_PER_SPRITE: u32 = 6;

/// One corner of a sprite quad.
///
/// ```text
/// Offset | Field    | Size
/// -------|----------|------
/// 0      | position | 8 bytes (vec2<f32>, pixels)
/// 8      | uv       | 8 bytes (vec2<f32>)
/// 16     | color    | 4 bytes (unorm8x4)
/// 20     | rotation | 4 bytes (f32, radians)
/// 24     | origin   | 8 bytes (vec2<f32>, pixels)
/// Total: 32 bytes
/// ```
///
/// All four corners of a sprite carry the same color, rotation and origin.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
    pub rotation: f32,
    pub origin: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<SpriteVertex>(), 32);

/// Bytes occupied by one packed sprite.
pub const SPRITE_STRIDE: u64 = (VERTICES_PER_SPRITE * std::mem::size_of::<SpriteVertex>()) as u64;

impl SpriteVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            0 => Float32x2, // position
            1 => Float32x2, // uv
            2 => Unorm8x4,  // color
            3 => Float32,   // rotation
            4 => Float32x2, // origin
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

/// Build the four corners of `record`: top-left, bottom-left, top-right,
/// bottom-right.
///
/// The texel-space source is normalized by the texture size and flipped
/// vertically, so the top edge of the source gets `v = 1 - top / height`.
pub fn pack_quad(record: &SpriteRecord) -> [SpriteVertex; 4] {
    let uv = record.source.normalized_by(record.texture_size);
    let (u0, u1) = (uv.left, uv.right);
    let (v0, v1) = (1.0 - uv.top, 1.0 - uv.bottom);

    let dest = record.destination;
    let corner = |x: f32, y: f32, u: f32, v: f32| SpriteVertex {
        position: [x, y],
        uv: [u, v],
        color: record.color,
        rotation: record.rotation,
        origin: record.origin.to_array(),
    };

    [
        corner(dest.left, dest.top, u0, v0),
        corner(dest.left, dest.bottom, u0, v1),
        corner(dest.right, dest.top, u1, v0),
        corner(dest.right, dest.bottom, u1, v1),
    ]
}

/// Pack `records` back to back into `out`, replacing its contents.
pub fn pack_sprites(records: &[SpriteRecord], out: &mut Vec<SpriteVertex>) {
    out.clear();
    out.extend(records.iter().flat_map(pack_quad));
}

/// Static index list for `sprites` quads: two triangles per quad.
///
/// Quad `k` uses vertices `4k..4k+4` as `(0, 1, 2)` and `(1, 3, 2)`.
pub fn build_indices(sprites: u32) -> Vec<u16> {
    (0..sprites)
        .flat_map(|k| {
            let base = (k * VERTICES_PER_SPRITE as u32) as u16;
            [base, base + 1, base + 2, base + 1, base + 3, base + 2]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use spritebatch_core::Rect;
    use spritebatch_test_utils::TextureId;

    use crate::batch::types::SpriteOptions;

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 32);
        assert_eq!(SPRITE_STRIDE, 128);
    }

    #[test]
    fn test_layout_offsets() {
        let layout = SpriteVertex::layout();
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16, 20, 24]);
        assert_eq!(layout.array_stride, 32);
    }

    #[test]
    fn test_full_texture_uvs_are_flipped() {
        let record = SpriteOptions::new(TextureId(1), Vec2::new(64.0, 32.0)).resolve();
        let quad = pack_quad(&record);

        assert_eq!(quad[0].uv, [0.0, 1.0]); // top-left
        assert_eq!(quad[1].uv, [0.0, 0.0]); // bottom-left
        assert_eq!(quad[2].uv, [1.0, 1.0]); // top-right
        assert_eq!(quad[3].uv, [1.0, 0.0]); // bottom-right
    }

    #[test]
    fn test_sub_rect_uvs() {
        let record = SpriteOptions::new(TextureId(1), Vec2::new(100.0, 64.0))
            .with_source(Rect::new(25.0, 16.0, 75.0, 48.0))
            .resolve();
        let quad = pack_quad(&record);
        assert_eq!(quad[0].uv, [0.25, 0.75]);
        assert_eq!(quad[3].uv, [0.75, 0.25]);
    }

    #[test]
    fn test_corner_order_and_shared_fields() {
        let record = SpriteOptions::new(TextureId(1), Vec2::new(10.0, 20.0))
            .at(Vec2::new(5.0, 6.0))
            .with_color([10, 20, 30, 40])
            .with_rotation(0.25)
            .resolve();
        let quad = pack_quad(&record);

        assert_eq!(quad[0].position, [5.0, 6.0]);
        assert_eq!(quad[1].position, [5.0, 26.0]);
        assert_eq!(quad[2].position, [15.0, 6.0]);
        assert_eq!(quad[3].position, [15.0, 26.0]);
        for vertex in &quad {
            assert_eq!(vertex.color, [10, 20, 30, 40]);
            assert_eq!(vertex.rotation, 0.25);
            assert_eq!(vertex.origin, [5.0, 6.0]);
        }
    }

    #[test]
    fn test_indices() {
        let indices = build_indices(2);
        assert_eq!(indices, vec![0, 1, 2, 1, 3, 2, 4, 5, 6, 5, 7, 6]);
        assert_eq!(build_indices(16384).last(), Some(&65534));
    }

    #[test]
    fn test_color_bytes_in_place() {
        let record = SpriteOptions::new(TextureId(1), Vec2::ONE)
            .with_color([1, 2, 3, 4])
            .resolve();
        let mut out = Vec::new();
        pack_sprites(&[record, record], &mut out);
        assert_eq!(out.len(), 8);

        let bytes: &[u8] = bytemuck::cast_slice(&out);
        assert_eq!(&bytes[16..20], &[1, 2, 3, 4]);
        assert_eq!(&bytes[128 + 16..128 + 20], &[1, 2, 3, 4]);
    }
}
