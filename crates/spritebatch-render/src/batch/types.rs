//! Sort modes, draw options and the resolved per-sprite record.

use glam::Vec2;
use spritebatch_assets::LoadedTexture;
use spritebatch_core::Rect;
use spritebatch_test_utils::TextureId;

/// Opaque white.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// How queued sprites are ordered before batching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Draw in the order sprites were queued.
    #[default]
    Deferred,
    /// Highest depth first, so lower depths are drawn on top.
    BackToFront,
    /// Lowest depth first.
    FrontToBack,
    /// Every `draw` is emitted on the spot, one draw call per sprite.
    Immediate,
    /// Group by texture. Declared but not implemented.
    Texture,
}

impl SortMode {
    /// Whether `draw` queues sprites instead of emitting them.
    pub fn is_deferred(self) -> bool {
        !matches!(self, SortMode::Immediate)
    }
}

/// Where a sprite lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Destination {
    /// Top-left corner; the size comes from the source rectangle.
    Point(Vec2),
    /// Explicit screen rectangle, used verbatim.
    Rect(Rect),
}

impl Destination {
    pub fn anchor(&self) -> Vec2 {
        match self {
            Destination::Point(point) => *point,
            Destination::Rect(rect) => rect.top_left(),
        }
    }
}

impl From<Vec2> for Destination {
    fn from(point: Vec2) -> Self {
        Destination::Point(point)
    }
}

impl From<Rect> for Destination {
    fn from(rect: Rect) -> Self {
        Destination::Rect(rect)
    }
}

/// Caller-facing description of one sprite draw.
///
/// Only the texture and its size are required. Everything else has a
/// default: the full texture as source, opaque white, no rotation, depth 0.
///
/// ```
/// use glam::Vec2;
/// use spritebatch_render::{SpriteOptions, TextureId};
///
/// let options = SpriteOptions::new(TextureId(1), Vec2::new(64.0, 32.0))
///     .at(Vec2::new(100.0, 50.0))
///     .with_origin(Vec2::new(32.0, 16.0))
///     .with_rotation(0.5)
///     .with_depth(2);
/// let record = options.resolve();
/// assert_eq!(record.origin, Vec2::new(100.0, 50.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteOptions {
    pub texture: TextureId,
    pub texture_size: Vec2,
    pub destination: Destination,
    /// Texel-space region, `(0, 0)` at the top-left of the image.
    pub source: Option<Rect>,
    pub color: [u8; 4],
    /// Pivot relative to the destination's top-left corner.
    pub origin: Option<Vec2>,
    /// Radians.
    pub rotation: f32,
    pub depth: u32,
    /// Multiplies the destination size, keeping its top-left corner fixed.
    pub scale: Option<Vec2>,
}

impl SpriteOptions {
    pub fn new(texture: TextureId, texture_size: Vec2) -> Self {
        Self {
            texture,
            texture_size,
            destination: Destination::Point(Vec2::ZERO),
            source: None,
            color: WHITE,
            origin: None,
            rotation: 0.0,
            depth: 0,
            scale: None,
        }
    }

    /// Draw a loaded texture with its top-left corner at `position`.
    pub fn from_texture(texture: &LoadedTexture, position: Vec2) -> Self {
        Self::new(texture.id(), texture.size()).at(position)
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.destination = Destination::Point(position);
        self
    }

    pub fn with_destination(mut self, destination: impl Into<Destination>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_source(mut self, source: Rect) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Resolve into a fresh record.
    pub fn resolve(&self) -> SpriteRecord {
        let mut record = SpriteRecord::EMPTY;
        self.resolve_into(&mut record);
        record
    }

    /// Overwrite `record` with the fully resolved sprite.
    ///
    /// The destination is taken verbatim from a rectangle, or built from the
    /// anchor point and the source size. A scale then resizes it about the
    /// anchor, and an origin shifts it so that the pivot lands on the anchor.
    pub fn resolve_into(&self, record: &mut SpriteRecord) {
        let source = self
            .source
            .unwrap_or_else(|| Rect::from_position_size(Vec2::ZERO, self.texture_size));
        let anchor = self.destination.anchor();

        let mut destination = match self.destination {
            Destination::Rect(rect) => rect,
            Destination::Point(point) => Rect::from_position_size(point, source.size()),
        };

        if let Some(scale) = self.scale {
            destination = Rect::from_position_size(anchor, destination.size() * scale);
        }

        let origin = match self.origin {
            Some(pivot) => {
                destination = destination.translated(-pivot);
                destination.top_left() + pivot
            }
            None => destination.top_left(),
        };

        record.texture = self.texture;
        record.texture_size = self.texture_size;
        record.source = source;
        record.destination = destination;
        record.color = self.color;
        record.origin = origin;
        record.rotation = self.rotation;
        record.depth = self.depth;
    }
}

/// A sprite ready to be sorted and packed.
///
/// Lives in a preallocated queue slot and is overwritten in place by the
/// next frame's draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRecord {
    pub texture: TextureId,
    pub texture_size: Vec2,
    /// Texels; normalized only when packed.
    pub source: Rect,
    /// Screen space.
    pub destination: Rect,
    pub color: [u8; 4],
    /// Absolute screen-space pivot for `rotation`.
    pub origin: Vec2,
    pub rotation: f32,
    pub depth: u32,
}

impl SpriteRecord {
    pub const EMPTY: SpriteRecord = SpriteRecord {
        texture: TextureId(0),
        texture_size: Vec2::ZERO,
        source: Rect::ZERO,
        destination: Rect::ZERO,
        color: WHITE,
        origin: Vec2::ZERO,
        rotation: 0.0,
        depth: 0,
    };
}

impl Default for SpriteRecord {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Counters for one emitted frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Sprites drawn.
    pub sprites: u32,
    /// Same-texture runs found after sorting.
    pub batches: u32,
    pub draw_calls: u32,
    /// Ring slots skipped when the cursor rewound.
    pub discarded_slots: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SpriteOptions {
        SpriteOptions::new(TextureId(7), Vec2::new(64.0, 32.0))
    }

    #[test]
    fn test_defaults() {
        let record = options().at(Vec2::new(10.0, 20.0)).resolve();
        assert_eq!(record.source, Rect::new(0.0, 0.0, 64.0, 32.0));
        assert_eq!(record.destination, Rect::new(10.0, 20.0, 74.0, 52.0));
        assert_eq!(record.color, WHITE);
        assert_eq!(record.rotation, 0.0);
        assert_eq!(record.depth, 0);
        assert_eq!(record.origin, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_explicit_rect_is_verbatim() {
        let rect = Rect::new(1.0, 2.0, 300.0, 400.0);
        let record = options().with_destination(rect).resolve();
        assert_eq!(record.destination, rect);
    }

    #[test]
    fn test_point_uses_source_size() {
        let record = options()
            .with_source(Rect::new(16.0, 8.0, 48.0, 24.0))
            .at(Vec2::new(5.0, 5.0))
            .resolve();
        assert_eq!(record.destination, Rect::new(5.0, 5.0, 37.0, 21.0));
    }

    #[test]
    fn test_scale_keeps_anchor() {
        let record = options()
            .at(Vec2::new(10.0, 10.0))
            .with_scale(Vec2::new(2.0, 0.5))
            .resolve();
        assert_eq!(record.destination, Rect::new(10.0, 10.0, 138.0, 26.0));

        let rect = Rect::new(0.0, 0.0, 10.0, 20.0);
        let record = options()
            .with_destination(rect)
            .with_scale(Vec2::splat(3.0))
            .resolve();
        assert_eq!(record.destination, Rect::new(0.0, 0.0, 30.0, 60.0));
    }

    #[test]
    fn test_origin_moves_pivot_onto_anchor() {
        let record = options()
            .at(Vec2::new(100.0, 100.0))
            .with_origin(Vec2::new(32.0, 16.0))
            .with_rotation(1.0)
            .resolve();
        assert_eq!(record.destination, Rect::new(68.0, 84.0, 132.0, 116.0));
        assert_eq!(record.origin, Vec2::new(100.0, 100.0));
        assert_eq!(record.rotation, 1.0);
    }

    #[test]
    fn test_scale_then_origin() {
        let record = options()
            .at(Vec2::new(0.0, 0.0))
            .with_scale(Vec2::splat(2.0))
            .with_origin(Vec2::new(64.0, 32.0))
            .resolve();
        assert_eq!(record.destination, Rect::new(-64.0, -32.0, 64.0, 32.0));
        assert_eq!(record.origin, Vec2::ZERO);
    }

    #[test]
    fn test_resolve_into_overwrites_previous_frame() {
        let mut slot = options()
            .with_origin(Vec2::splat(4.0))
            .with_depth(9)
            .with_color([1, 2, 3, 4])
            .resolve();
        SpriteOptions::new(TextureId(2), Vec2::new(8.0, 8.0)).resolve_into(&mut slot);
        assert_eq!(slot.texture, TextureId(2));
        assert_eq!(slot.depth, 0);
        assert_eq!(slot.color, WHITE);
        assert_eq!(slot.origin, Vec2::ZERO);
    }

    #[test]
    fn test_only_immediate_is_not_deferred() {
        assert!(SortMode::Deferred.is_deferred());
        assert!(SortMode::BackToFront.is_deferred());
        assert!(!SortMode::Immediate.is_deferred());
    }
}
