use crate::math::Vec2;

/// An axis-aligned rectangle stored as edges: `(left, top, right, bottom)`.
///
/// Used both for texel-space source regions (origin at the top-left of the
/// image) and screen-space destinations (origin at the top-left of the
/// viewport, y growing downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle with its top-left corner at `position` and the given size.
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            left: position.x,
            top: position.y,
            right: position.x + size.x,
            bottom: position.y + size.y,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Move every edge by `offset`.
    pub fn translated(self, offset: Vec2) -> Self {
        Self {
            left: self.left + offset.x,
            top: self.top + offset.y,
            right: self.right + offset.x,
            bottom: self.bottom + offset.y,
        }
    }

    /// Divide the horizontal edges by `size.x` and the vertical edges by `size.y`.
    pub fn normalized_by(self, size: Vec2) -> Self {
        Self {
            left: self.left / size.x,
            top: self.top / size.y,
            right: self.right / size.x,
            bottom: self.bottom / size.y,
        }
    }
}
