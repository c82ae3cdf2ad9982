//! Normalized rectangle geometry shared by every extraction stage.
//!
//! Rectangles live in the unit square of the source image with the origin at
//! the bottom-left corner (y grows upward). Pixel coordinates only appear at
//! the presentation boundary, see [`NormalizedRect::to_pixel_rect`].

use serde::{Deserialize, Serialize};

/// Tolerance for rectangles that spill slightly past the unit square.
pub const BOUNDS_EPSILON: f32 = 1e-3;

/// Axis-aligned rectangle in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// One pixel per unit: normalized coordinates used as-is.
    pub const UNIT: ImageSize = ImageSize { width: 1, height: 1 };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Rectangle in pixel space with a top-left origin, as drawn by a UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Check that the rect is finite and lies inside the unit square.
    pub fn is_normalized(&self) -> bool {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());

        finite
            && self.width >= 0.0
            && self.height >= 0.0
            && self.x >= -BOUNDS_EPSILON
            && self.y >= -BOUNDS_EPSILON
            && self.max_x() <= 1.0 + BOUNDS_EPSILON
            && self.max_y() <= 1.0 + BOUNDS_EPSILON
    }

    /// Standard axis-aligned overlap test. Rects that only share an edge do
    /// not intersect.
    pub fn intersects(&self, other: &NormalizedRect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// Grow the rect by `dx` on the left and right and `dy` on the bottom
    /// and top.
    pub fn expand(&self, dx: f32, dy: f32) -> NormalizedRect {
        NormalizedRect {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2.0 * dx,
            height: self.height + 2.0 * dy,
        }
    }

    /// Grow the rect to the right by `dx` and upward by `dy`, keeping the
    /// origin fixed.
    pub fn extend(&self, dx: f32, dy: f32) -> NormalizedRect {
        NormalizedRect {
            x: self.x,
            y: self.y,
            width: self.width + dx,
            height: self.height + dy,
        }
    }

    /// Smallest rect containing both.
    pub fn union(&self, other: &NormalizedRect) -> NormalizedRect {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());

        NormalizedRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// `|a.x - b.x| + |a.y - b.y|` between the two origins.
    pub fn manhattan_distance(&self, other: &NormalizedRect) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Scale to pixel units without flipping the y axis.
    pub fn scaled(&self, size: ImageSize) -> NormalizedRect {
        let (w, h) = (size.width as f32, size.height as f32);
        NormalizedRect {
            x: self.x * w,
            y: self.y * h,
            width: self.width * w,
            height: self.height * h,
        }
    }

    /// Convert to a top-left-origin pixel rect for drawing.
    pub fn to_pixel_rect(&self, size: ImageSize) -> PixelRect {
        let (w, h) = (size.width as f32, size.height as f32);
        PixelRect {
            x: self.x * w,
            y: (1.0 - self.y - self.height) * h,
            width: self.width * w,
            height: self.height * h,
        }
    }
}

/// Free-function form of [`NormalizedRect::intersects`].
pub fn intersects(a: &NormalizedRect, b: &NormalizedRect) -> bool {
    a.intersects(b)
}

/// Free-function form of [`NormalizedRect::expand`].
pub fn expand(rect: &NormalizedRect, dx: f32, dy: f32) -> NormalizedRect {
    rect.expand(dx, dy)
}

/// Free-function form of [`NormalizedRect::union`].
pub fn union(a: &NormalizedRect, b: &NormalizedRect) -> NormalizedRect {
    a.union(b)
}

/// Free-function form of [`NormalizedRect::manhattan_distance`].
pub fn manhattan_distance(a: &NormalizedRect, b: &NormalizedRect) -> f32 {
    a.manhattan_distance(b)
}
