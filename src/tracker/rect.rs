use serde::Serialize;

use crate::tracker::point::Point2D;

/// Axis-aligned bounding box in normalized `[0, 1]` coordinates.
///
/// The box is stored as an origin corner plus a size. Which corner the origin
/// denotes is the detector's convention (Vision-style detectors report the
/// bottom-left corner, most YOLO exports the top-left); the tracker never
/// reinterprets it.
///
/// Every constructor clamps its input so that:
/// - `width >= 0` and `height >= 0`
/// - `x`, `y`, `x + width` and `y + height` lie within `[0, 1]`
///
/// Non-finite components are treated as `0.0` before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NormalizedBoundingBox {
    /// Origin x coordinate
    pub x: f32,
    /// Origin y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl NormalizedBoundingBox {
    /// Create a box from its origin and dimensions, clamped into the unit square.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let x = unit(x);
        let y = unit(y);
        Self {
            x,
            y,
            width: finite(width).clamp(0.0, 1.0 - x),
            height: finite(height).clamp(0.0, 1.0 - y),
        }
    }

    /// Create a box from two opposite corners `(x1, y1)` and `(x2, y2)`.
    ///
    /// Swapped corners are reordered rather than producing a negative size.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let (x1, x2) = ordered(unit(x1), unit(x2));
        let (y1, y2) = ordered(unit(y1), unit(y2));
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Create a box from its center and dimensions.
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        let (cx, cy) = (finite(cx), finite(cy));
        let (width, height) = (finite(width).abs(), finite(height).abs());
        Self::from_corners(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    /// Create a box from pixel coordinates of a `frame_width` x `frame_height` image.
    ///
    /// A zero-sized frame yields an empty box at the origin.
    pub fn from_pixels(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        if frame_width == 0 || frame_height == 0 {
            return Self::default();
        }
        let fw = frame_width as f32;
        let fh = frame_height as f32;
        Self::from_corners(x / fw, y / fh, (x + width) / fw, (y + height) / fh)
    }

    /// Convert to corner format: `[x1, y1, x2, y2]`.
    #[inline]
    pub fn to_corners(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Center point of the box in the same coordinate space as the box.
    #[inline]
    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// A box with no extent in at least one dimension.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[inline]
fn finite(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

#[inline]
fn unit(v: f32) -> f32 {
    finite(v).clamp(0.0, 1.0)
}

#[inline]
fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}
