//! Builder for creating Detection objects from various input formats.

use crate::tracker::{Detection, NormalizedBoundingBox};

/// Builder for creating `Detection` objects from various input formats.
///
/// Coordinates are normalized unless [`DetectionBuilder::pixels`] is set, in
/// which case they are divided by the frame size on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    score: Option<f32>,
    frame_size: Option<(u32, u32)>,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (x, y, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Interpret coordinates as pixels of a `width` x `height` frame.
    pub fn pixels(mut self, width: u32, height: u32) -> Self {
        self.frame_size = Some((width, height));
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Build the final `Detection`, clamped into the unit square.
    pub fn build(self) -> Detection {
        let bbox = match self.frame_size {
            Some((width, height)) => NormalizedBoundingBox::from_pixels(
                self.x1,
                self.y1,
                self.x2 - self.x1,
                self.y2 - self.y1,
                width,
                height,
            ),
            None => NormalizedBoundingBox::from_corners(self.x1, self.y1, self.x2, self.y2),
        };
        Detection::from_rect(bbox, self.score)
    }
}
