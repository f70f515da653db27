use crate::tracker::point::Point2D;

/// Single-slot history held by the position tracker.
///
/// Only the immediately previous tracked point is retained. Each processed
/// frame overwrites it; nothing accumulates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackerState {
    previous_position: Option<Point2D>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous frame's tracked point, if any frame has been processed.
    #[inline]
    pub fn previous_position(&self) -> Option<Point2D> {
        self.previous_position
    }

    /// Store `current` as the new history and return what it replaced.
    #[inline]
    pub fn advance(&mut self, current: Point2D) -> Option<Point2D> {
        self.previous_position.replace(current)
    }

    pub fn reset(&mut self) {
        self.previous_position = None;
    }
}
