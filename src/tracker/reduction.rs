//! Reduction of a frame's detections to the single tracked point.

use serde::Serialize;

use crate::tracker::point::Point2D;
use crate::tracker::rect::NormalizedBoundingBox;

/// Tracked point used for a frame with no detections: the frame center.
///
/// Substituting this point keeps speed estimation total, at the cost of a
/// spurious speed on the frame after a miss.
pub const FALLBACK_POSITION: Point2D = Point2D::new(0.5, 0.5);

/// Detection input for the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    /// Bounding box in normalized coordinates
    pub bbox: NormalizedBoundingBox,
    /// Detection confidence score, if the detector reports one
    pub score: Option<f32>,
}

impl Detection {
    /// Create a detection from box origin and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32, score: f32) -> Self {
        Self {
            bbox: NormalizedBoundingBox::new(x, y, width, height),
            score: Some(score),
        }
    }

    pub fn from_rect(bbox: NormalizedBoundingBox, score: Option<f32>) -> Self {
        Self { bbox, score }
    }

    #[inline]
    pub fn center(&self) -> Point2D {
        self.bbox.center()
    }
}

/// Pick the detection that stands in for the tracked object.
///
/// This is the first detection in the order the detector returned them.
/// Scores are carried but deliberately not used for ranking, and there is
/// no class filtering.
#[inline]
pub fn select_primary(detections: &[Detection]) -> Option<&Detection> {
    detections.first()
}

/// Reduce a frame's detections to one tracked point.
///
/// Returns [`FALLBACK_POSITION`] when `detections` is empty.
pub fn reduce_detections(detections: &[Detection]) -> Point2D {
    select_primary(detections)
        .map(Detection::center)
        .unwrap_or(FALLBACK_POSITION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_falls_back_to_center() {
        assert_eq!(reduce_detections(&[]), FALLBACK_POSITION);
        assert_eq!(FALLBACK_POSITION, Point2D::new(0.5, 0.5));
    }

    #[test]
    fn test_first_detection_wins_over_higher_score() {
        let detections = [
            Detection::new(0.0, 0.0, 0.2, 0.2, 0.3),
            Detection::new(0.6, 0.6, 0.2, 0.2, 0.99),
        ];
        let p = reduce_detections(&detections);
        assert!((p.x - 0.1).abs() < 1e-6);
        assert!((p.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_detection_without_score() {
        let det = Detection::from_rect(NormalizedBoundingBox::new(0.2, 0.4, 0.2, 0.2), None);
        let p = reduce_detections(&[det]);
        assert!((p.x - 0.3).abs() < 1e-6);
        assert!((p.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_select_primary() {
        let detections = [
            Detection::new(0.1, 0.1, 0.1, 0.1, 0.5),
            Detection::new(0.2, 0.2, 0.1, 0.1, 0.5),
        ];
        assert_eq!(select_primary(&detections), Some(&detections[0]));
        assert_eq!(select_primary(&[]), None);
    }
}
