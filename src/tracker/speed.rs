//! One-step speed estimation between consecutive tracked points.

use serde::{Deserialize, Serialize};

use crate::tracker::point::Point2D;

/// Speed derived from two consecutive tracked points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    /// Tracked point of the frame just processed
    pub current_position: Point2D,
    /// Tracked point of the frame before it
    pub previous_position: Point2D,
    /// Distance per frame interval, scaled by frame rate. Always finite and `>= 0`.
    pub speed: f32,
}

/// Screen-relative speed between `previous` and `current`.
///
/// `distance / normalization_factor * frame_rate`, where distance is the
/// Euclidean distance in normalized units. With positions already normalized
/// against frame width the factor is `1.0`. Both scalars must be positive;
/// [`TrackerConfig::validate`](crate::TrackerConfig::validate) enforces this.
pub fn estimate_speed(
    previous: &Point2D,
    current: &Point2D,
    frame_rate: f32,
    normalization_factor: f32,
) -> f32 {
    let distance = current.distance_to(previous);
    let speed = distance / normalization_factor * frame_rate;
    if speed.is_finite() && speed >= 0.0 {
        speed
    } else {
        0.0
    }
}
