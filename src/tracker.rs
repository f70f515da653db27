mod point;
mod position_tracker;
mod rect;
mod reduction;
mod speed;
mod track_state;

pub use point::Point2D;
pub use position_tracker::{PositionTracker, TrackUpdate, TrackerConfig};
pub use rect::NormalizedBoundingBox;
pub use reduction::{Detection, FALLBACK_POSITION, reduce_detections, select_primary};
pub use speed::{SpeedSample, estimate_speed};
pub use track_state::TrackerState;
