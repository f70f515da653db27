//! Single-object position and speed tracking over a live detection stream.
//!
//! Each frame is run through a [`Detector`], the first detection is reduced to
//! a normalized center point (or [`FALLBACK_POSITION`] on a miss), and the
//! distance to the previous frame's point is scaled by the frame rate into a
//! screen-relative speed.
//!
//! ```
//! use swingtrack_rs::{Detection, PositionTracker, TrackerConfig};
//!
//! let mut tracker = PositionTracker::new(TrackerConfig::default());
//! tracker.update(&[Detection::new(0.0, 0.0, 0.0, 0.0, 0.9)]);
//! let update = tracker.update(&[Detection::new(1.0, 0.0, 0.0, 0.0, 0.9)]);
//! assert_eq!(update.speed(), Some(30.0));
//! ```

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::{ConfigError, SessionError, SourceError};
pub use integration::{
    ChannelSink, DetectionBuilder, Detector, DisplayTransform, Frame, FrameSource, IntoDetections,
    Origin, Readout, ReplaySource, ScriptedDetector, ScriptedFailure, Session, SessionConfig,
    SessionState, SinkReceiver, SpeedSink, TrackerPipeline,
};
pub use tracker::{
    Detection, FALLBACK_POSITION, NormalizedBoundingBox, Point2D, PositionTracker, SpeedSample,
    TrackUpdate, TrackerConfig, TrackerState, estimate_speed, reduce_detections, select_primary,
};
