//! TrackerPipeline for combining detection with position tracking.

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::tracker::{PositionTracker, TrackUpdate, TrackerConfig};

use super::{Detector, Frame};

/// A combined tracker that bundles detection inference with the
/// `PositionTracker`.
///
/// This struct provides a convenient way to run end-to-end tracking by
/// combining any `Detector` with the tracker. Detector failures never escape
/// [`process_frame`](Self::process_frame).
pub struct TrackerPipeline<D: Detector> {
    detector: D,
    tracker: PositionTracker,
    failed_frames: u64,
}

impl<D: Detector> TrackerPipeline<D> {
    /// Create a new tracking pipeline with the given detector and tracker config.
    pub fn new(detector: D, config: TrackerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            detector,
            tracker: PositionTracker::try_new(config)?,
            failed_frames: 0,
        })
    }

    /// Create a new tracking pipeline with default tracker configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self {
            detector,
            tracker: PositionTracker::default(),
            failed_frames: 0,
        }
    }

    /// Process a single frame and return the tracker update.
    ///
    /// This method runs detection on the frame and then updates the tracker
    /// with the detected objects. A detector error is logged and the frame is
    /// processed as if nothing had been detected.
    pub fn process_frame(&mut self, frame: &Frame) -> TrackUpdate {
        let detections = match self.detector.detect(frame) {
            Ok(detections) => detections,
            Err(e) => {
                self.failed_frames += 1;
                warn!(frame = frame.index, error = %e, "Detection failed; treating frame as empty");
                Vec::new()
            }
        };

        let update = self.tracker.update(&detections);
        debug!(
            frame = frame.index,
            detections = detections.len(),
            speed = update.speed(),
            "Frame processed"
        );
        update
    }

    /// Number of frames whose detection call returned an error.
    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    /// Clear tracker history and failure count.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.failed_frames = 0;
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut PositionTracker {
        &mut self.tracker
    }
}
