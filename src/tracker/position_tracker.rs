//! Single-object position tracker with one frame of history.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ConfigError;
use crate::tracker::point::Point2D;
use crate::tracker::reduction::{Detection, reduce_detections};
use crate::tracker::speed::{SpeedSample, estimate_speed};
use crate::tracker::track_state::TrackerState;

/// Configuration for the PositionTracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Nominal frames per second of the frame source
    pub frame_rate: f32,
    /// Divisor applied to normalized distances before scaling by frame rate.
    /// Positions are already normalized to frame width, so this stays `1.0`
    /// unless speed should be expressed in some other unit.
    pub normalization_factor: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            normalization_factor: 1.0,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ConfigError::FrameRate(self.frame_rate));
        }
        if !self.normalization_factor.is_finite() || self.normalization_factor <= 0.0 {
            return Err(ConfigError::NormalizationFactor(self.normalization_factor));
        }
        Ok(())
    }
}

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackUpdate {
    /// First frame since start or reset; there is no speed yet.
    NoDataYet { position: Point2D },
    /// Speed between this frame and the previous one.
    Sample(SpeedSample),
}

impl TrackUpdate {
    pub fn current_position(&self) -> Point2D {
        match self {
            Self::NoDataYet { position } => *position,
            Self::Sample(sample) => sample.current_position,
        }
    }

    pub fn speed(&self) -> Option<f32> {
        match self {
            Self::NoDataYet { .. } => None,
            Self::Sample(sample) => Some(sample.speed),
        }
    }

    pub fn sample(&self) -> Option<&SpeedSample> {
        match self {
            Self::NoDataYet { .. } => None,
            Self::Sample(sample) => Some(sample),
        }
    }
}

/// Tracks one object across frames and estimates its frame-to-frame speed.
///
/// Not internally synchronized: a single tracker must only ever see one frame
/// at a time.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    state: TrackerState,
    frame_id: u64,
    config: TrackerConfig,
}

impl PositionTracker {
    /// Create a tracker with an already validated configuration.
    ///
    /// Use [`PositionTracker::try_new`] for configuration from untrusted input.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            state: TrackerState::new(),
            frame_id: 0,
            config,
        }
    }

    pub fn try_new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of frames processed since creation or the last reset.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    pub fn previous_position(&self) -> Option<Point2D> {
        self.state.previous_position()
    }

    /// Process one frame's detections.
    ///
    /// An empty slice is a miss, not an error; the tracked point falls back to
    /// [`FALLBACK_POSITION`](crate::FALLBACK_POSITION). History is advanced
    /// exactly once whether or not a speed was produced.
    pub fn update(&mut self, detections: &[Detection]) -> TrackUpdate {
        self.frame_id += 1;
        let current = reduce_detections(detections);

        let update = match self.state.advance(current) {
            None => TrackUpdate::NoDataYet { position: current },
            Some(previous) => TrackUpdate::Sample(SpeedSample {
                current_position: current,
                previous_position: previous,
                speed: estimate_speed(
                    &previous,
                    &current,
                    self.config.frame_rate,
                    self.config.normalization_factor,
                ),
            }),
        };

        trace!(
            frame = self.frame_id,
            detections = detections.len(),
            x = current.x,
            y = current.y,
            speed = update.speed(),
            "tracker updated"
        );
        update
    }

    /// Forget the previous point, as if no frame had been processed.
    pub fn reset(&mut self) {
        self.state.reset();
        self.frame_id = 0;
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
