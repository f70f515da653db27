//! Display-space conversion and readout formatting.
//!
//! Tracker math stays in normalized detector coordinates. Everything that
//! depends on the display surface (its size, which way its y axis points)
//! lives here and is applied only to values on their way to a screen.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tracker::{Point2D, TrackUpdate};

/// Which corner the detector's normalized origin refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// y grows upward (Vision-style detectors)
    #[default]
    BottomLeft,
    /// y grows downward (image-style detectors)
    TopLeft,
}

/// Maps normalized detector points onto a top-left-origin display surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    width: f32,
    height: f32,
    origin: Origin,
}

impl DisplayTransform {
    pub fn new(width: f32, height: f32, origin: Origin) -> Result<Self, ConfigError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::DisplaySize { width, height });
        }
        Ok(Self {
            width,
            height,
            origin,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Point in display units with y growing downward.
    pub fn to_display(&self, point: Point2D) -> Point2D {
        let y = match self.origin {
            Origin::BottomLeft => 1.0 - point.y,
            Origin::TopLeft => point.y,
        };
        Point2D::new(point.x * self.width, y * self.height)
    }

    /// Normalized speed converted to display units per second.
    pub fn speed_to_display(&self, speed: f32) -> f32 {
        speed * self.width
    }
}

/// The values shown to the user for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Readout {
    pub speed: f32,
    pub curr_x: f32,
    pub curr_y: f32,
    pub prev_x: f32,
    pub prev_y: f32,
}

impl Readout {
    /// Readout for an update, or `None` while there is no speed yet.
    ///
    /// Positions go through `transform` when one is given; speed is always
    /// reported in normalized units.
    pub fn from_update(update: &TrackUpdate, transform: Option<&DisplayTransform>) -> Option<Self> {
        let sample = update.sample()?;
        let (curr, prev) = match transform {
            Some(t) => (
                t.to_display(sample.current_position),
                t.to_display(sample.previous_position),
            ),
            None => (sample.current_position, sample.previous_position),
        };
        Some(Self {
            speed: sample.speed,
            curr_x: curr.x,
            curr_y: curr.y,
            prev_x: prev.x,
            prev_y: prev.y,
        })
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Speed: {:.2}  CurrX: {:.2}  CurrY: {:.2}  PrevX: {:.2}  PrevY: {:.2}",
            self.speed, self.curr_x, self.curr_y, self.prev_x, self.prev_y
        )
    }
}
