//! Integration module for connecting frame sources, detection backends and
//! display sinks with the position tracker.
//!
//! This module provides traits and utilities for integrating various inference
//! backends (Burn, ONNX Runtime, etc.) and running them as a live session.

mod builder;
mod detector;
mod display;
mod frame;
mod pipeline;
mod replay;
mod session;
mod sink;
mod source;

pub use builder::DetectionBuilder;
pub use detector::{Detector, IntoDetections};
pub use display::{DisplayTransform, Origin, Readout};
pub use frame::Frame;
pub use pipeline::TrackerPipeline;
pub use replay::{ScriptedDetector, ScriptedFailure};
pub use session::{Session, SessionConfig, SessionState};
pub use sink::{ChannelSink, SinkReceiver, SpeedSink};
pub use source::{FrameSource, ReplaySource};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel, RawDetection};
