//! Burn inference backend for object detection.
//!
//! This module provides a `BurnDetector` that implements `Detector` for
//! running object detection models built with the Burn framework. Model
//! outputs are in input-tensor pixels and are normalized to `[0, 1]` before
//! they reach the tracker.
//!
//! # Example
//!
//! ```ignore
//! use swingtrack_rs::integration::{BurnDetector, BurnModel, RawDetection};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> Vec<RawDetection> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyYoloModel::load("model.bin");
//! let detector = BurnDetector::new(model, Default::default());
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use thiserror::Error;

use super::{DetectionBuilder, Detector, Frame};
use crate::tracker::Detection;

/// Error type for Burn detection failures.
#[derive(Error, Debug, Clone)]
pub enum BurnDetectorError {
    /// Frame buffer does not match the model's input shape.
    #[error("invalid input dimensions: expected {expected:?}, got {got:?}")]
    InvalidInputDimensions {
        expected: (u32, u32, u32),
        got: (u32, u32, u32),
    },
    #[error("preprocessing error: {0}")]
    PreprocessingError(String),
}

/// Raw detection output from the model.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box in input pixels: [x1, y1, x2, y2] or [cx, cy, w, h] depending on model
    pub bbox: [f32; 4],
    /// Confidence score
    pub score: f32,
    /// Class ID (optional, for multi-class detection)
    pub class_id: Option<usize>,
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor of shape [batch, channels, height, width].
    ///
    /// Returned detections should already be ranked; the tracker follows
    /// the first one.
    fn forward(&self, input: Tensor<B, 4>) -> Vec<RawDetection>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 640, 640) // Default YOLO input size
    }

    /// Whether bbox output is in XYWH format (vs TLBR).
    fn bbox_is_xywh(&self) -> bool {
        true // Most YOLO variants use XYWH
    }
}

/// Burn-based object detector implementing `Detector`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    conf_threshold: f32,
    class_filter: Option<usize>,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            conf_threshold: 0.25,
            class_filter: None,
        }
    }

    /// Set the confidence threshold for filtering detections.
    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    /// Keep only detections of one class, e.g. the ball.
    pub fn with_class_filter(mut self, class_id: usize) -> Self {
        self.class_filter = Some(class_id);
        self
    }

    /// Convert a frame's raw CHW bytes to a Burn tensor.
    pub fn preprocess(&self, frame: &Frame) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        let (width, height) = (frame.width, frame.height);
        let expected_len = (width as usize) * (height as usize) * (channels as usize);

        if frame.data.len() != expected_len {
            let plane = (height as usize * channels as usize).max(1);
            return Err(BurnDetectorError::InvalidInputDimensions {
                expected: (channels, height, width),
                got: (channels, height, (frame.data.len() / plane) as u32),
            });
        }

        if height != target_h || width != target_w {
            return Err(BurnDetectorError::PreprocessingError(format!(
                "Input size {}x{} doesn't match model size {}x{}. Resize not implemented.",
                width, height, target_w, target_h
            )));
        }

        // Convert u8 to f32 and normalize to [0, 1]
        let data: Vec<f32> = frame.data.iter().map(|&x| x as f32 / 255.0).collect();

        Ok(
            Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
                1,
                channels as usize,
                height as usize,
                width as usize,
            ]),
        )
    }

    /// Convert raw model outputs to normalized detections, keeping model order.
    fn postprocess(&self, raw_detections: Vec<RawDetection>) -> Vec<Detection> {
        let (_, height, width) = self.model.input_size();
        raw_detections
            .into_iter()
            .filter(|d| d.score >= self.conf_threshold)
            .filter(|d| self.class_filter.is_none_or(|c| d.class_id == Some(c)))
            .map(|d| {
                let builder = DetectionBuilder::new().score(d.score).pixels(width, height);
                if self.model.bbox_is_xywh() {
                    builder
                        .xywh(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                        .build()
                } else {
                    builder
                        .tlbr(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                        .build()
                }
            })
            .collect()
    }
}

impl<B: Backend, M: BurnModel<B>> Detector for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        let tensor = self.preprocess(frame)?;
        let raw_detections = self.model.forward(tensor);
        Ok(self.postprocess(raw_detections))
    }
}
