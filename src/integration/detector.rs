//! Trait for object detection inference backends.

use ndarray::Array2;

use super::Frame;
use crate::tracker::{Detection, NormalizedBoundingBox};

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the tracker. The
/// call is synchronous; an asynchronous backend must complete its request
/// before returning.
///
/// # Example
///
/// ```ignore
/// use swingtrack_rs::{Detection, Detector, Frame};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl Detector for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return normalized detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Detector {
    /// Error type for detection failures.
    ///
    /// Errors are logged by the pipeline and the frame is treated as having
    /// no detections.
    type Error: std::fmt::Display;

    /// Run inference on one frame.
    ///
    /// # Returns
    /// Detections in normalized `[0, 1]` coordinates, in the detector's own
    /// ranking order, or an error.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    type Error = D::Error;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        (**self).detect(frame)
    }
}

/// Helper trait for converting model-specific outputs to `Detection`.
///
/// Implement this for your model's output format to enable easy conversion.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// Rows of `[x, y, width, height]` or `[x, y, width, height, score]` in
/// normalized coordinates. Rows with fewer than four columns yield nothing.
impl IntoDetections for Array2<f32> {
    fn into_detections(self) -> Vec<Detection> {
        if self.ncols() < 4 {
            return Vec::new();
        }
        self.rows()
            .into_iter()
            .map(|row| {
                let bbox = NormalizedBoundingBox::new(row[0], row[1], row[2], row[3]);
                Detection::from_rect(bbox, row.get(4).copied())
            })
            .collect()
    }
}
