//! Detector replaying recorded per-frame results.

use thiserror::Error;

use super::{Detector, Frame};
use crate::tracker::Detection;

/// Recorded detector failure for a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("recorded detection failure at frame {frame}")]
pub struct ScriptedFailure {
    pub frame: u64,
}

/// Detector answering from a script indexed by [`Frame::index`].
///
/// `None` entries replay a detector error. Frames past the end of the script
/// have no detections.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    script: Vec<Option<Vec<Detection>>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Option<Vec<Detection>>>) -> Self {
        Self { script }
    }

    /// Script where every frame succeeds.
    pub fn from_detections(frames: impl IntoIterator<Item = Vec<Detection>>) -> Self {
        Self::new(frames.into_iter().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl Detector for ScriptedDetector {
    type Error = ScriptedFailure;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        let entry = usize::try_from(frame.index)
            .ok()
            .and_then(|i| self.script.get(i));
        match entry {
            Some(Some(detections)) => Ok(detections.clone()),
            Some(None) => Err(ScriptedFailure { frame: frame.index }),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_lookup() {
        let det = Detection::new(0.1, 0.1, 0.1, 0.1, 0.9);
        let mut detector = ScriptedDetector::new(vec![Some(vec![det]), None, Some(vec![])]);

        assert_eq!(detector.detect(&Frame::empty(0)), Ok(vec![det]));
        assert_eq!(
            detector.detect(&Frame::empty(1)),
            Err(ScriptedFailure { frame: 1 })
        );
        assert_eq!(detector.detect(&Frame::empty(2)), Ok(vec![]));
        assert_eq!(detector.detect(&Frame::empty(99)), Ok(vec![]));
    }
}
