//! Frame sources feeding a tracking session.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::SourceError;

use super::Frame;

/// Producer of raw frames at a fixed nominal rate.
///
/// A session calls [`open`](Self::open) when it starts, pulls frames from its
/// worker thread with [`next_frame`](Self::next_frame), and calls
/// [`close`](Self::close) when it stops.
pub trait FrameSource {
    /// Acquire the underlying device.
    ///
    /// Failing here is the only fatal error a session reports.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Block until the next frame is available. `None` ends the stream.
    fn next_frame(&mut self) -> Option<Frame>;

    /// Release the underlying device. Must be safe to call when not open.
    fn close(&mut self) {}

    /// Nominal frames per second.
    fn frame_rate(&self) -> f32;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn open(&mut self) -> Result<(), SourceError> {
        (**self).open()
    }

    fn next_frame(&mut self) -> Option<Frame> {
        (**self).next_frame()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn frame_rate(&self) -> f32 {
        (**self).frame_rate()
    }
}

/// In-memory frame source that replays a fixed list of frames.
///
/// With pacing enabled, frames are released no faster than the nominal frame
/// rate, which mimics a live camera.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: VecDeque<Frame>,
    frame_rate: f32,
    paced: bool,
    last_emit: Option<Instant>,
    is_open: bool,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = Frame>, frame_rate: f32) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            frame_rate,
            paced: false,
            last_emit: None,
            is_open: false,
        }
    }

    /// `count` empty frames numbered from 0.
    pub fn empty_frames(count: u64, frame_rate: f32) -> Self {
        Self::new((0..count).map(Frame::empty), frame_rate)
    }

    pub fn with_pacing(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    fn frame_interval(&self) -> Option<Duration> {
        if self.frame_rate.is_finite() && self.frame_rate > 0.0 {
            Some(Duration::from_secs_f32(1.0 / self.frame_rate))
        } else {
            None
        }
    }
}

impl FrameSource for ReplaySource {
    fn open(&mut self) -> Result<(), SourceError> {
        self.is_open = true;
        self.last_emit = None;
        Ok(())
    }

    fn next_frame(&mut self) -> Option<Frame> {
        if !self.is_open {
            return None;
        }
        let frame = self.frames.pop_front()?;

        if self.paced {
            if let (Some(last), Some(interval)) = (self.last_emit, self.frame_interval()) {
                let elapsed = last.elapsed();
                if elapsed < interval {
                    std::thread::sleep(interval - elapsed);
                }
            }
            self.last_emit = Some(Instant::now());
        }

        Some(frame)
    }

    fn close(&mut self) {
        self.is_open = false;
    }

    fn frame_rate(&self) -> f32 {
        self.frame_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_requires_open() {
        let mut source = ReplaySource::empty_frames(2, 30.0);
        assert!(source.next_frame().is_none());

        source.open().unwrap();
        assert_eq!(source.next_frame().map(|f| f.index), Some(0));
        assert_eq!(source.next_frame().map(|f| f.index), Some(1));
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_close_pauses_replay() {
        let mut source = ReplaySource::empty_frames(3, 30.0);
        source.open().unwrap();
        source.next_frame();
        source.close();
        assert!(!source.is_open());
        assert!(source.next_frame().is_none());
        assert_eq!(source.remaining(), 2);
    }

    #[test]
    fn test_pacing_spaces_frames() {
        let mut source = ReplaySource::empty_frames(3, 100.0).with_pacing(true);
        source.open().unwrap();
        let start = Instant::now();
        while source.next_frame().is_some() {}
        // Two gaps of 10ms between three frames
        assert!(start.elapsed() >= Duration::from_millis(19));
    }
}
