//! Session control: drives frames from a source through a pipeline on a
//! dedicated worker thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, SessionError};
use crate::tracker::TrackerConfig;

use super::{ChannelSink, Detector, FrameSource, SinkReceiver, SpeedSink, TrackerPipeline};

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No worker; frames are not being pulled
    #[default]
    Idle,
    /// Worker thread owns the source and pipeline
    Running,
}

/// Configuration for a session with a channel sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tracker: TrackerConfig,
    /// Pending updates the channel sink holds before evicting the oldest
    pub sink_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            sink_capacity: 8,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracker.validate()?;
        if self.sink_capacity == 0 {
            return Err(ConfigError::SinkCapacity);
        }
        Ok(())
    }
}

struct Parts<S, D: Detector, K> {
    source: S,
    pipeline: TrackerPipeline<D>,
    sink: K,
}

struct Worker<S, D: Detector, K> {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Parts<S, D, K>>,
}

/// A tracking session: one frame source, one pipeline, one sink.
///
/// While running, a single worker thread pulls a frame, runs detection and
/// tracking to completion, publishes the update, and only then pulls the next
/// frame. Stopping takes effect between frames.
pub struct Session<S, D, K>
where
    S: FrameSource + Send + 'static,
    D: Detector + Send + 'static,
    K: SpeedSink + Send + 'static,
{
    parts: Option<Parts<S, D, K>>,
    worker: Option<Worker<S, D, K>>,
}

impl<S, D> Session<S, D, ChannelSink>
where
    S: FrameSource + Send + 'static,
    D: Detector + Send + 'static,
{
    /// Create a session publishing into a bounded channel.
    pub fn with_channel(
        source: S,
        detector: D,
        config: SessionConfig,
    ) -> Result<(Self, SinkReceiver), ConfigError> {
        config.validate()?;
        let pipeline = TrackerPipeline::new(detector, config.tracker)?;
        let (sink, receiver) = ChannelSink::bounded(config.sink_capacity)?;
        Ok((Self::new(source, pipeline, sink), receiver))
    }
}

impl<S, D, K> Session<S, D, K>
where
    S: FrameSource + Send + 'static,
    D: Detector + Send + 'static,
    K: SpeedSink + Send + 'static,
{
    pub fn new(source: S, pipeline: TrackerPipeline<D>, sink: K) -> Self {
        Self {
            parts: Some(Parts {
                source,
                pipeline,
                sink,
            }),
            worker: None,
        }
    }

    /// `Idle` as soon as the worker exits, even before [`Session::wait`] reaps it.
    pub fn state(&self) -> SessionState {
        match &self.worker {
            Some(worker) if !worker.handle.is_finished() => SessionState::Running,
            _ => SessionState::Idle,
        }
    }

    /// Whether a running worker has already exited because its source ended.
    pub fn is_finished(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| worker.handle.is_finished())
    }

    /// Open the source and start pulling frames.
    ///
    /// Calling this while running does nothing. A worker that already ran out
    /// of frames is reaped first. Tracker history is cleared on every start,
    /// so the first frame of a session never reports a speed.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state() == SessionState::Running {
            debug!("Session already running");
            return Ok(());
        }
        self.wait()?;

        let mut parts = self.parts.take().ok_or(SessionError::WorkerPanicked)?;
        if let Err(e) = parts.source.open() {
            warn!(error = %e, "Failed to open frame source");
            self.parts = Some(parts);
            return Err(e.into());
        }
        parts.pipeline.reset();

        let source_rate = parts.source.frame_rate();
        let tracker_rate = parts.pipeline.tracker().config().frame_rate;
        if (source_rate - tracker_rate).abs() > f32::EPSILON {
            warn!(source_rate, tracker_rate, "Source frame rate differs from tracker");
        }

        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = stop.clone();
        let handle = thread::spawn(move || run_frames(parts, &worker_stop));

        self.worker = Some(Worker { stop, handle });
        info!(frame_rate = source_rate, "Session started");
        Ok(())
    }

    /// Stop pulling frames and close the source.
    ///
    /// The frame in flight, if any, is completed first. Calling this while
    /// idle does nothing.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        match self.worker.take() {
            Some(worker) => {
                worker.stop.store(true, Ordering::Release);
                self.finish(worker)
            }
            None => Ok(()),
        }
    }

    /// Wait for the source to run out of frames, then close it.
    pub fn wait(&mut self) -> Result<(), SessionError> {
        match self.worker.take() {
            Some(worker) => self.finish(worker),
            None => Ok(()),
        }
    }

    fn finish(&mut self, worker: Worker<S, D, K>) -> Result<(), SessionError> {
        match worker.handle.join() {
            Ok(mut parts) => {
                parts.source.close();
                info!(
                    frames = parts.pipeline.tracker().frame_id(),
                    failed = parts.pipeline.failed_frames(),
                    "Session stopped"
                );
                self.parts = Some(parts);
                Ok(())
            }
            Err(_) => Err(SessionError::WorkerPanicked),
        }
    }

    /// The frame source, while idle.
    pub fn source(&self) -> Option<&S> {
        self.parts.as_ref().map(|p| &p.source)
    }

    /// The pipeline, while idle.
    pub fn pipeline(&self) -> Option<&TrackerPipeline<D>> {
        self.parts.as_ref().map(|p| &p.pipeline)
    }

    /// The sink, while idle.
    pub fn sink(&self) -> Option<&K> {
        self.parts.as_ref().map(|p| &p.sink)
    }
}

impl<S, D, K> Drop for Session<S, D, K>
where
    S: FrameSource + Send + 'static,
    D: Detector + Send + 'static,
    K: SpeedSink + Send + 'static,
{
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "Session did not shut down cleanly");
        }
    }
}

fn run_frames<S, D, K>(mut parts: Parts<S, D, K>, stop: &AtomicBool) -> Parts<S, D, K>
where
    S: FrameSource,
    D: Detector,
    K: SpeedSink,
{
    while !stop.load(Ordering::Acquire) {
        let Some(frame) = parts.source.next_frame() else {
            debug!("Frame source exhausted");
            break;
        };
        let update = parts.pipeline.process_frame(&frame);
        parts.sink.publish(update);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::integration::{Frame, ReplaySource, ScriptedDetector};
    use crate::tracker::{Detection, TrackUpdate};

    struct UnavailableSource;

    impl FrameSource for UnavailableSource {
        fn open(&mut self) -> Result<(), SourceError> {
            Err(SourceError::Unavailable("no camera".to_string()))
        }

        fn next_frame(&mut self) -> Option<Frame> {
            None
        }

        fn frame_rate(&self) -> f32 {
            30.0
        }
    }

    fn constant_detector(frames: usize) -> ScriptedDetector {
        let det = Detection::new(0.2, 0.2, 0.1, 0.1, 0.9);
        ScriptedDetector::from_detections(std::iter::repeat_n(vec![det], frames))
    }

    #[test]
    fn test_runs_to_end_of_source() {
        let source = ReplaySource::empty_frames(5, 30.0);
        let (mut session, rx) =
            Session::with_channel(source, constant_detector(5), SessionConfig::default()).unwrap();

        session.start().unwrap();
        session.wait().unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        let updates: Vec<TrackUpdate> = std::iter::from_fn(|| rx.try_recv()).collect();
        assert_eq!(updates.len(), 5);
        assert!(matches!(updates[0], TrackUpdate::NoDataYet { .. }));
        for update in &updates[1..] {
            assert_eq!(update.speed(), Some(0.0));
        }
        assert_eq!(session.source().map(|s| s.is_open()), Some(false));
    }

    #[test]
    fn test_unavailable_source_stays_idle() {
        let (mut session, _rx) = Session::with_channel(
            UnavailableSource,
            ScriptedDetector::default(),
            SessionConfig::default(),
        )
        .unwrap();

        let err = session.start().unwrap_err();
        assert!(matches!(
            err,
            SessionError::SourceUnavailable(SourceError::Unavailable(_))
        ));
        assert_eq!(session.state(), SessionState::Idle);

        // Parts are kept, so a later attempt fails the same way instead of panicking
        assert!(matches!(
            session.start(),
            Err(SessionError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_start_twice_runs_one_worker() {
        let source = ReplaySource::empty_frames(1_000, 500.0).with_pacing(true);
        let config = SessionConfig {
            sink_capacity: 2_000,
            ..Default::default()
        };
        let (mut session, rx) =
            Session::with_channel(source, constant_detector(0), config).unwrap();

        session.start().unwrap();
        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Running);
        std::thread::sleep(std::time::Duration::from_millis(20));
        session.stop().unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        let updates: Vec<TrackUpdate> = std::iter::from_fn(|| rx.try_recv()).collect();
        let first_frames = updates
            .iter()
            .filter(|u| matches!(u, TrackUpdate::NoDataYet { .. }))
            .count();
        assert_eq!(first_frames, 1);
        assert!(session.source().unwrap().remaining() > 0);
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let source = ReplaySource::empty_frames(1, 30.0);
        let (mut session, _rx) =
            Session::with_channel(source, constant_detector(1), SessionConfig::default()).unwrap();
        session.stop().unwrap();
        session.wait().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_restart_resets_history() {
        let source = ReplaySource::empty_frames(2, 30.0);
        let (mut session, rx) =
            Session::with_channel(source, constant_detector(2), SessionConfig::default()).unwrap();

        session.start().unwrap();
        session.wait().unwrap();
        assert_eq!(session.pipeline().unwrap().tracker().frame_id(), 2);

        // Source is exhausted; restarting yields no frames and clears history
        session.start().unwrap();
        session.wait().unwrap();
        assert_eq!(session.pipeline().unwrap().tracker().previous_position(), None);
        assert_eq!(std::iter::from_fn(|| rx.try_recv()).count(), 2);
    }

    #[test]
    fn test_idle_after_source_ends_without_wait() {
        let source = ReplaySource::empty_frames(3, 30.0);
        let (mut session, rx) =
            Session::with_channel(source, constant_detector(3), SessionConfig::default()).unwrap();

        session.start().unwrap();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while session.state() == SessionState::Running {
            assert!(std::time::Instant::now() < deadline, "worker never exited");
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert!(session.is_finished());

        // The exited worker is reaped and a fresh one starts
        session.start().unwrap();
        session.wait().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_finished());
        assert_eq!(session.source().map(|s| s.is_open()), Some(false));
        assert_eq!(std::iter::from_fn(|| rx.try_recv()).count(), 3);
    }

    #[test]
    fn test_invalid_config() {
        let config = SessionConfig {
            sink_capacity: 0,
            ..Default::default()
        };
        let result = Session::with_channel(
            ReplaySource::empty_frames(1, 30.0),
            ScriptedDetector::default(),
            config,
        );
        assert!(matches!(result, Err(ConfigError::SinkCapacity)));
    }
}
