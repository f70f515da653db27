//! Sinks receiving per-frame tracker updates.

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use tracing::{trace, warn};

use crate::error::ConfigError;
use crate::tracker::TrackUpdate;

/// Consumer of tracker updates, called from the session's frame worker.
///
/// Implementations must return quickly: the worker does not pull the next
/// frame until `publish` returns.
pub trait SpeedSink {
    fn publish(&mut self, update: TrackUpdate);
}

impl<F: FnMut(TrackUpdate)> SpeedSink for F {
    fn publish(&mut self, update: TrackUpdate) {
        self(update)
    }
}

/// Sink posting updates into a bounded channel without ever blocking.
///
/// When the consumer falls behind, the oldest pending update is evicted to
/// make room, so the channel always ends with the newest updates the tracker
/// produced.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<TrackUpdate>,
    evict: Receiver<TrackUpdate>,
    dropped: u64,
}

/// Receiving side of a [`ChannelSink`].
#[derive(Debug, Clone)]
pub struct SinkReceiver {
    rx: Receiver<TrackUpdate>,
}

impl ChannelSink {
    /// Create a sink and its receiver holding at most `capacity` pending updates.
    pub fn bounded(capacity: usize) -> Result<(Self, SinkReceiver), ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::SinkCapacity);
        }
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        let sink = Self {
            tx,
            evict: rx.clone(),
            dropped: 0,
        };
        Ok((sink, SinkReceiver { rx }))
    }

    /// Stale updates evicted because the channel was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn record_drop(&mut self) {
        self.dropped += 1;
        if self.dropped == 1 {
            warn!("Sink consumer is lagging; dropping stale updates");
        } else {
            trace!(dropped = self.dropped, "Sink full, dropped stale update");
        }
    }
}

impl SpeedSink for ChannelSink {
    fn publish(&mut self, update: TrackUpdate) {
        let update = match self.tx.try_send(update) {
            Ok(()) => return,
            Err(TrySendError::Full(update)) => update,
            // The sink holds a receiver itself, so this cannot happen.
            Err(TrySendError::Disconnected(_)) => return,
        };

        if self.evict.try_recv().is_ok() {
            self.record_drop();
        }
        if self.tx.try_send(update).is_err() {
            self.record_drop();
        }
    }
}

impl SinkReceiver {
    /// Block until the next update. `None` once every sender is gone.
    pub fn recv(&self) -> Option<TrackUpdate> {
        self.rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<TrackUpdate> {
        match self.rx.try_recv() {
            Ok(update) => Some(update),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain pending updates and return the most recent one.
    pub fn latest(&self) -> Option<TrackUpdate> {
        self.rx.try_iter().last()
    }

    /// Iterate until every sender is gone.
    pub fn iter(&self) -> impl Iterator<Item = TrackUpdate> + '_ {
        self.rx.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{FALLBACK_POSITION, Point2D};

    fn no_data(x: f32) -> TrackUpdate {
        TrackUpdate::NoDataYet {
            position: Point2D::new(x, x),
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            ChannelSink::bounded(0),
            Err(ConfigError::SinkCapacity)
        ));
    }

    #[test]
    fn test_full_channel_keeps_newest() {
        let (mut sink, rx) = ChannelSink::bounded(2).unwrap();
        sink.publish(no_data(0.1));
        sink.publish(no_data(0.2));
        sink.publish(no_data(0.3));

        assert_eq!(sink.dropped(), 1);
        assert_eq!(rx.try_recv(), Some(no_data(0.2)));
        assert_eq!(rx.try_recv(), Some(no_data(0.3)));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_latest_is_last_published() {
        let (mut sink, rx) = ChannelSink::bounded(1).unwrap();
        sink.publish(no_data(0.1));
        sink.publish(no_data(0.2));
        sink.publish(no_data(0.3));

        assert_eq!(sink.dropped(), 2);
        assert_eq!(rx.latest(), Some(no_data(0.3)));
    }

    #[test]
    fn test_publish_after_receiver_dropped() {
        let (mut sink, rx) = ChannelSink::bounded(1).unwrap();
        drop(rx);
        sink.publish(no_data(0.4));
        sink.publish(no_data(0.5));
        assert_eq!(sink.dropped(), 1);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |update: TrackUpdate| seen.push(update.current_position());
            sink.publish(no_data(0.5));
        }
        assert_eq!(seen, vec![FALLBACK_POSITION]);
    }
}
