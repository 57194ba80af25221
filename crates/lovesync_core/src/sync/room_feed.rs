//! In-process live subscription hub for room documents.
//!
//! # Responsibility
//! - Fan out every committed room snapshot to the room's subscribers.
//! - Yield a primed current snapshot ahead of live events.
//!
//! # Invariants
//! - A subscription never yields an `Updated` event older than one it
//!   already yielded (revisions are monotonic per subscription).
//! - Slow subscribers skip ahead instead of failing.
//! - Channels with no receivers are dropped on the next publish.

use crate::model::room::RoomCode;
use crate::repo::room_repo::RoomSnapshot;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Updated(Arc<RoomSnapshot>),
    Deleted(RoomCode),
}

impl RoomEvent {
    pub fn code(&self) -> &RoomCode {
        match self {
            Self::Updated(snapshot) => &snapshot.code,
            Self::Deleted(code) => code,
        }
    }
}

/// Per-room broadcast registry shared by every service instance.
pub struct RoomFeed {
    channels: Mutex<HashMap<RoomCode, broadcast::Sender<RoomEvent>>>,
    capacity: usize,
}

impl Default for RoomFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl RoomFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// `capacity` bounds how many events a subscriber may fall behind.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Registers a subscriber for live events.
    ///
    /// Callers read the current document after subscribing and hand it to
    /// `RoomSubscription::prime`, so no commit can fall between the two.
    pub fn subscribe(&self, code: &RoomCode) -> RoomSubscription {
        let receiver = {
            let mut channels = self.lock();
            channels
                .entry(code.clone())
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .subscribe()
        };
        debug!("event=feed_subscribe module=sync status=ok room={code}");

        RoomSubscription {
            code: code.clone(),
            pending: None,
            last_revision: 0,
            receiver,
        }
    }

    /// Delivers an event; returns the number of receivers reached.
    pub fn publish(&self, event: RoomEvent) -> usize {
        let code = event.code().clone();
        let deleted = matches!(event, RoomEvent::Deleted(_));
        let mut channels = self.lock();

        let delivered = match channels.get(&code) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        };

        let drop_channel = deleted
            || channels
                .get(&code)
                .is_some_and(|sender| sender.receiver_count() == 0);
        if drop_channel {
            channels.remove(&code);
        }

        debug!(
            "event=feed_publish module=sync status=ok room={} receivers={} deleted={}",
            code, delivered, deleted
        );
        delivered
    }

    pub fn subscriber_count(&self, code: &RoomCode) -> usize {
        self.lock()
            .get(code)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RoomCode, broadcast::Sender<RoomEvent>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving end of one room subscription.
///
/// Dropping it unsubscribes.
pub struct RoomSubscription {
    code: RoomCode,
    pending: Option<RoomEvent>,
    last_revision: i64,
    receiver: broadcast::Receiver<RoomEvent>,
}

impl RoomSubscription {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Queues the document state read right after subscribing.
    pub fn prime(&mut self, current: RoomSnapshot) {
        self.pending = Some(RoomEvent::Updated(Arc::new(current)));
    }

    /// Returns the next event without blocking, or `None` when nothing is queued
    /// or the feed is gone.
    pub fn try_next(&mut self) -> Option<RoomEvent> {
        if let Some(event) = self.take_pending() {
            return Some(event);
        }
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(event) = self.accept(event) {
                        return Some(event);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => self.note_lag(skipped),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Waits for the next event; `None` once the feed is closed.
    pub async fn next(&mut self) -> Option<RoomEvent> {
        if let Some(event) = self.take_pending() {
            return Some(event);
        }
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if let Some(event) = self.accept(event) {
                        return Some(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => self.note_lag(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Drains everything currently queued and returns the newest event.
    pub fn latest(&mut self) -> Option<RoomEvent> {
        let mut newest = None;
        while let Some(event) = self.try_next() {
            newest = Some(event);
        }
        newest
    }

    fn take_pending(&mut self) -> Option<RoomEvent> {
        let event = self.pending.take()?;
        self.accept(event)
    }

    fn accept(&mut self, event: RoomEvent) -> Option<RoomEvent> {
        match &event {
            RoomEvent::Updated(snapshot) => {
                if snapshot.revision <= self.last_revision {
                    return None;
                }
                self.last_revision = snapshot.revision;
            }
            RoomEvent::Deleted(_) => self.last_revision = 0,
        }
        Some(event)
    }

    fn note_lag(&self, skipped: u64) {
        warn!(
            "event=feed_lagged module=sync status=degraded room={} skipped={}",
            self.code, skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{RoomEvent, RoomFeed};
    use crate::model::room::{RoomCode, RoomData};
    use crate::repo::room_repo::RoomSnapshot;
    use std::sync::Arc;

    fn snapshot(code: &RoomCode, revision: i64) -> RoomSnapshot {
        RoomSnapshot {
            code: code.clone(),
            revision,
            updated_at: 0,
            room: RoomData::new("host", "Ana", 0),
        }
    }

    fn revision_of(event: Option<RoomEvent>) -> Option<i64> {
        match event {
            Some(RoomEvent::Updated(snapshot)) => Some(snapshot.revision),
            _ => None,
        }
    }

    #[test]
    fn subscriber_sees_current_snapshot_then_live_updates() {
        let feed = RoomFeed::new();
        let code = RoomCode::parse("ABCDEF").unwrap();
        let mut sub = feed.subscribe(&code);
        sub.prime(snapshot(&code, 3));

        feed.publish(RoomEvent::Updated(Arc::new(snapshot(&code, 4))));

        assert_eq!(revision_of(sub.try_next()), Some(3));
        assert_eq!(revision_of(sub.try_next()), Some(4));
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn stale_revisions_are_skipped() {
        let feed = RoomFeed::new();
        let code = RoomCode::parse("ABCDEF").unwrap();
        let mut sub = feed.subscribe(&code);
        sub.prime(snapshot(&code, 5));

        feed.publish(RoomEvent::Updated(Arc::new(snapshot(&code, 5))));
        feed.publish(RoomEvent::Updated(Arc::new(snapshot(&code, 6))));

        assert_eq!(revision_of(sub.try_next()), Some(5));
        assert_eq!(revision_of(sub.try_next()), Some(6));
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn lagging_subscriber_skips_ahead() {
        let feed = RoomFeed::with_capacity(2);
        let code = RoomCode::parse("ABCDEF").unwrap();
        let mut sub = feed.subscribe(&code);

        for revision in 1..=5 {
            feed.publish(RoomEvent::Updated(Arc::new(snapshot(&code, revision))));
        }

        assert_eq!(revision_of(sub.latest()), Some(5));
    }

    #[test]
    fn delete_reaches_subscribers_and_drops_channel() {
        let feed = RoomFeed::new();
        let code = RoomCode::parse("ABCDEF").unwrap();
        let mut sub = feed.subscribe(&code);
        assert_eq!(feed.subscriber_count(&code), 1);

        assert_eq!(feed.publish(RoomEvent::Deleted(code.clone())), 1);
        assert_eq!(sub.try_next(), Some(RoomEvent::Deleted(code.clone())));
        assert_eq!(feed.subscriber_count(&code), 0);
    }

    #[test]
    fn dropped_subscribers_release_channel_on_next_publish() {
        let feed = RoomFeed::new();
        let code = RoomCode::parse("ABCDEF").unwrap();
        drop(feed.subscribe(&code));

        assert_eq!(
            feed.publish(RoomEvent::Updated(Arc::new(snapshot(&code, 1)))),
            0
        );
        assert_eq!(feed.subscriber_count(&code), 0);
    }
}
