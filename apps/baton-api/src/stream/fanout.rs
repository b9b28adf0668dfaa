//! Subscriber registry and fan-out for live event streams.
//!
//! Each subscriber owns a bounded queue drained by its SSE response. Writes
//! are `try_send` only: a full or closed queue drops the subscriber instead of
//! stalling ingestion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

use super::frames::{Frame, SystemMessage};

/// Period between keep-alive frames on each stream.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Frames buffered per subscriber before it is considered stalled.
pub const SUBSCRIBER_QUEUE_CAPACITY: usize = 256;

/// Opaque reference to a registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberHandle(u64);

struct Subscriber {
    tx: mpsc::Sender<Frame>,
    heartbeat: JoinHandle<()>,
}

type SubscriberMap = DashMap<u64, Subscriber>;

/// Live set of stream subscribers.
pub struct Broadcaster {
    subscribers: Arc<SubscriberMap>,
    next_id: AtomicU64,
    heartbeat_interval: Duration,
    broadcast_status: bool,
}

impl Broadcaster {
    /// A zero `heartbeat_interval` falls back to [`HEARTBEAT_INTERVAL`].
    pub fn new(heartbeat_interval: Duration, broadcast_status: bool) -> Self {
        let heartbeat_interval = if heartbeat_interval.is_zero() {
            tracing::warn!("zero heartbeat interval, using {HEARTBEAT_INTERVAL:?}");
            HEARTBEAT_INTERVAL
        } else {
            heartbeat_interval
        };
        Self {
            subscribers: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
            heartbeat_interval,
            broadcast_status,
        }
    }

    /// Register a new subscriber. The welcome frame is queued before the
    /// subscriber joins the live set, so it precedes every published event.
    ///
    /// Must be called from within a Tokio runtime (spawns the heartbeat).
    pub fn subscribe(&self) -> (SubscriberHandle, mpsc::Receiver<Frame>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);

        if let Some(welcome) = serialize(&SystemMessage::welcome()) {
            let _ = tx.try_send(Frame::Data(welcome));
        }

        let heartbeat = tokio::spawn(run_heartbeat(
            Arc::clone(&self.subscribers),
            id,
            self.heartbeat_interval,
        ));
        self.subscribers.insert(id, Subscriber { tx, heartbeat });

        let count = self.subscribers.len();
        tracing::info!(subscriber = id, subscribers = count, "stream subscriber connected");

        if self.broadcast_status {
            self.publish(&SystemMessage::status(count));
        }

        (SubscriberHandle(id), rx)
    }

    /// Remove a subscriber and stop its heartbeat. Calling this more than
    /// once, or after a failed write already removed it, is a no-op.
    pub fn unsubscribe(&self, handle: SubscriberHandle) {
        if !self.remove(handle.0) {
            return;
        }

        let count = self.subscribers.len();
        tracing::info!(subscriber = handle.0, subscribers = count, "stream subscriber disconnected");

        if self.broadcast_status {
            self.publish(&SystemMessage::status(count));
        }
    }

    /// Serialize `payload` once and push it to every live subscriber.
    ///
    /// Subscribers whose queue is closed or full are dropped. Returns the
    /// number of subscribers the frame was delivered to.
    pub fn publish<T: Serialize>(&self, payload: &T) -> usize {
        let Some(json) = serialize(payload) else {
            return 0;
        };

        let mut delivered = 0;
        let mut failed = Vec::new();
        for entry in self.subscribers.iter() {
            match entry.tx.try_send(Frame::Data(Arc::clone(&json))) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::debug!(subscriber = *entry.key(), %err, "dropping stream subscriber");
                    failed.push(*entry.key());
                }
            }
        }

        // Removal takes shard write locks, so it must wait until iteration ends.
        for id in failed {
            self.remove(id);
        }

        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_subscribed(&self, handle: SubscriberHandle) -> bool {
        self.subscribers.contains_key(&handle.0)
    }

    fn remove(&self, id: u64) -> bool {
        match self.subscribers.remove(&id) {
            Some((_, subscriber)) => {
                subscriber.heartbeat.abort();
                true
            }
            None => false,
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(HEARTBEAT_INTERVAL, false)
    }
}

impl Drop for Broadcaster {
    fn drop(&mut self) {
        for entry in self.subscribers.iter() {
            entry.heartbeat.abort();
        }
    }
}

/// Unsubscribes when dropped. Owned by the transport so that closing the
/// connection tears the subscription down.
pub struct SubscriptionGuard {
    broadcaster: Arc<Broadcaster>,
    handle: SubscriberHandle,
}

impl SubscriptionGuard {
    pub fn new(broadcaster: Arc<Broadcaster>, handle: SubscriberHandle) -> Self {
        Self { broadcaster, handle }
    }

    pub fn handle(&self) -> SubscriberHandle {
        self.handle
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.broadcaster.unsubscribe(self.handle);
    }
}

/// Sends a heartbeat every `period` for as long as `id` stays registered.
/// The sender is looked up under the map's shard lock on every tick, so no
/// heartbeat can slip out after removal.
async fn run_heartbeat(subscribers: Arc<SubscriberMap>, id: u64, period: Duration) {
    let mut ticker = time::interval(period);
    ticker.tick().await; // First tick fires immediately; skip it.

    loop {
        ticker.tick().await;

        let Some(entry) = subscribers.get(&id) else {
            break;
        };
        match entry.tx.try_send(Frame::Heartbeat) {
            Ok(()) => {}
            // A full queue already has frames in flight; skip this beat.
            Err(mpsc::error::TrySendError::Full(_)) => {}
            Err(mpsc::error::TrySendError::Closed(_)) => break,
        }
    }
}

fn serialize<T: Serialize>(payload: &T) -> Option<Arc<str>> {
    match serde_json::to_string(payload) {
        Ok(json) => Some(Arc::from(json)),
        Err(err) => {
            tracing::error!(%err, "failed to serialize stream payload");
            None
        }
    }
}
