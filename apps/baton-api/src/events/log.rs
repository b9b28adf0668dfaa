//! Bounded, newest-first in-memory event history.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::model::Event;

/// Maximum number of events retained. Older entries are evicted.
pub const MAX_EVENTS: usize = 1000;

/// Volatile event history shared by all ingestion sources.
///
/// Writers serialize on a `parking_lot::RwLock`; readers share it and always
/// see a whole log.
pub struct EventLog {
    entries: RwLock<VecDeque<Arc<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(MAX_EVENTS)),
        }
    }

    /// Insert an already-built event at the newest position.
    pub fn append(&self, event: Event) -> Arc<Event> {
        let mut entries = self.entries.write();
        push_newest(&mut entries, Arc::new(event))
    }

    /// Build and insert an event stamped under the write lock, so timestamps
    /// never go backwards in insertion order even if the wall clock does.
    pub fn record(&self, build: impl FnOnce(DateTime<Utc>) -> Event) -> Arc<Event> {
        let mut entries = self.entries.write();
        let now = Utc::now();
        let stamp = match entries.front() {
            Some(newest) if newest.timestamp > now => newest.timestamp,
            _ => now,
        };
        push_newest(&mut entries, Arc::new(build(stamp)))
    }

    /// Up to `limit` events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Arc<Event>> {
        let entries = self.entries.read();
        entries.iter().take(limit.min(MAX_EVENTS)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

fn push_newest(entries: &mut VecDeque<Arc<Event>>, event: Arc<Event>) -> Arc<Event> {
    entries.push_front(event.clone());
    while entries.len() > MAX_EVENTS {
        entries.pop_back();
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::source::Source;

    fn event(n: usize) -> Event {
        Event::new(format!("event-{n}"), None, Source::Direct, Utc::now())
    }

    #[test]
    fn recent_is_newest_first() {
        let log = EventLog::new();
        for n in 1..=3 {
            log.append(event(n));
        }

        let recent = log.recent(10);
        let texts: Vec<&str> = recent.iter().map(|e| e.raw_text.as_str()).collect();
        assert_eq!(texts, ["event-3", "event-2", "event-1"]);
    }

    #[test]
    fn recent_respects_limit() {
        let log = EventLog::new();
        for n in 1..=5 {
            log.append(event(n));
        }

        assert!(log.recent(0).is_empty());
        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].raw_text, "event-5");
        assert_eq!(recent[1].raw_text, "event-4");
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let log = EventLog::new();
        for n in 1..=(MAX_EVENTS + 1) {
            log.append(event(n));
        }

        assert_eq!(log.len(), MAX_EVENTS);
        let recent = log.recent(MAX_EVENTS);
        assert_eq!(recent.len(), MAX_EVENTS);
        assert_eq!(recent[0].raw_text, format!("event-{}", MAX_EVENTS + 1));
        // Oldest retained is the second one appended.
        assert_eq!(recent[MAX_EVENTS - 1].raw_text, "event-2");
    }

    #[test]
    fn recent_never_exceeds_capacity() {
        let log = EventLog::new();
        for n in 1..=(MAX_EVENTS + 250) {
            log.append(event(n));
            assert!(log.len() <= MAX_EVENTS);
        }
        assert_eq!(log.recent(usize::MAX).len(), MAX_EVENTS);
    }

    #[test]
    fn record_stamps_non_decreasing() {
        let log = EventLog::new();
        let future = Utc::now() + chrono::Duration::seconds(60);
        log.append(Event::new("future", None, Source::Legacy, future));

        let recorded = log.record(|ts| Event::new("next", None, Source::Legacy, ts));
        assert!(recorded.timestamp >= future);

        let recent = log.recent(MAX_EVENTS);
        for pair in recent.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        let log = EventLog::new();
        let writers = 8;
        let per_writer = 100;

        std::thread::scope(|scope| {
            for w in 0..writers {
                let log = &log;
                scope.spawn(move || {
                    for i in 0..per_writer {
                        log.record(|ts| {
                            Event::new(format!("{w}-{i}"), None, Source::Hookdeck, ts)
                        });
                    }
                });
            }
        });

        assert_eq!(log.len(), writers * per_writer);

        // Each writer's own events keep their relative order (newest first).
        let recent = log.recent(MAX_EVENTS);
        for w in 0..writers {
            let prefix = format!("{w}-");
            let seq: Vec<usize> = recent
                .iter()
                .filter_map(|e| e.raw_text.strip_prefix(&prefix))
                .map(|i| i.parse().unwrap())
                .collect();
            assert_eq!(seq.len(), per_writer);
            assert!(seq.windows(2).all(|p| p[0] > p[1]));
        }

        for pair in recent.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }
}
