//! # EventHistory: bounded in-memory record of dispatched events
//!
//! Keeps the last `capacity` [`EventDispatched`] notifications, oldest first.
//! Kinds muted with [`EventHistory::ignore`] are not recorded.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::filter::KindFilter;
use crate::events::{Event, EventDispatched};
use crate::listeners::{Handlers, Listener};
use crate::policies::Priority;

/// Ring buffer of dispatch notifications.
pub struct EventHistory {
    capacity: usize,
    filter: KindFilter,
    entries: Mutex<VecDeque<EventDispatched>>,
}

impl EventHistory {
    /// Creates a history keeping at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            filter: KindFilter::default(),
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stops recording events of kind `E`.
    pub fn ignore<E: Event>(&self) -> &Self {
        self.filter.ignore::<E>();
        self
    }

    /// Records events of kind `E` again.
    pub fn accept<E: Event>(&self) -> &Self {
        self.filter.accept::<E>();
        self
    }

    /// Copy of the recorded entries, oldest first.
    pub fn snapshot(&self) -> Vec<EventDispatched> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn record(&self, d: &EventDispatched) {
        if !self.filter.admits(&*d.event) {
            return;
        }
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(d.clone());
    }
}

impl Default for EventHistory {
    /// History of the last 1024 events.
    fn default() -> Self {
        Self::new(1024)
    }
}

impl Listener for EventHistory {
    fn name(&self) -> &str {
        "EventHistory"
    }

    fn handlers(self: Arc<Self>, handlers: &mut Handlers) {
        handlers
            .on::<EventDispatched>("on_dispatched")
            .priority(Priority::Monitor)
            .invoke(move |d| {
                self.record(d);
                Ok(())
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Call, Config, EventBus};

    #[derive(Debug)]
    struct Step(u32);
    impl Event for Step {}

    #[derive(Debug)]
    struct Noise;
    impl Event for Noise {}

    fn steps(history: &EventHistory) -> Vec<u32> {
        history
            .snapshot()
            .iter()
            .filter_map(|d| d.downcast_ref::<Step>().map(|s| s.0))
            .collect()
    }

    #[test]
    fn test_keeps_last_capacity_entries_in_order() {
        let bus = EventBus::new(Config::default());
        let history = Arc::new(EventHistory::new(3));
        bus.register(&history).unwrap();

        for i in 0..5 {
            bus.call(Step(i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(steps(&history), [2, 3, 4]);

        let seqs: Vec<u64> = history.snapshot().iter().map(|d| d.seq).collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ignored_kinds_are_not_recorded() {
        let bus = EventBus::new(Config::default());
        let history = Arc::new(EventHistory::new(8));
        bus.register(&history).unwrap();
        history.ignore::<Noise>();

        bus.call(Noise);
        bus.call(Step(1));
        assert_eq!(history.len(), 1);

        history.accept::<Noise>();
        bus.call(Noise);
        assert_eq!(history.len(), 2);

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let history = EventHistory::new(0);
        assert_eq!(history.capacity(), 1);
    }
}
