//! # Dispatch seam.
//!
//! [`Dispatch`] is the single operation the [`Call`](crate::Call) protocols are built
//! on. [`EventBus`](crate::EventBus) implements it; so can test doubles or wrappers.

use std::sync::Arc;

use crate::events::Event;

/// Outcome counters of one delivery (one event, excluding follow-up events).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Bindings whose callback was invoked (including failed ones).
    pub invoked: usize,
    /// Bindings skipped because the event was cancelled and they skip cancelled events.
    pub skipped: usize,
    /// Invoked bindings that returned `Err` or panicked.
    pub failed: usize,
}

impl Delivery {
    /// `true` if no binding was reached at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.invoked == 0 && self.skipped == 0
    }

    /// Invoked bindings that completed successfully.
    #[inline]
    pub fn succeeded(&self) -> usize {
        self.invoked - self.failed
    }
}

/// Synchronous, in-order delivery of an event to its bindings.
pub trait Dispatch {
    /// Delivers a type-erased event.
    fn dispatch_dyn(&self, event: &Arc<dyn Event>) -> Delivery;

    /// Delivers `event` to every binding registered for `E`.
    fn dispatch<E: Event>(&self, event: &Arc<E>) -> Delivery {
        let erased: Arc<dyn Event> = Arc::clone(event) as Arc<dyn Event>;
        self.dispatch_dyn(&erased)
    }
}
