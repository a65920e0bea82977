//! # Events emitted by the bus itself, plus a generic value-change event.
//!
//! - [`EventDispatched`]: meta-event announcing that another event was dispatched.
//!   Generic observers (loggers, recorders, relays) subscribe to it **once** instead of
//!   per kind. It is fired **after** the wrapped event's own handlers ran, so observers
//!   see the final cancellation state.
//! - [`HandlerFailed`]: report of one binding that returned an error or panicked.
//! - [`PropertyChanged`]: `old → new` notification for any observable value.
//!
//! ## Ordering
//! Each [`EventDispatched`] carries a process-wide sequence number (`seq`) that
//! increases monotonically. Use it to restore the exact order across threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use super::event::Event;

/// Global sequence counter for dispatch notifications.
static DISPATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Meta-event: "`event` was dispatched at `at`".
#[derive(Clone)]
pub struct EventDispatched {
    /// The originally dispatched event.
    pub event: Arc<dyn Event>,
    /// Wall-clock timestamp, taken when delivery of `event` completed.
    pub at: SystemTime,
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
}

impl EventDispatched {
    /// Wraps `event` with the current timestamp and the next sequence number.
    pub fn new(event: Arc<dyn Event>) -> Self {
        Self {
            event,
            at: SystemTime::now(),
            seq: DISPATCH_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    /// Name of the wrapped event.
    #[inline]
    pub fn event_name(&self) -> &str {
        self.event.name()
    }

    /// Borrows the wrapped event as `E`, if it is one.
    #[inline]
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.event.downcast_ref::<E>()
    }
}

impl fmt::Debug for EventDispatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatched")
            .field("seq", &self.seq)
            .field("event", &self.event)
            .finish()
    }
}

impl Event for EventDispatched {}

/// A binding failed while handling an event.
///
/// Sets:
/// - `listener`: listener id (`name@address`)
/// - `handler`: handler member name
/// - `event`: name of the event being delivered
/// - `error`: error or panic message
/// - `panicked`: `true` if the handler panicked rather than returning `Err`
#[derive(Debug, Clone)]
pub struct HandlerFailed {
    pub listener: Arc<str>,
    pub handler: &'static str,
    pub event: Arc<str>,
    pub error: Arc<str>,
    pub panicked: bool,
}

impl Event for HandlerFailed {}

/// Value of a property changed from `old` to `new`.
///
/// ```rust
/// use tierbus::{Event, PropertyChanged};
///
/// let ev = PropertyChanged::new(1u8, 2u8);
/// assert_eq!(ev.old, 1);
/// assert_eq!(ev.new, 2);
/// assert!(ev.name().starts_with("PropertyChanged"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChanged<T> {
    pub old: T,
    pub new: T,
}

impl<T> PropertyChanged<T> {
    pub fn new(old: T, new: T) -> Self {
        Self { old, new }
    }
}

impl<T: fmt::Debug + Send + Sync + 'static> Event for PropertyChanged<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping;
    impl Event for Ping {}

    #[test]
    fn test_dispatched_seq_is_monotonic() {
        let a = EventDispatched::new(Arc::new(Ping));
        let b = EventDispatched::new(Arc::new(Ping));
        assert!(b.seq > a.seq);
        assert!(b.at >= a.at);
    }

    #[test]
    fn test_dispatched_exposes_wrapped_event() {
        let d = EventDispatched::new(Arc::new(Ping));
        assert_eq!(d.event_name(), "Ping");
        assert!(d.downcast_ref::<Ping>().is_some());
        assert!(d.downcast_ref::<HandlerFailed>().is_none());
    }

    #[test]
    fn test_property_changed_is_keyed_per_type_argument() {
        let a: Arc<dyn Event> = Arc::new(PropertyChanged::new(1u32, 2u32));
        assert!(a.is::<PropertyChanged<u32>>());
        assert!(!a.is::<PropertyChanged<u64>>());
    }
}
