//! # LogWriter: dispatched events as `tracing` records
//!
//! A listener subscribed once to [`EventDispatched`] that writes every dispatched
//! event through `tracing`. Kinds can be muted with [`LogWriter::ignore`].
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO tierbus: [dispatched] seq=4 event="PlayerJoined" cancelled=false PlayerJoined { name: "alice" }
//! WARN tierbus: [handler-failed] seq=6 listener="Audit@0x5603..." handler="on_join" event="PlayerJoined" panicked=false error="disk full"
//! ```

use std::sync::Arc;

use super::filter::KindFilter;
use crate::events::{is_cancelled, Event, EventDispatched, HandlerFailed};
use crate::listeners::{Handlers, Listener};
use crate::policies::Priority;

/// Event writer listener.
#[derive(Default)]
pub struct LogWriter {
    filter: KindFilter,
}

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops writing events of kind `E`.
    pub fn ignore<E: Event>(&self) -> &Self {
        self.filter.ignore::<E>();
        self
    }

    /// Writes events of kind `E` again.
    pub fn accept<E: Event>(&self) -> &Self {
        self.filter.accept::<E>();
        self
    }

    pub fn is_ignored<E: Event>(&self) -> bool {
        self.filter.is_ignored::<E>()
    }

    fn write(&self, d: &EventDispatched) {
        if !self.filter.admits(&*d.event) {
            return;
        }

        if let Some(f) = d.downcast_ref::<HandlerFailed>() {
            tracing::warn!(
                seq = d.seq,
                listener = %f.listener,
                handler = f.handler,
                event = %f.event,
                panicked = f.panicked,
                error = %f.error,
                "[handler-failed]"
            );
            return;
        }

        tracing::info!(
            seq = d.seq,
            event = d.event_name(),
            cancelled = is_cancelled(&*d.event),
            "[dispatched] {:?}",
            d.event
        );
    }
}

impl Listener for LogWriter {
    fn name(&self) -> &str {
        "LogWriter"
    }

    fn handlers(self: Arc<Self>, handlers: &mut Handlers) {
        handlers
            .on::<EventDispatched>("on_dispatched")
            .priority(Priority::Monitor)
            .invoke(move |d| {
                self.write(d);
                Ok(())
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Call, Config, EventBus};

    #[derive(Debug)]
    struct Ping;
    impl Event for Ping {}

    #[test]
    fn test_registers_single_monitor_binding() {
        let bus = EventBus::new(Config::default());
        let writer = Arc::new(LogWriter::new());
        bus.register(&writer).unwrap();

        let bindings = bus.bindings::<EventDispatched>();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].priority(), Priority::Monitor);
        assert_eq!(bindings[0].listener().as_str().split('@').next(), Some("LogWriter"));
    }

    #[test]
    fn test_ignore_list_is_mutable_after_registration() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let bus = EventBus::new(Config::default());
        let writer = Arc::new(LogWriter::new());
        bus.register(&writer).unwrap();

        writer.ignore::<Ping>();
        assert!(writer.is_ignored::<Ping>());
        bus.call(Ping);

        writer.accept::<Ping>();
        assert!(!writer.is_ignored::<Ping>());
        bus.call(Ping);
    }
}
