use std::sync::Arc;

use super::{bus::EventBus, config::Config};
use crate::error::RegistrationError;
use crate::listeners::Listener;

/// Builder for an [`EventBus`] with an initial set of listeners.
pub struct BusBuilder {
    cfg: Config,
    listeners: Vec<Arc<dyn Listener>>,
}

impl BusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            listeners: Vec::new(),
        }
    }

    /// Sets the listeners registered by [`build`](Self::build), in order.
    pub fn with_listeners(mut self, listeners: Vec<Arc<dyn Listener>>) -> Self {
        self.listeners = listeners;
        self
    }

    /// Appends one listener.
    pub fn listener(mut self, listener: Arc<dyn Listener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Builds the bus and registers every listener.
    ///
    /// Fails on the first listener whose handler set is rejected; no bus is returned
    /// in that case.
    pub fn build(self) -> Result<EventBus, RegistrationError> {
        let bus = EventBus::new(self.cfg);
        for listener in &self.listeners {
            bus.register(listener)?;
        }
        Ok(bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::listeners::{Handlers, ListenerFn};

    #[derive(Debug)]
    struct Ping;
    impl Event for Ping {}

    #[derive(Debug)]
    struct Legacy;
    impl Event for Legacy {
        fn deprecated() -> bool {
            true
        }
    }

    #[test]
    fn test_build_registers_listeners_in_order() {
        let bus = EventBus::builder(Config::quiet())
            .with_listeners(vec![ListenerFn::arc("a", |h: &mut Handlers| {
                h.on::<Ping>("first").invoke(|_| Ok(()));
            }) as Arc<dyn Listener>])
            .listener(ListenerFn::arc("b", |h: &mut Handlers| {
                h.on::<Ping>("second").invoke(|_| Ok(()));
            }))
            .build()
            .unwrap();

        assert_eq!(bus.listener_count(), 2);
        let names: Vec<&str> = bus.bindings::<Ping>().iter().map(|b| b.handler()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_build_fails_on_rejected_listener() {
        let err = BusBuilder::new(Config::default())
            .listener(ListenerFn::arc("legacy", |h: &mut Handlers| {
                h.on::<Legacy>("on_legacy").invoke(|_| Ok(()));
            }))
            .build()
            .unwrap_err();
        assert_eq!(err.as_label(), "registration_deprecated_event");
    }
}
