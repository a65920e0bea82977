//! # Event bus: registration and synchronous dispatch.
//!
//! [`EventBus`] is an explicit context object: create one per application (or per
//! test), clone it cheaply into collaborators, and drop it to tear everything down.
//!
//! ## Architecture
//! ```text
//! dispatch(event)
//!     │
//!     ├─► Registry::snapshot(kind)          (short read lock, then released)
//!     │
//!     ├─► for tier in Earliest..=Monitor
//!     │     for binding in tier (registration order)
//!     │       ├─ skip if SkipCancelled && event cancelled
//!     │       └─ invoke ──► Err / panic → HandlerError (caught, logged)
//!     │
//!     ├─► HandlerFailed per failure        (unless delivering HandlerFailed/EventDispatched)
//!     └─► EventDispatched { event, at, seq } (unless delivering EventDispatched)
//! ```
//!
//! ## Rules
//! - **Synchronous**: the calling thread runs every binding, follow-up events included.
//! - **Snapshot delivery**: bindings added or removed during a dispatch (from a handler
//!   or another thread) only affect subsequent dispatch calls.
//! - **Isolation**: a failing handler never prevents later handlers from running.
//! - **Cancellation** gates bindings declared with `SkipCancelled` and the continuations
//!   of the [`Call`](crate::Call) protocols; it never stops delivery.
//! - **Re-entrancy**: handlers may register, unregister and dispatch on the same bus.

use std::any::TypeId;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::core::config::Config;
use crate::core::dispatch::{Delivery, Dispatch};
use crate::core::registry::Registry;
use crate::error::{panic_message, HandlerError, RegistrationError};
use crate::events::{Event, EventDispatched, HandlerFailed};
use crate::listeners::{Binding, Handlers, Listener, ListenerId};

struct Shared {
    cfg: Config,
    registry: Registry,
}

/// In-process, type-keyed event bus.
///
/// Cheap to clone: clones share the same registry.
#[derive(Clone)]
pub struct EventBus {
    shared: Arc<Shared>,
}

impl EventBus {
    /// Creates an empty bus with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            shared: Arc::new(Shared {
                cfg,
                registry: Registry::new(),
            }),
        }
    }

    /// Returns a builder that registers initial listeners.
    pub fn builder(cfg: Config) -> super::builder::BusBuilder {
        super::builder::BusBuilder::new(cfg)
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.shared.cfg
    }

    /// Registers `listener`, replacing any previous registration of the same instance.
    ///
    /// The bus keeps a clone of the `Arc` until the listener is unregistered.
    ///
    /// The listener's handler set is validated as a whole before anything is
    /// installed; on error the registry is left exactly as it was.
    pub fn register<L: Listener + ?Sized>(
        &self,
        listener: &Arc<L>,
    ) -> Result<ListenerId, RegistrationError> {
        let id = ListenerId::of(listener);
        let mut handlers = Handlers::new(id.clone(), listener.name());
        Arc::clone(listener).handlers(&mut handlers);

        let bindings = match handlers.finish() {
            Ok(bindings) => bindings,
            Err(err) => {
                tracing::debug!(listener = %id, label = err.as_label(), error = %err, "listener rejected");
                return Err(err);
            }
        };

        let count = bindings.len();
        let owner = Box::new(Arc::clone(listener));
        let replaced = self.shared.registry.install(id.clone(), owner, bindings);
        tracing::debug!(listener = %id, handlers = count, replaced, "listener registered");
        Ok(id)
    }

    /// Removes every binding of `listener`.
    ///
    /// Returns `false` (and does nothing) if it was not registered.
    pub fn unregister<L: Listener + ?Sized>(&self, listener: &Arc<L>) -> bool {
        self.unregister_id(&ListenerId::of(listener))
    }

    /// Removes every binding of the listener identified by `id`.
    pub fn unregister_id(&self, id: &ListenerId) -> bool {
        let removed = self.shared.registry.remove(id);
        if removed {
            tracing::debug!(listener = %id, "listener unregistered");
        }
        removed
    }

    pub fn is_registered<L: Listener + ?Sized>(&self, listener: &Arc<L>) -> bool {
        self.shared.registry.contains(&ListenerId::of(listener))
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.registry.listener_count()
    }

    /// Sorted ids of registered listeners.
    pub fn listeners(&self) -> Vec<ListenerId> {
        self.shared.registry.listeners()
    }

    /// Number of bindings for event kind `E`.
    pub fn handler_count<E: Event>(&self) -> usize {
        self.bindings::<E>().len()
    }

    /// Bindings for event kind `E`, in delivery order.
    pub fn bindings<E: Event>(&self) -> Vec<Arc<Binding>> {
        self.shared.registry.bindings(TypeId::of::<E>())
    }

    /// Unregisters every listener.
    pub fn clear(&self) {
        self.shared.registry.clear();
        tracing::debug!("all listeners unregistered");
    }

    fn deliver(&self, event: &Arc<dyn Event>) -> Delivery {
        let mut delivery = Delivery::default();
        let mut failures = Vec::new();

        if let Some(tiers) = self.shared.registry.snapshot(event.kind_id()) {
            for binding in tiers.iter().flat_map(|tier| tier.iter()) {
                if binding.skips(&**event) {
                    delivery.skipped += 1;
                    continue;
                }
                delivery.invoked += 1;
                if let Err(err) = self.invoke(binding, &**event) {
                    delivery.failed += 1;
                    failures.push(err);
                }
            }
        }

        for err in failures {
            self.report(event, err);
        }

        if self.shared.cfg.emit_dispatched && !event.is::<EventDispatched>() {
            let meta: Arc<dyn Event> = Arc::new(EventDispatched::new(Arc::clone(event)));
            self.deliver(&meta);
        }
        delivery
    }

    fn invoke(&self, binding: &Binding, event: &dyn Event) -> Result<(), HandlerError> {
        let outcome = if self.shared.cfg.catch_panics {
            match panic::catch_unwind(AssertUnwindSafe(|| binding.invoke(event))) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    return Err(HandlerError::Panicked {
                        listener: binding.listener().as_shared(),
                        handler: binding.handler(),
                        event: event.name().into(),
                        info: panic_message(&*payload),
                    });
                }
            }
        } else {
            binding.invoke(event)
        };

        outcome.map_err(|source| HandlerError::Failed {
            listener: binding.listener().as_shared(),
            handler: binding.handler(),
            event: event.name().into(),
            source,
        })
    }

    fn report(&self, event: &Arc<dyn Event>, err: HandlerError) {
        tracing::warn!(label = err.as_label(), error = %err, "event handler failed");

        if !self.shared.cfg.report_failures
            || event.is::<HandlerFailed>()
            || event.is::<EventDispatched>()
        {
            return;
        }
        self.dispatch(&Arc::new(err.to_report()));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Dispatch for EventBus {
    fn dispatch_dyn(&self, event: &Arc<dyn Event>) -> Delivery {
        self.deliver(event)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("cfg", &self.shared.cfg)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
