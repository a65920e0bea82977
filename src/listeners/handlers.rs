//! # Handler declarations and draft validation.
//!
//! A listener declares its handlers into a [`Handlers`] collector:
//! ```text
//! handlers.on::<E>("member")          → slot reserved (Pending)
//!         .priority(Priority::Early)   → tier
//!         .ignore_cancelled(true)      → CancelPolicy::SkipCancelled
//!         .invoke(|ev: &E| { .. })     → slot filled (Ready)
//! ```
//! Nothing touches the shared registry while declarations are collected. Once the
//! listener returns, [`Handlers::finish`] validates the whole draft and either yields
//! every binding or the first error, naming the offending member.
//!
//! ## Rules
//! - Handler names must be non-empty and unique within a listener.
//! - Every `on(..)` must be completed with `.invoke(..)`.
//! - The event kind must not be [deprecated](crate::Event::deprecated).

use std::any::TypeId;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::events::{short_type_name, Event};
use crate::listeners::{Binding, ListenerId};
use crate::policies::{CancelPolicy, Priority};

enum Draft {
    Pending { handler: &'static str },
    Ready { binding: Binding, deprecated: bool },
}

/// Draft set of handlers declared by one listener.
pub struct Handlers {
    listener: ListenerId,
    name: String,
    drafts: Vec<Draft>,
}

impl Handlers {
    pub(crate) fn new(listener: ListenerId, name: impl Into<String>) -> Self {
        Self {
            listener,
            name: name.into(),
            drafts: Vec::new(),
        }
    }

    /// Identity of the listener being registered.
    #[inline]
    pub fn listener(&self) -> &ListenerId {
        &self.listener
    }

    /// Starts declaring a handler member named `handler` for event kind `E`.
    ///
    /// Defaults: [`Priority::Normal`], [`CancelPolicy::ReceiveCancelled`].
    pub fn on<E: Event>(&mut self, handler: &'static str) -> HandlerDecl<'_, E> {
        let slot = self.drafts.len();
        self.drafts.push(Draft::Pending { handler });
        HandlerDecl {
            set: self,
            slot,
            handler,
            priority: Priority::default(),
            cancel: CancelPolicy::default(),
            _event: PhantomData,
        }
    }

    /// Number of declarations collected so far (complete or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Validates the draft, yielding every binding in declaration order.
    pub(crate) fn finish(self) -> Result<Vec<Arc<Binding>>, RegistrationError> {
        let Handlers { name, drafts, .. } = self;
        let mut seen = HashSet::with_capacity(drafts.len());
        let mut bindings = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let handler = match &draft {
                Draft::Pending { handler } => *handler,
                Draft::Ready { binding, .. } => binding.handler(),
            };
            if handler.trim().is_empty() {
                return Err(invalid(name, handler, "handler name is empty"));
            }
            if !seen.insert(handler) {
                return Err(invalid(name, handler, "duplicate handler name"));
            }

            match draft {
                Draft::Pending { handler } => {
                    return Err(RegistrationError::IncompleteHandler {
                        listener: name,
                        handler: handler.to_string(),
                    });
                }
                Draft::Ready {
                    deprecated: true,
                    binding,
                } => {
                    return Err(RegistrationError::DeprecatedEvent {
                        listener: name,
                        handler: binding.handler().to_string(),
                        event: binding.event(),
                    });
                }
                Draft::Ready { binding, .. } => bindings.push(Arc::new(binding)),
            }
        }
        Ok(bindings)
    }
}

fn invalid(listener: String, handler: &str, reason: &'static str) -> RegistrationError {
    RegistrationError::InvalidHandler {
        listener,
        handler: handler.to_string(),
        reason,
    }
}

/// In-progress declaration of one handler member; complete it with [`invoke`](Self::invoke).
#[must_use = "a handler declaration does nothing until `.invoke(..)` is called"]
pub struct HandlerDecl<'a, E> {
    set: &'a mut Handlers,
    slot: usize,
    handler: &'static str,
    priority: Priority,
    cancel: CancelPolicy,
    _event: PhantomData<fn(&E)>,
}

impl<E: Event> HandlerDecl<'_, E> {
    /// Sets the ordering tier.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// `true` → skip this handler when the event is already cancelled.
    pub fn ignore_cancelled(mut self, ignore: bool) -> Self {
        self.cancel = CancelPolicy::from_ignore_cancelled(ignore);
        self
    }

    /// Sets the cancellation policy explicitly.
    pub fn cancel_policy(mut self, cancel: CancelPolicy) -> Self {
        self.cancel = cancel;
        self
    }

    /// Completes the declaration with its callback.
    pub fn invoke<F>(self, f: F)
    where
        F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let event = short_type_name(std::any::type_name::<E>());
        let callback = move |ev: &dyn Event| match ev.downcast_ref::<E>() {
            Some(ev) => f(ev),
            None => Err(anyhow::anyhow!("expected {event}, got {}", ev.name())),
        };
        let binding = Binding::new(
            self.set.listener.clone(),
            self.handler,
            TypeId::of::<E>(),
            event,
            self.priority,
            self.cancel,
            Box::new(callback),
        );
        self.set.drafts[self.slot] = Draft::Ready {
            binding,
            deprecated: E::deprecated(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn handlers() -> Handlers {
        Handlers::new(ListenerId::from_raw("Test@0x1"), "Test")
    }

    #[test]
    fn test_finish_keeps_declaration_order() {
        let mut h = handlers();
        h.on::<Ping>("first").invoke(|_| Ok(()));
        h.on::<Ping>("second")
            .priority(Priority::Monitor)
            .ignore_cancelled(true)
            .invoke(|_| Ok(()));

        let bindings = h.finish().unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].handler(), "first");
        assert_eq!(bindings[0].priority(), Priority::Normal);
        assert_eq!(bindings[1].handler(), "second");
        assert_eq!(bindings[1].priority(), Priority::Monitor);
        assert_eq!(bindings[1].cancel_policy(), CancelPolicy::SkipCancelled);
        assert_eq!(bindings[1].event(), "Ping");
        assert_eq!(bindings[1].kind(), TypeId::of::<Ping>());
    }

    #[test]
    fn test_deprecated_event_rejected_by_name() {
        let mut h = handlers();
        h.on::<Ping>("ok").invoke(|_| Ok(()));
        h.on::<Legacy>("on_legacy").invoke(|_| Ok(()));

        let err = h.finish().unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DeprecatedEvent {
                listener: "Test".into(),
                handler: "on_legacy".into(),
                event: "Legacy",
            }
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut h = handlers();
        h.on::<Ping>("on_ping").invoke(|_| Ok(()));
        h.on::<Ping>("on_ping").invoke(|_| Ok(()));

        let err = h.finish().unwrap_err();
        assert_eq!(err.as_label(), "registration_invalid_handler");
        assert_eq!(err.handler(), "on_ping");
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut h = handlers();
        h.on::<Ping>(" ").invoke(|_| Ok(()));
        assert_eq!(
            h.finish().unwrap_err().as_label(),
            "registration_invalid_handler"
        );
    }

    #[test]
    fn test_incomplete_declaration_rejected() {
        let mut h = handlers();
        let _ = h.on::<Ping>("dangling");
        assert_eq!(h.len(), 1);

        let err = h.finish().unwrap_err();
        assert_eq!(
            err,
            RegistrationError::IncompleteHandler {
                listener: "Test".into(),
                handler: "dangling".into(),
            }
        );
    }

    #[test]
    fn test_callback_receives_concrete_event() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let hits = Arc::new(AtomicUsize::new(0));
        let mut h = handlers();
        let counter = Arc::clone(&hits);
        h.on::<Ping>("on_ping").invoke(move |_ping: &Ping| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let bindings = h.finish().unwrap();
        bindings[0].invoke(&Ping).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(bindings[0].invoke(&Legacy).is_err());
    }
}
