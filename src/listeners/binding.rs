//! # Handler binding
//!
//! A [`Binding`] is the immutable, validated association of one listener callback with
//! one event kind, a [`Priority`] tier and a [`CancelPolicy`]. Bindings are only ever
//! created by [`Handlers`](crate::Handlers) during registration and destroyed when their
//! listener is unregistered.

use std::any::TypeId;
use std::fmt;

use crate::events::Event;
use crate::listeners::ListenerId;
use crate::policies::{CancelPolicy, Priority};

/// Type-erased callback: receives the event as `&dyn Event` and downcasts internally.
pub(crate) type Callback = dyn Fn(&dyn Event) -> anyhow::Result<()> + Send + Sync;

/// Validated subscription of one listener member to one event kind.
pub struct Binding {
    listener: ListenerId,
    handler: &'static str,
    kind: TypeId,
    event: &'static str,
    priority: Priority,
    cancel: CancelPolicy,
    callback: Box<Callback>,
}

impl Binding {
    pub(crate) fn new(
        listener: ListenerId,
        handler: &'static str,
        kind: TypeId,
        event: &'static str,
        priority: Priority,
        cancel: CancelPolicy,
        callback: Box<Callback>,
    ) -> Self {
        Self {
            listener,
            handler,
            kind,
            event,
            priority,
            cancel,
            callback,
        }
    }

    /// Owning listener.
    #[inline]
    pub fn listener(&self) -> &ListenerId {
        &self.listener
    }

    /// Handler member name, as declared by the listener.
    #[inline]
    pub fn handler(&self) -> &'static str {
        self.handler
    }

    /// Dispatch key of the event kind.
    #[inline]
    pub fn kind(&self) -> TypeId {
        self.kind
    }

    /// Name of the event kind.
    #[inline]
    pub fn event(&self) -> &'static str {
        self.event
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[inline]
    pub fn cancel_policy(&self) -> CancelPolicy {
        self.cancel
    }

    /// Returns `true` if this binding must not see `event` in its current state.
    #[inline]
    pub(crate) fn skips(&self, event: &dyn Event) -> bool {
        self.cancel.ignores_cancelled() && crate::events::is_cancelled(event)
    }

    #[inline]
    pub(crate) fn invoke(&self, event: &dyn Event) -> anyhow::Result<()> {
        (self.callback)(event)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("listener", &self.listener)
            .field("handler", &self.handler)
            .field("event", &self.event)
            .field("priority", &self.priority)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}
