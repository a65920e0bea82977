//! # Listener contract
//!
//! [`Listener`] is the extension point for plugging handlers into an
//! [`EventBus`](crate::EventBus). Instead of discovering handler methods at runtime,
//! a listener **lists** them explicitly when it is registered.
//!
//! ## Identity
//! A listener is identified by [`ListenerId`] = `"<name>@<address>"`: its name plus the
//! address of the `Arc` it was registered through. Registering the same `Arc` again
//! replaces its bindings; a different `Arc` of the same type is a different listener.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tierbus::{Call, Event, EventBus, Handlers, Listener, Priority};
//!
//! #[derive(Debug)]
//! struct Joined(&'static str);
//! impl Event for Joined {}
//!
//! #[derive(Default)]
//! struct Greeter {
//!     greeted: AtomicUsize,
//! }
//!
//! impl Greeter {
//!     fn on_joined(&self, ev: &Joined) -> anyhow::Result<()> {
//!         assert!(!ev.0.is_empty());
//!         self.greeted.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     }
//! }
//!
//! impl Listener for Greeter {
//!     fn handlers(self: Arc<Self>, handlers: &mut Handlers) {
//!         handlers
//!             .on::<Joined>("on_joined")
//!             .priority(Priority::Normal)
//!             .invoke(move |ev| self.on_joined(ev));
//!     }
//! }
//!
//! let bus = EventBus::default();
//! let greeter = Arc::new(Greeter::default());
//! bus.register(&greeter).unwrap();
//! bus.call(Joined("alice"));
//! assert_eq!(greeter.greeted.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::events::short_type_name;
use crate::listeners::Handlers;

/// Contract for objects owning event handlers.
///
/// `handlers` is called once per registration; callbacks typically capture the
/// `Arc<Self>` they are given.
pub trait Listener: Send + Sync + 'static {
    /// Human-readable name (for logs and listener identity).
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Declares every handler of this listener.
    fn handlers(self: Arc<Self>, handlers: &mut Handlers);
}

/// Unique identity of a registered listener (`name@address`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(Arc<str>);

impl ListenerId {
    /// Identity of `listener` as seen by the bus.
    pub fn of<L: Listener + ?Sized>(listener: &Arc<L>) -> Self {
        let addr = Arc::as_ptr(listener).cast::<()>() as usize;
        Self(format!("{}@{addr:#x}", listener.name()).into())
    }

    pub(crate) fn from_raw(raw: &str) -> Self {
        Self(raw.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub(crate) fn as_shared(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId({})", self.0)
    }
}
