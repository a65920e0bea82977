//! # Function-backed listener (`ListenerFn`)
//!
//! [`ListenerFn`] wraps a closure `F: Fn(&mut Handlers)` that declares handlers, so small
//! listeners do not need a dedicated type. Shared state goes into `Arc<...>` captured by
//! the closures.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tierbus::{Call, Event, EventBus, Handlers, ListenerFn};
//!
//! #[derive(Debug)]
//! struct Tick;
//! impl Event for Tick {}
//!
//! let ticks = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&ticks);
//! let listener = ListenerFn::arc("ticker", move |h: &mut Handlers| {
//!     let counter = Arc::clone(&counter);
//!     h.on::<Tick>("on_tick").invoke(move |_| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     });
//! });
//!
//! let bus = EventBus::default();
//! bus.register(&listener).unwrap();
//! bus.call(Tick);
//! bus.call(Tick);
//! assert_eq!(ticks.load(Ordering::SeqCst), 2);
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::listeners::{Handlers, Listener};

/// Function-backed listener implementation.
pub struct ListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ListenerFn<F>
where
    F: Fn(&mut Handlers) + Send + Sync + 'static,
{
    /// Creates a new function-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`]: registration needs an `Arc`.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Listener for ListenerFn<F>
where
    F: Fn(&mut Handlers) + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn handlers(self: Arc<Self>, handlers: &mut Handlers) {
        (self.f)(handlers)
    }
}
