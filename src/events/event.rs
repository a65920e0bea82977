//! # Event model: the [`Event`] trait and the cancellation capability.
//!
//! Events are plain data carriers. The **concrete Rust type** of an event value is its
//! dispatch key: a handler declared for `PlayerJoined` only ever sees `PlayerJoined`.
//!
//! ## Cancellation
//! An event type may opt into the [`Cancellable`] capability by returning itself from
//! [`Event::cancellable`]. Absence of the capability means "never cancelled".
//! Handlers receive events by shared reference, so the latch lives behind interior
//! mutability; [`CancelFlag`] is the ready-made latch.
//!
//! ## Example
//! ```rust
//! use tierbus::{Cancellable, CancelFlag, Event};
//!
//! #[derive(Debug, Default)]
//! struct BlockBreak {
//!     x: i32,
//!     cancel: CancelFlag,
//! }
//!
//! impl Event for BlockBreak {
//!     fn cancellable(&self) -> Option<&dyn Cancellable> {
//!         Some(&self.cancel)
//!     }
//! }
//!
//! let ev = BlockBreak::default();
//! assert!(!tierbus::is_cancelled(&ev));
//! ev.cancel.set_cancelled(true);
//! assert!(tierbus::is_cancelled(&ev));
//! assert_eq!(ev.name(), "BlockBreak");
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Upcast helper so that `&dyn Event` can be downcast to its concrete type.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Contract for values that can travel through the bus.
///
/// The only required bound is `Debug + Send + Sync + 'static`; every method has a default.
pub trait Event: AsAny + fmt::Debug + Send + Sync {
    /// User-friendly name, used in logs and failure reports.
    ///
    /// Defaults to the unqualified type name (`my_crate::events::Foo` → `Foo`).
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Exposes the cancellation latch, if this event kind has one.
    fn cancellable(&self) -> Option<&dyn Cancellable> {
        None
    }

    /// Marks the event kind as deprecated; registering a handler for it fails.
    ///
    /// A kind that wraps a "parent" kind should return `Self::deprecated() || Parent::deprecated()`.
    fn deprecated() -> bool
    where
        Self: Sized,
    {
        false
    }
}

impl dyn Event {
    /// Dispatch key of the concrete event behind this reference.
    #[inline]
    pub fn kind_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Returns `true` if the concrete event is of type `E`.
    #[inline]
    pub fn is<E: Event>(&self) -> bool {
        self.as_any().is::<E>()
    }

    /// Borrows the concrete event as `E`, if it is one.
    #[inline]
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

/// Optional capability: a boolean cancellation latch.
///
/// Setting the latch never stops delivery; it only gates continuations in the
/// [`Call`](crate::Call) protocols and bindings declared with
/// [`CancelPolicy::SkipCancelled`](crate::CancelPolicy::SkipCancelled).
pub trait Cancellable: Send + Sync {
    fn is_cancelled(&self) -> bool;
    fn set_cancelled(&self, cancelled: bool);
}

/// Returns `true` if `event` is cancellable and currently cancelled.
#[inline]
pub fn is_cancelled<E: Event + ?Sized>(event: &E) -> bool {
    event.cancellable().is_some_and(|c| c.is_cancelled())
}

/// `AtomicBool`-backed cancellation latch.
#[derive(Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancelFlag {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    fn set_cancelled(&self, cancelled: bool) {
        self.0.store(cancelled, Ordering::Release);
    }
}

impl fmt::Debug for CancelFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CancelFlag({})", self.is_cancelled())
    }
}

/// Strips module path and generic arguments' paths from a type name.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let head = match full.find('<') {
        Some(i) => &full[..i],
        None => full,
    };
    match head.rfind("::") {
        Some(i) => &full[i + 2..],
        None => full,
    }
}
