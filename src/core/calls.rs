//! # Call protocols: dispatch composed with cancellation-gated continuations.
//!
//! [`Call`] is implemented for every [`Dispatch`]; it uses nothing but
//! [`Dispatch::dispatch`] and [`is_cancelled`](crate::is_cancelled).
//!
//! ```text
//! call_around(pre, effect, post)
//!     │
//!     ├─► dispatch(pre)
//!     ├─► pre cancelled? ── yes ──► return false
//!     ├─► effect()
//!     └─► dispatch(post) ─────────► return true
//! ```
//!
//! ## Rules
//! - A continuation runs only if the gating event ends its dispatch uncancelled.
//! - Events that are not cancellable never gate anything.
//! - `post` is never dispatched before the effect returned.
//! - The `bool` results report whether the continuation ran.

use std::sync::Arc;

use super::dispatch::Dispatch;
use crate::events::{is_cancelled, Event};

/// Composition helpers over [`Dispatch`].
///
/// # Example
/// ```
/// use tierbus::{Call, CancelFlag, Cancellable, Config, Event, EventBus};
///
/// #[derive(Debug, Default)]
/// struct Saving { cancel: CancelFlag }
/// impl Event for Saving {
///     fn cancellable(&self) -> Option<&dyn Cancellable> { Some(&self.cancel) }
/// }
///
/// #[derive(Debug)]
/// struct Saved(u32);
/// impl Event for Saved {}
///
/// let bus = EventBus::new(Config::default());
/// let written = bus.call_map(Saving::default(), || 42, |n| Saved(*n));
/// assert_eq!(written, Some(42));
/// ```
pub trait Call: Dispatch {
    /// Dispatches `event` and hands it back.
    fn call<E: Event>(&self, event: E) -> Arc<E> {
        let event = Arc::new(event);
        self.dispatch(&event);
        event
    }

    /// Dispatches `event`, then runs `effect` if it ended uncancelled.
    fn call_then<E, F>(&self, event: E, effect: F) -> bool
    where
        E: Event,
        F: FnOnce(),
    {
        let event = self.call(event);
        if is_cancelled(&*event) {
            return false;
        }
        effect();
        true
    }

    /// Dispatches `pre`, then `post` if `pre` ended uncancelled.
    fn call_pair<P, Q>(&self, pre: P, post: Q) -> bool
    where
        P: Event,
        Q: Event,
    {
        let pre = self.call(pre);
        if is_cancelled(&*pre) {
            return false;
        }
        self.call(post);
        true
    }

    /// Dispatches `pre`; if uncancelled runs `effect` and then dispatches `post`.
    fn call_around<P, F, Q>(&self, pre: P, effect: F, post: Q) -> bool
    where
        P: Event,
        F: FnOnce(),
        Q: Event,
    {
        let pre = self.call(pre);
        if is_cancelled(&*pre) {
            return false;
        }
        effect();
        self.call(post);
        true
    }

    /// Dispatches `pre`; if uncancelled runs `effect`, and dispatches `post` only if
    /// `effect` returned `true`.
    ///
    /// Returns whether `effect` ran.
    fn call_if<P, F, Q>(&self, pre: P, effect: F, post: Q) -> bool
    where
        P: Event,
        F: FnOnce() -> bool,
        Q: Event,
    {
        let pre = self.call(pre);
        if is_cancelled(&*pre) {
            return false;
        }
        if effect() {
            self.call(post);
        }
        true
    }

    /// Dispatches `pre`; if uncancelled produces a value, dispatches the event built
    /// from it and returns it.
    ///
    /// Returns `None` without calling `produce` when `pre` was cancelled.
    fn call_map<P, T, F, G, Q>(&self, pre: P, produce: F, post: G) -> Option<T>
    where
        P: Event,
        F: FnOnce() -> T,
        G: FnOnce(&T) -> Q,
        Q: Event,
    {
        let pre = self.call(pre);
        if is_cancelled(&*pre) {
            return None;
        }
        let value = produce();
        self.call(post(&value));
        Some(value)
    }
}

impl<D: Dispatch> Call for D {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::Delivery;
    use crate::events::{CancelFlag, Cancellable};
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct Pre {
        cancel: CancelFlag,
    }
    impl Event for Pre {
        fn cancellable(&self) -> Option<&dyn Cancellable> {
            Some(&self.cancel)
        }
    }

    #[derive(Debug)]
    struct Post(u32);
    impl Event for Post {}

    #[derive(Debug)]
    struct Plain;
    impl Event for Plain {}

    /// Records dispatched event names, optionally cancelling every `Pre`.
    #[derive(Default)]
    struct Recorder {
        veto: bool,
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn vetoing() -> Self {
            Self {
                veto: true,
                ..Self::default()
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().clone()
        }
    }

    impl Dispatch for Recorder {
        fn dispatch_dyn(&self, event: &Arc<dyn Event>) -> Delivery {
            if self.veto {
                if let Some(c) = event.cancellable() {
                    c.set_cancelled(true);
                }
            }
            let entry = match event.downcast_ref::<Post>() {
                Some(Post(n)) => format!("Post({n})"),
                None => event.name().to_string(),
            };
            self.seen.lock().push(entry);
            Delivery {
                invoked: 1,
                ..Delivery::default()
            }
        }
    }

    #[test]
    fn test_call_returns_dispatched_event() {
        let rec = Recorder::vetoing();
        let ev = rec.call(Pre::default());
        assert!(is_cancelled(&*ev));
        assert_eq!(rec.seen(), ["Pre"]);
    }

    #[test]
    fn test_call_then_runs_effect_only_when_uncancelled() {
        let rec = Recorder::default();
        let mut ran = false;
        assert!(rec.call_then(Pre::default(), || ran = true));
        assert!(ran);

        let rec = Recorder::vetoing();
        let mut ran = false;
        assert!(!rec.call_then(Pre::default(), || ran = true));
        assert!(!ran);
    }

    #[test]
    fn test_non_cancellable_events_never_gate() {
        let rec = Recorder::vetoing();
        let mut ran = false;
        assert!(rec.call_then(Plain, || ran = true));
        assert!(ran);
    }

    #[test]
    fn test_call_pair() {
        let rec = Recorder::default();
        assert!(rec.call_pair(Pre::default(), Post(1)));
        assert_eq!(rec.seen(), ["Pre", "Post(1)"]);

        let rec = Recorder::vetoing();
        assert!(!rec.call_pair(Pre::default(), Post(1)));
        assert_eq!(rec.seen(), ["Pre"]);
    }

    #[test]
    fn test_call_around_runs_effect_before_post() {
        let rec = Recorder::default();
        let order = Mutex::new(Vec::new());
        let ran = rec.call_around(
            Pre::default(),
            || order.lock().push(rec.seen().len()),
            Post(2),
        );
        assert!(ran);
        // effect observed only `pre` as dispatched
        assert_eq!(*order.lock(), [1]);
        assert_eq!(rec.seen(), ["Pre", "Post(2)"]);

        let rec = Recorder::vetoing();
        let mut effect = false;
        assert!(!rec.call_around(Pre::default(), || effect = true, Post(2)));
        assert!(!effect);
        assert_eq!(rec.seen(), ["Pre"]);
    }

    #[test]
    fn test_call_if_dispatches_post_on_true_only() {
        let rec = Recorder::default();
        assert!(rec.call_if(Pre::default(), || false, Post(3)));
        assert_eq!(rec.seen(), ["Pre"]);

        assert!(rec.call_if(Pre::default(), || true, Post(3)));
        assert_eq!(rec.seen(), ["Pre", "Pre", "Post(3)"]);

        let rec = Recorder::vetoing();
        let mut called = false;
        assert!(!rec.call_if(
            Pre::default(),
            || {
                called = true;
                true
            },
            Post(3)
        ));
        assert!(!called);
    }

    #[test]
    fn test_call_map_hands_value_to_post() {
        let rec = Recorder::default();
        let out = rec.call_map(Pre::default(), || 7u32, |n| Post(*n * 2));
        assert_eq!(out, Some(7));
        assert_eq!(rec.seen(), ["Pre", "Post(14)"]);
    }

    #[test]
    fn test_call_map_skips_produce_when_cancelled() {
        let rec = Recorder::vetoing();
        let mut produced = false;
        let out: Option<u32> = rec.call_map(
            Pre::default(),
            || {
                produced = true;
                1
            },
            |n| Post(*n),
        );
        assert_eq!(out, None);
        assert!(!produced);
        assert_eq!(rec.seen(), ["Pre"]);
    }
}
