//! # Async subscriber trait
//!
//! `Subscribe` is the extension point for observers that need to do slow or async
//! work (I/O, batching, retries) on dispatched events. Each subscriber is driven by
//! a dedicated worker task fed by a bounded queue owned by a [`Relay`](crate::Relay);
//! dispatch itself never waits for it.
//!
//! ## Contract
//! - Implementations may be slow; they do **not** block the dispatching thread nor
//!   other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** (warn).
//! - [`Subscribe::accepts`] filters synchronously before queueing, typically by
//!   wrapped event kind (`ev.event.is::<E>()`), so uninteresting kinds never occupy
//!   the queue.
//!
//! ## Example (skeleton)
//! ```rust
//! use tierbus::{EventDispatched, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, ev: &EventDispatched) {
//!         // write audit record...
//!         let _ = ev.event_name();
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//!     fn queue_capacity(&self) -> usize { 512 }
//!     fn accepts(&self, ev: &EventDispatched) -> bool {
//!         !ev.event.is::<tierbus::HandlerFailed>()
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::EventDispatched;

/// Contract for async event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single dispatch notification.
    async fn on_event(&self, event: &EventDispatched);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }

    /// Decides, on the dispatching thread, whether `event` is queued for this subscriber.
    ///
    /// Rejected events never take a queue slot. Keep it cheap: it runs inside dispatch.
    fn accepts(&self, _event: &EventDispatched) -> bool {
        true
    }
}
