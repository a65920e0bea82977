//! # Built-in observers of dispatched events.
//!
//! Every listener here subscribes **once** to [`EventDispatched`](crate::EventDispatched)
//! at [`Priority::Monitor`](crate::Priority::Monitor), so it sees every event after all
//! of the event's own handlers ran.
//!
//! ## Architecture
//! ```text
//! EventBus ── EventDispatched ──┬──► LogWriter     (tracing records)
//!                               ├──► EventHistory  (bounded ring buffer)
//!                               └──► Relay ──► [queue] ──► Subscribe::on_event (tokio workers)
//! ```
//!
//! ## Implementing custom async subscribers
//! ```no_run
//! use std::sync::Arc;
//! use tierbus::{Call, Event, EventBus, EventDispatched, Relay, Subscribe};
//! use async_trait::async_trait;
//!
//! #[derive(Debug)]
//! struct Ping;
//! impl Event for Ping {}
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscribe for Metrics {
//!     async fn on_event(&self, ev: &EventDispatched) {
//!         if ev.downcast_ref::<Ping>().is_some() {
//!             // increment counter
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = EventBus::default();
//!     let relay = Arc::new(Relay::new(vec![Arc::new(Metrics) as Arc<dyn Subscribe>]));
//!     bus.register(&relay).unwrap();
//!     bus.call(Ping);
//!     relay.shutdown().await;
//! }
//! ```

mod filter;
mod history;
mod log;
mod relay;
mod subscribe;

pub use history::EventHistory;
pub use log::LogWriter;
pub use relay::Relay;
pub use subscribe::Subscribe;
