//! # tierbus
//!
//! **tierbus** is an in-process, type-keyed event bus for Rust.
//!
//! Listeners declare handlers for concrete event types; dispatching an event runs every
//! matching handler synchronously, in a deterministic priority order, on the caller's
//! thread. Events may carry a cancellation latch that gates follow-up work in the
//! call protocols.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Listener #1 │   │  Listener #2 │   │  LogWriter / │
//!     │  (handlers)  │   │  (handlers)  │   │  Relay / ... │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ register         ▼ register         ▼ register (EventDispatched, Monitor)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventBus                                                         │
//! │  - Registry: TypeId → [Earliest..Monitor] → bindings (COW lists)  │
//! │  - Dispatch: snapshot, visit tiers, isolate failures              │
//! │  - Follow-ups: HandlerFailed per failure, then EventDispatched    │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 ▲
//!                   call / call_then / call_around / call_map ...
//!                                 │
//!                             caller code
//! ```
//!
//! ### Dispatch of one event
//! ```text
//! dispatch(e) {
//!   snapshot = registry[type_of(e)]          // lock released before any handler runs
//!   for tier in Earliest, Early, Normal, Late, Latest, Monitor {
//!     for binding in snapshot[tier] {        // registration order
//!       if binding skips cancelled && e cancelled ─► skip
//!       invoke ─► Err/panic ─► warn!, queue HandlerFailed
//!     }
//!   }
//!   dispatch(HandlerFailed) for each failure
//!   dispatch(EventDispatched { e, at, seq }) // never for EventDispatched itself
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                        |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------|
//! | **Events**        | Type-keyed events, optional cancellation latch.              | [`Event`], [`Cancellable`], [`CancelFlag`]|
//! | **Listeners**     | Explicit handler declaration, validated at registration.     | [`Listener`], [`Handlers`], [`ListenerFn`]|
//! | **Policies**      | Priority tiers and cancelled-event policy per handler.       | [`Priority`], [`CancelPolicy`]            |
//! | **Bus**           | Registration and synchronous, ordered dispatch.              | [`EventBus`], [`Dispatch`]                |
//! | **Call protocols**| Pre/effect/post helpers gated by cancellation.               | [`Call`]                                  |
//! | **Observers**     | Logging, in-memory history, async hand-off.                  | [`LogWriter`], [`EventHistory`], [`Relay`]|
//! | **Errors**        | Typed registration and handler errors.                       | [`RegistrationError`], [`HandlerError`]   |
//! | **Configuration** | Follow-up events and panic isolation.                        | [`Config`]                                |
//!
//! ## Example
//! ```rust
//! use tierbus::{Call, CancelFlag, Cancellable, Config, Event, EventBus, Handlers, ListenerFn, Priority};
//!
//! #[derive(Debug, Default)]
//! struct Withdraw {
//!     amount: u64,
//!     cancel: CancelFlag,
//! }
//!
//! impl Event for Withdraw {
//!     fn cancellable(&self) -> Option<&dyn Cancellable> {
//!         Some(&self.cancel)
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Withdrawn(u64);
//! impl Event for Withdrawn {}
//!
//! let bus = EventBus::builder(Config::default())
//!     .listener(ListenerFn::arc("limits", |h: &mut Handlers| {
//!         h.on::<Withdraw>("check_limit")
//!             .priority(Priority::Early)
//!             .invoke(|ev| {
//!                 if ev.amount > 100 {
//!                     ev.cancel.set_cancelled(true);
//!                 }
//!                 Ok(())
//!             });
//!     }))
//!     .build()
//!     .expect("valid listeners");
//!
//! let mut balance = 150;
//! let paid = bus.call_map(
//!     Withdraw { amount: 40, ..Default::default() },
//!     || { balance -= 40; 40 },
//!     |n| Withdrawn(*n),
//! );
//! assert_eq!(paid, Some(40));
//!
//! let refused = bus.call_then(Withdraw { amount: 500, ..Default::default() }, || balance -= 500);
//! assert!(!refused);
//! assert_eq!(balance, 110);
//! ```
mod core;
mod error;
mod events;
mod listeners;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{BusBuilder, Call, Config, Delivery, Dispatch, EventBus};
pub use error::{HandlerError, RegistrationError};
pub use events::{
    is_cancelled, AsAny, CancelFlag, Cancellable, Event, EventDispatched, HandlerFailed,
    PropertyChanged,
};
pub use listeners::{Binding, HandlerDecl, Handlers, Listener, ListenerFn, ListenerId};
pub use policies::{CancelPolicy, Priority};
pub use subscribers::{EventHistory, LogWriter, Relay, Subscribe};
