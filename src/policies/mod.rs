//! Delivery policies.
//!
//! This module groups the knobs that control **when** a binding runs and **whether**
//! it runs for an already-cancelled event.
//!
//! ## Contents
//! - [`Priority`] ordering tier (earliest … monitor)
//! - [`CancelPolicy`] receive or skip cancelled events
//!
//! ## Quick wiring
//! ```text
//! handlers.on::<E>("member").priority(Priority)  .ignore_cancelled(bool)
//!      └─► Binding { priority, cancel_policy }
//!           └─► core::bus visits tiers ascending, skips per cancel_policy
//! ```
//!
//! ## Defaults
//! - `Priority::Normal`
//! - `CancelPolicy::ReceiveCancelled`

mod priority;

pub use priority::{CancelPolicy, Priority};
