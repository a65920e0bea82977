//! Bus core: registry, dispatch and call protocols.
//!
//! The public API from this module is [`EventBus`] (plus its builder and config) and
//! the [`Dispatch`]/[`Call`] traits.
//!
//! Internal modules:
//! - [`registry`]: per-kind, per-tier binding lists with copy-on-write snapshots;
//! - [`bus`]: registration, synchronous delivery, failure reports and the meta-event;
//! - [`calls`]: pre/effect/post protocols gated by cancellation.

mod builder;
mod bus;
mod calls;
mod config;
mod dispatch;
mod registry;

pub use builder::BusBuilder;
pub use bus::EventBus;
pub use calls::Call;
pub use config::Config;
pub use dispatch::{Delivery, Dispatch};
