//! Event data model.
//!
//! ## Contents
//! - [`Event`], [`Cancellable`], [`CancelFlag`]: the event contract and its optional
//!   cancellation capability
//! - [`EventDispatched`], [`HandlerFailed`]: events emitted by the bus itself
//! - [`PropertyChanged`]: generic value-change event

mod builtin;
mod event;

pub use builtin::{EventDispatched, HandlerFailed, PropertyChanged};
pub use event::{is_cancelled, AsAny, CancelFlag, Cancellable, Event};

pub(crate) use event::short_type_name;
