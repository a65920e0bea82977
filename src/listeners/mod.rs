//! Listeners and their handler bindings.
//!
//! This module provides the registration-side types:
//! - [`Listener`] - trait for objects that own event handlers
//! - [`ListenerFn`] - closure-backed listener
//! - [`ListenerId`] - identity used for replacement and removal
//! - [`Handlers`] / [`HandlerDecl`] - draft collector validated at registration
//! - [`Binding`] - validated, immutable handler subscription

mod binding;
mod handlers;
mod listener;
mod listener_fn;

pub use binding::Binding;
pub use handlers::{HandlerDecl, Handlers};
pub use listener::{Listener, ListenerId};
pub use listener_fn::ListenerFn;
