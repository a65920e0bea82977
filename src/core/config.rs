//! # Bus configuration.
//!
//! Provides [`Config`], centralized settings for an [`EventBus`](crate::EventBus).
//!
//! Config is used in two ways:
//! 1. **Direct creation**: `EventBus::new(config)`
//! 2. **Builder**: `EventBus::builder(config).with_listeners(..).build()`

/// Settings of one event bus.
///
/// ## Field semantics
/// - `emit_dispatched`: follow every delivery with an [`EventDispatched`](crate::EventDispatched)
/// - `report_failures`: follow a delivery with one [`HandlerFailed`](crate::HandlerFailed) per failing binding
/// - `catch_panics`: isolate panicking handlers (`false` lets the panic unwind to the caller)
///
/// ## Notes
/// All fields are public for flexibility.
#[derive(Clone, Debug)]
pub struct Config {
    /// Dispatch an [`EventDispatched`](crate::EventDispatched) after each event's own
    /// handlers ran.
    ///
    /// Never applied to `EventDispatched` itself.
    pub emit_dispatched: bool,

    /// Dispatch a [`HandlerFailed`](crate::HandlerFailed) for each binding that returned
    /// `Err` or panicked.
    ///
    /// Failures are always logged through `tracing`. Failures while delivering
    /// `HandlerFailed` or `EventDispatched` are logged only, never re-dispatched.
    pub report_failures: bool,

    /// Catch panics raised by handlers and treat them as failures.
    pub catch_panics: bool,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `emit_dispatched = true`
    /// - `report_failures = true`
    /// - `catch_panics = true`
    fn default() -> Self {
        Self {
            emit_dispatched: true,
            report_failures: true,
            catch_panics: true,
        }
    }
}

impl Config {
    /// Configuration with every follow-up event disabled: handlers only.
    pub fn quiet() -> Self {
        Self {
            emit_dispatched: false,
            report_failures: false,
            ..Self::default()
        }
    }
}
