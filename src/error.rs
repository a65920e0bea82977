//! Error types used by the bus and its listeners.
//!
//! This module defines two error enums:
//!
//! - [`RegistrationError`]: a listener's handler set was rejected; surfaced to the caller
//!   of [`EventBus::register`](crate::EventBus::register), registry unchanged.
//! - [`HandlerError`]: one binding failed during delivery; built at the dispatch
//!   boundary, logged and reported as [`HandlerFailed`](crate::HandlerFailed), never
//!   propagated to the dispatching caller.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

use crate::events::HandlerFailed;

/// # Errors produced while registering a listener.
///
/// Registration is all-or-nothing: on any of these errors no binding of the
/// listener is installed (and a previous registration of it is left untouched).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A handler member has an invalid declaration (empty or duplicated name).
    #[error("{listener} attempted to register an invalid event handler '{handler}': {reason}")]
    InvalidHandler {
        /// Listener name.
        listener: String,
        /// Offending handler member.
        handler: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A handler targets an event kind flagged as deprecated.
    #[error("{listener}::{handler} targets deprecated event {event}")]
    DeprecatedEvent {
        /// Listener name.
        listener: String,
        /// Offending handler member.
        handler: String,
        /// Deprecated event kind.
        event: &'static str,
    },

    /// A handler declaration was started but never given a callback.
    #[error("{listener}::{handler} was declared without a callback")]
    IncompleteHandler {
        /// Listener name.
        listener: String,
        /// Offending handler member.
        handler: String,
    },
}

impl RegistrationError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tierbus::RegistrationError;
    ///
    /// let err = RegistrationError::IncompleteHandler {
    ///     listener: "Audit".into(),
    ///     handler: "on_login".into(),
    /// };
    /// assert_eq!(err.as_label(), "registration_incomplete_handler");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistrationError::InvalidHandler { .. } => "registration_invalid_handler",
            RegistrationError::DeprecatedEvent { .. } => "registration_deprecated_event",
            RegistrationError::IncompleteHandler { .. } => "registration_incomplete_handler",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistrationError::InvalidHandler { handler, reason, .. } => {
                format!("invalid handler '{handler}': {reason}")
            }
            RegistrationError::DeprecatedEvent { handler, event, .. } => {
                format!("handler '{handler}' targets deprecated event {event}")
            }
            RegistrationError::IncompleteHandler { handler, .. } => {
                format!("handler '{handler}' has no callback")
            }
        }
    }

    /// Name of the handler member that caused the rejection.
    pub fn handler(&self) -> &str {
        match self {
            RegistrationError::InvalidHandler { handler, .. }
            | RegistrationError::DeprecatedEvent { handler, .. }
            | RegistrationError::IncompleteHandler { handler, .. } => handler,
        }
    }
}

/// # Errors escaping a single handler invocation.
///
/// Caught at the dispatch boundary; one failing subscriber never blocks delivery to
/// the others.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The callback returned `Err`.
    #[error("{listener}::{handler} failed on {event}: {source:#}")]
    Failed {
        listener: Arc<str>,
        handler: &'static str,
        event: Arc<str>,
        #[source]
        source: anyhow::Error,
    },

    /// The callback panicked.
    #[error("{listener}::{handler} panicked on {event}: {info}")]
    Panicked {
        listener: Arc<str>,
        handler: &'static str,
        event: Arc<str>,
        info: String,
    },
}

impl HandlerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { source, .. } => format!("error: {source:#}"),
            HandlerError::Panicked { info, .. } => format!("panic: {info}"),
        }
    }

    #[inline]
    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerError::Panicked { .. })
    }

    /// Event form of this failure, dispatched as a follow-up of the delivery.
    pub(crate) fn to_report(&self) -> HandlerFailed {
        match self {
            HandlerError::Failed {
                listener,
                handler,
                event,
                source,
            } => HandlerFailed {
                listener: Arc::clone(listener),
                handler: *handler,
                event: Arc::clone(event),
                error: format!("{source:#}").into(),
                panicked: false,
            },
            HandlerError::Panicked {
                listener,
                handler,
                event,
                info,
            } => HandlerFailed {
                listener: Arc::clone(listener),
                handler: *handler,
                event: Arc::clone(event),
                error: info.as_str().into(),
                panicked: true,
            },
        }
    }
}

/// Extracts the message of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_names_member() {
        let err = RegistrationError::DeprecatedEvent {
            listener: "Audit".into(),
            handler: "on_legacy".into(),
            event: "LegacyEvent",
        };
        assert_eq!(err.handler(), "on_legacy");
        assert_eq!(err.as_label(), "registration_deprecated_event");
        let text = err.to_string();
        assert!(text.contains("on_legacy"));
        assert!(text.contains("LegacyEvent"));
    }

    #[test]
    fn test_handler_error_labels() {
        let failed = HandlerError::Failed {
            listener: "L@0x1".into(),
            handler: "on_ping",
            event: "Ping".into(),
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(failed.as_label(), "handler_failed");
        assert_eq!(failed.as_message(), "error: boom");
        assert!(!failed.is_panic());

        let panicked = HandlerError::Panicked {
            listener: "L@0x1".into(),
            handler: "on_ping",
            event: "Ping".into(),
            info: "oops".into(),
        };
        assert!(panicked.is_panic());
        assert!(panicked.to_string().contains("panicked on Ping: oops"));
    }
}
