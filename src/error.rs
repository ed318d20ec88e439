//! Error types used by the event bus, the highlighter and host capabilities.
//!
//! This module defines three error types:
//!
//! - [`DispatchError`]: a fan-out over event listeners failed.
//! - [`HighlightError`]: a highlight pass could not be applied.
//! - [`HostError`]: a host capability (document, renderer) rejected a call.
//!
//! The enums provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

use crate::events::{ArgShape, EventName};

/// Result type returned by event listeners.
pub type HandlerResult = anyhow::Result<()>;

/// A single listener failure inside a dispatch.
#[derive(Debug)]
pub struct HandlerFailure {
    /// Name of the listener that failed.
    pub listener: &'static str,
    /// The error (or decoded panic) returned by the listener.
    pub error: anyhow::Error,
}

/// # Errors produced while dispatching an event.
///
/// These never reach the trigger source: [`EventBus::fire`](crate::EventBus::fire)
/// logs them and surfaces a user-visible message instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// One or more listeners failed. Siblings already in flight still ran to completion.
    #[error("{} of {total} listeners failed on {event}: {}", .failures.len(), first_message(.failures))]
    HandlersFailed {
        /// Event being dispatched.
        event: EventName,
        /// Number of listeners invoked.
        total: usize,
        /// Every failure, in registration order.
        failures: Vec<HandlerFailure>,
    },

    /// The arguments do not have the shape documented for the event.
    #[error("{event} expects {expected:?} arguments, got {got:?}")]
    ArgsMismatch {
        /// Event being dispatched.
        event: EventName,
        /// Shape documented for `event`.
        expected: ArgShape,
        /// Shape actually supplied.
        got: ArgShape,
    },
}

fn first_message(failures: &[HandlerFailure]) -> String {
    failures
        .first()
        .map(|f| f.error.to_string())
        .unwrap_or_default()
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use huevisor::{ArgShape, DispatchError, EventName};
    ///
    /// let err = DispatchError::ArgsMismatch {
    ///     event: EventName::BufEnter,
    ///     expected: ArgShape::Buffer,
    ///     got: ArgShape::Empty,
    /// };
    /// assert_eq!(err.as_label(), "dispatch_args_mismatch");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::HandlersFailed { .. } => "dispatch_handlers_failed",
            DispatchError::ArgsMismatch { .. } => "dispatch_args_mismatch",
        }
    }

    /// Returns the message shown to the user, e.g. `Error on BufEnter: boom`.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::HandlersFailed {
                event, failures, ..
            } => format!("Error on {event}: {}", first_message(failures)),
            DispatchError::ArgsMismatch { event, .. } => {
                format!("Error on {event}: {self}")
            }
        }
    }

    /// Event the failed dispatch was for.
    pub fn event(&self) -> EventName {
        match self {
            DispatchError::HandlersFailed { event, .. }
            | DispatchError::ArgsMismatch { event, .. } => *event,
        }
    }
}

/// # Error reported by a host capability.
///
/// Hosts are external; the only contract is a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    /// Creates a host error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The host's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// # Errors produced by a highlight pass.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HighlightError {
    /// The highlighter was disposed and detached from its document.
    #[error("highlighter is disposed")]
    Disposed,

    /// A host call failed; `stage` names the call.
    #[error("host failed during {stage}: {source}")]
    Host {
        /// Which host call failed (`clear`, `register_styles`, `render`, `resume`).
        stage: &'static str,
        /// The host's error.
        #[source]
        source: HostError,
    },
}

impl HighlightError {
    pub(crate) fn host(stage: &'static str, source: HostError) -> Self {
        HighlightError::Host { stage, source }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use huevisor::HighlightError;
    ///
    /// assert_eq!(HighlightError::Disposed.as_label(), "highlight_disposed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HighlightError::Disposed => "highlight_disposed",
            HighlightError::Host { .. } => "highlight_host_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HighlightError::Disposed => "disposed".to_string(),
            HighlightError::Host { stage, source } => format!("{stage}: {source}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handlers_failed_message_uses_first_failure() {
        let err = DispatchError::HandlersFailed {
            event: EventName::CursorMoved,
            total: 3,
            failures: vec![
                HandlerFailure {
                    listener: "a",
                    error: anyhow::anyhow!("first"),
                },
                HandlerFailure {
                    listener: "b",
                    error: anyhow::anyhow!("second"),
                },
            ],
        };
        assert_eq!(err.as_message(), "Error on CursorMoved: first");
        assert_eq!(err.to_string(), "2 of 3 listeners failed on CursorMoved: first");
        assert_eq!(err.event(), EventName::CursorMoved);
    }

    #[test]
    fn host_error_is_the_source_of_highlight_error() {
        use std::error::Error as _;

        let err = HighlightError::host("render", HostError::new("no such buffer"));
        assert_eq!(err.as_label(), "highlight_host_failed");
        assert_eq!(err.as_message(), "render: no such buffer");
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("no such buffer")
        );
    }
}
