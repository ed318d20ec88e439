//! # User-visible messages
//!
//! The bus reports failed dispatches to the user through a [`Messenger`]. The
//! host plugin supplies the real implementation (an echo line, a popup); this
//! module ships [`LogMessenger`], which only writes to `tracing`.
//!
//! ## Example output
//! ```text
//! ERROR huevisor::listeners::messenger: message text="Error on BufEnter: boom"
//! WARN  huevisor::listeners::messenger: message text="..."
//! ```

/// Severity of a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Error,
    Warning,
    Info,
}

/// Capability to show a message to the user.
pub trait Messenger: Send + Sync + 'static {
    /// Shows `text` with the given severity. Must not block.
    fn show_message(&self, text: &str, level: MessageLevel);
}

/// Messenger that forwards messages to `tracing`.
#[derive(Debug, Default)]
pub struct LogMessenger;

impl LogMessenger {
    /// Construct a new [`LogMessenger`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Messenger for LogMessenger {
    fn show_message(&self, text: &str, level: MessageLevel) {
        match level {
            MessageLevel::Error => tracing::error!(text, "message"),
            MessageLevel::Warning => tracing::warn!(text, "message"),
            MessageLevel::Info => tracing::info!(text, "message"),
        }
    }
}
