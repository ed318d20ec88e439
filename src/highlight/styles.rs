//! # Shared registry of host display styles.
//!
//! Registering a style on the host is idempotent but costs a command
//! round-trip, and styles are global to the host. [`StyleRegistry`] remembers
//! which quantized colors already have a `BG<hex>` style so every
//! [`Highlighter`](crate::Highlighter) in the process registers each color once.
//!
//! ## Rules
//! - The set only grows: a registered style is never forgotten (except by [`StyleRegistry::reset`]).
//! - A color is marked registered only after the host accepted the command.
//! - Inject one `Arc<StyleRegistry>` into every highlighter talking to the same host.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::color::Rgb8;

/// Name of the display style for `color`, e.g. `BG1e90ff`.
pub fn style_name(color: Rgb8) -> String {
    format!("BG{}", color.hex())
}

/// Host command defining the style for `color`.
///
/// ```rust
/// use huevisor::{Rgb8, highlight::style_command};
///
/// assert_eq!(
///     style_command(Rgb8::new(0, 0, 128)),
///     "hi BG000080 guibg=#000080 guifg=#ffffff"
/// );
/// ```
pub fn style_command(color: Rgb8) -> String {
    let hex = color.hex();
    format!("hi BG{hex} guibg=#{hex} guifg=#{}", color.foreground().hex())
}

/// Joins the commands for `colors` into one host command line.
pub fn batch_command(colors: &[Rgb8]) -> String {
    colors
        .iter()
        .map(|c| style_command(*c))
        .collect::<Vec<_>>()
        .join("|")
}

/// Process-wide set of colors whose style is registered on the host.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    registered: Mutex<HashSet<Rgb8>>,
}

impl StyleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the colors in `colors` that still need a style, deduplicated, in input order.
    pub fn unregistered<I>(&self, colors: I) -> Vec<Rgb8>
    where
        I: IntoIterator<Item = Rgb8>,
    {
        let registered = self.registered.lock();
        let mut out: Vec<Rgb8> = Vec::new();
        for color in colors {
            if !registered.contains(&color) && !out.contains(&color) {
                out.push(color);
            }
        }
        out
    }

    /// Records that the host now has styles for `colors`.
    pub fn mark_registered(&self, colors: &[Rgb8]) {
        self.registered.lock().extend(colors.iter().copied());
    }

    /// True if a style for `color` was registered.
    pub fn contains(&self, color: Rgb8) -> bool {
        self.registered.lock().contains(&color)
    }

    /// Number of registered styles.
    pub fn len(&self) -> usize {
        self.registered.lock().len()
    }

    /// True if no style was registered yet.
    pub fn is_empty(&self) -> bool {
        self.registered.lock().is_empty()
    }

    /// Forgets every registration. Only for a host that dropped its styles (or tests).
    pub fn reset(&self) {
        self.registered.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_dedups_and_skips_known_colors() {
        let reg = StyleRegistry::new();
        let red = Rgb8::new(255, 0, 0);
        let blue = Rgb8::new(0, 0, 255);

        assert_eq!(reg.unregistered([red, red, blue]), vec![red, blue]);
        reg.mark_registered(&[red]);
        assert_eq!(reg.unregistered([red, blue, red]), vec![blue]);
        reg.mark_registered(&[blue, blue]);
        assert!(reg.unregistered([red, blue]).is_empty());
        assert_eq!(reg.len(), 2);

        reg.reset();
        assert!(reg.is_empty());
        assert!(!reg.contains(red));
    }

    #[test]
    fn batch_command_joins_with_bar() {
        let cmd = batch_command(&[Rgb8::new(255, 255, 0), Rgb8::new(0, 0, 0)]);
        assert_eq!(
            cmd,
            "hi BGffff00 guibg=#ffff00 guifg=#000000|hi BG000000 guibg=#000000 guifg=#ffffff"
        );
        assert_eq!(style_name(Rgb8::new(30, 144, 255)), "BG1e90ff");
    }
}
