//! # Editor events and their argument shapes.
//!
//! The [`EventName`] enum is the closed set of editor notifications the bus
//! understands. Every name has exactly one documented argument shape
//! ([`ArgShape`]); the payload travels as an [`EventArgs`] variant of that shape.
//!
//! | Shape          | Events                                                                 |
//! |----------------|------------------------------------------------------------------------|
//! | `Buffer`       | `BufCreate` `BufEnter` `BufHidden` `BufUnload` `BufWritePre` `BufWritePost` `CursorHold` `CursorHoldI` `CursorMoved` `TextChanged` `TextChangedI` `TextChangedP` |
//! | `Empty`        | `InsertEnter` `InsertLeave` `CursorMovedI`                             |
//! | `Completion`   | `CompleteDone`                                                         |
//! | `Character`    | `InsertCharPre`                                                        |
//! | `FileType`     | `FileType`                                                             |
//! | `Window`       | `BufWinEnter` `BufWinLeave`                                            |
//! | `Directory`    | `DirChanged`                                                           |
//! | `OptionChange` | `OptionSet` `GlobalChange`                                             |
//! | `Command`      | `Command`                                                              |
//! | `ReadCmd`      | `BufReadCmd`                                                           |
//!
//! ## Ordering
//! Each [`Event`] gets a process-wide monotonic sequence number (`seq`), used to
//! correlate log lines of one dispatch.
//!
//! ## Example
//! ```rust
//! use huevisor::{ArgShape, Event, EventArgs, EventName};
//!
//! let ev = Event::new(EventName::FileType, EventArgs::FileType {
//!     filetype: "css".into(),
//!     bufnr: 3,
//! });
//! assert_eq!(ev.name.shape(), ArgShape::FileType);
//! assert_eq!(ev.args.bufnr(), Some(3));
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Buffer number as reported by the editor.
pub type BufNr = i64;

/// Window id as reported by the editor.
pub type WinId = i64;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Editor lifecycle notifications recognized by the bus.
///
/// The string form (`Display` / `FromStr`) is the editor's own autocmd name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum EventName {
    // === Buffer lifecycle ===
    BufCreate,
    BufEnter,
    BufHidden,
    BufUnload,
    BufWritePre,
    BufWritePost,
    BufReadCmd,

    // === Text and cursor ===
    TextChanged,
    TextChangedI,
    TextChangedP,
    CursorMoved,
    CursorMovedI,
    CursorHold,
    CursorHoldI,

    // === Insert mode ===
    InsertEnter,
    InsertLeave,
    InsertCharPre,

    // === Completion ===
    CompleteDone,

    // === Windows ===
    BufWinEnter,
    BufWinLeave,

    // === Environment ===
    FileType,
    DirChanged,
    OptionSet,
    GlobalChange,
    Command,
}

impl EventName {
    /// Argument shape every dispatch of this event carries.
    pub fn shape(self) -> ArgShape {
        use EventName::*;
        match self {
            BufCreate | BufEnter | BufHidden | BufUnload | BufWritePre | BufWritePost
            | TextChanged | TextChangedI | TextChangedP | CursorMoved | CursorHold
            | CursorHoldI => ArgShape::Buffer,
            InsertEnter | InsertLeave | CursorMovedI => ArgShape::Empty,
            CompleteDone => ArgShape::Completion,
            InsertCharPre => ArgShape::Character,
            FileType => ArgShape::FileType,
            BufWinEnter | BufWinLeave => ArgShape::Window,
            DirChanged => ArgShape::Directory,
            OptionSet | GlobalChange => ArgShape::OptionChange,
            Command => ArgShape::Command,
            BufReadCmd => ArgShape::ReadCmd,
        }
    }

    /// Stable name, e.g. `"BufEnter"`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Classification of argument payloads, one per [`EventArgs`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgShape {
    Empty,
    Buffer,
    Completion,
    Character,
    FileType,
    Window,
    Directory,
    OptionChange,
    Command,
    ReadCmd,
}

/// Value of an editor option or global variable.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Str(String),
    Number(i64),
    Bool(bool),
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Number(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

/// Completion item reported with `CompleteDone`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompleteItem {
    pub word: String,
    pub abbr: Option<String>,
    pub menu: Option<String>,
    pub info: Option<String>,
    pub kind: Option<String>,
    pub user_data: Option<String>,
}

/// Positional arguments of one event, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EventArgs {
    Empty,
    Buffer {
        bufnr: BufNr,
    },
    Completion {
        item: CompleteItem,
    },
    Character {
        character: String,
    },
    FileType {
        filetype: String,
        bufnr: BufNr,
    },
    Window {
        bufnr: BufNr,
        winid: WinId,
    },
    Directory {
        cwd: PathBuf,
    },
    OptionChange {
        option: String,
        old: OptionValue,
        new: OptionValue,
    },
    Command {
        name: String,
    },
    ReadCmd {
        scheme: String,
        fullpath: String,
    },
}

impl EventArgs {
    /// Shape of this payload.
    pub fn shape(&self) -> ArgShape {
        match self {
            EventArgs::Empty => ArgShape::Empty,
            EventArgs::Buffer { .. } => ArgShape::Buffer,
            EventArgs::Completion { .. } => ArgShape::Completion,
            EventArgs::Character { .. } => ArgShape::Character,
            EventArgs::FileType { .. } => ArgShape::FileType,
            EventArgs::Window { .. } => ArgShape::Window,
            EventArgs::Directory { .. } => ArgShape::Directory,
            EventArgs::OptionChange { .. } => ArgShape::OptionChange,
            EventArgs::Command { .. } => ArgShape::Command,
            EventArgs::ReadCmd { .. } => ArgShape::ReadCmd,
        }
    }

    /// Buffer number carried by the payload, if any.
    pub fn bufnr(&self) -> Option<BufNr> {
        match self {
            EventArgs::Buffer { bufnr }
            | EventArgs::FileType { bufnr, .. }
            | EventArgs::Window { bufnr, .. } => Some(*bufnr),
            _ => None,
        }
    }
}

/// One dispatch: the event name, its arguments and a sequence number.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Which event fired.
    pub name: EventName,
    /// Positional arguments.
    pub args: EventArgs,
}

impl Event {
    /// Creates an event with the next sequence number.
    pub fn new(name: EventName, args: EventArgs) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            name,
            args,
        }
    }

    /// True if the payload has the shape documented for the name.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.name.shape() == self.args.shape()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn names_round_trip_through_strings() {
        for name in EventName::iter() {
            assert_eq!(EventName::from_str(name.as_str()).ok(), Some(name));
            assert_eq!(name.to_string(), name.as_str());
        }
        assert!(EventName::from_str("BufDelete").is_err());
    }

    #[test]
    fn closed_set_has_every_editor_event() {
        assert_eq!(EventName::iter().count(), 25);
        let buffer = EventName::iter()
            .filter(|n| n.shape() == ArgShape::Buffer)
            .count();
        assert_eq!(buffer, 12);
    }

    #[test]
    fn shape_mismatch_is_detected() {
        let ok = Event::new(EventName::BufEnter, EventArgs::Buffer { bufnr: 1 });
        let bad = Event::new(EventName::BufEnter, EventArgs::Empty);
        assert!(ok.is_well_formed());
        assert!(!bad.is_well_formed());
        assert!(bad.seq > ok.seq);
    }
}
