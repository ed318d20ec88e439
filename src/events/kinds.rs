//! # Typed event markers.
//!
//! Every [`EventName`] has a zero-sized marker type here implementing
//! [`EditorEvent`]. The trait maps the tag to the Rust type of its arguments,
//! so `bus.on::<kinds::FileType>(..)` receives `(String, BufNr)` and
//! `bus.emit::<kinds::BufEnter>(..)` only accepts a [`BufNr`].
//!
//! ## Example
//! ```rust
//! use huevisor::events::{EditorEvent, EventArgs, kinds};
//!
//! let args = kinds::BufWinEnter::pack((4, 1001));
//! assert_eq!(args, EventArgs::Window { bufnr: 4, winid: 1001 });
//! assert_eq!(kinds::BufWinEnter::unpack(&args), Some((4, 1001)));
//! assert_eq!(kinds::BufEnter::unpack(&args), None);
//! ```

use std::path::PathBuf;

use super::event::{BufNr, CompleteItem, EventArgs, EventName, OptionValue, WinId};

/// An event tag with a statically known argument type.
pub trait EditorEvent: Send + Sync + 'static {
    /// Name this marker stands for.
    const NAME: EventName;

    /// Arguments handed to typed listeners.
    type Args: Clone + Send + Sync + 'static;

    /// Wraps typed arguments into the untyped payload.
    fn pack(args: Self::Args) -> EventArgs;

    /// Extracts typed arguments; `None` if the payload has another shape.
    fn unpack(args: &EventArgs) -> Option<Self::Args>;
}

macro_rules! editor_events {
    (
        args: $args:ty,
        pack: |$p:pat_param| $pack:expr,
        unpack: $pat:pat => $unpack:expr,
        events: [$($event:ident),+ $(,)?] $(,)?
    ) => {
        $(
            #[doc = concat!("Marker for `", stringify!($event), "`.")]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $event;

            impl EditorEvent for $event {
                const NAME: EventName = EventName::$event;
                type Args = $args;

                fn pack($p: $args) -> EventArgs {
                    $pack
                }

                fn unpack(args: &EventArgs) -> Option<$args> {
                    match args {
                        $pat => Some($unpack),
                        _ => None,
                    }
                }
            }
        )+
    };
}

editor_events! {
    args: BufNr,
    pack: |bufnr| EventArgs::Buffer { bufnr },
    unpack: EventArgs::Buffer { bufnr } => *bufnr,
    events: [
        BufCreate, BufEnter, BufHidden, BufUnload, BufWritePre, BufWritePost,
        TextChanged, TextChangedI, TextChangedP, CursorMoved, CursorHold, CursorHoldI,
    ],
}

editor_events! {
    args: (),
    pack: |()| EventArgs::Empty,
    unpack: EventArgs::Empty => (),
    events: [InsertEnter, InsertLeave, CursorMovedI],
}

editor_events! {
    args: CompleteItem,
    pack: |item| EventArgs::Completion { item },
    unpack: EventArgs::Completion { item } => item.clone(),
    events: [CompleteDone],
}

editor_events! {
    args: String,
    pack: |character| EventArgs::Character { character },
    unpack: EventArgs::Character { character } => character.clone(),
    events: [InsertCharPre],
}

editor_events! {
    args: (String, BufNr),
    pack: |(filetype, bufnr)| EventArgs::FileType { filetype, bufnr },
    unpack: EventArgs::FileType { filetype, bufnr } => (filetype.clone(), *bufnr),
    events: [FileType],
}

editor_events! {
    args: (BufNr, WinId),
    pack: |(bufnr, winid)| EventArgs::Window { bufnr, winid },
    unpack: EventArgs::Window { bufnr, winid } => (*bufnr, *winid),
    events: [BufWinEnter, BufWinLeave],
}

editor_events! {
    args: PathBuf,
    pack: |cwd| EventArgs::Directory { cwd },
    unpack: EventArgs::Directory { cwd } => cwd.clone(),
    events: [DirChanged],
}

editor_events! {
    args: (String, OptionValue, OptionValue),
    pack: |(option, old, new)| EventArgs::OptionChange { option, old, new },
    unpack: EventArgs::OptionChange { option, old, new } => (option.clone(), old.clone(), new.clone()),
    events: [OptionSet, GlobalChange],
}

editor_events! {
    args: String,
    pack: |name| EventArgs::Command { name },
    unpack: EventArgs::Command { name } => name.clone(),
    events: [Command],
}

editor_events! {
    args: (String, String),
    pack: |(scheme, fullpath)| EventArgs::ReadCmd { scheme, fullpath },
    unpack: EventArgs::ReadCmd { scheme, fullpath } => (scheme.clone(), fullpath.clone()),
    events: [BufReadCmd],
}
