#![warn(clippy::pedantic)]

mod atoms;
mod c0;
mod char;
mod csi;
pub mod encode;
pub mod event;
pub mod framing;
mod macros;
mod mapping;
mod mouse;
mod osc_dcs;
mod ss;

pub use atoms::{KeyAtom, MiscAtom, RawKind};
pub use encode::Encode;
pub use event::{
    CursorPosition, Event, EventOwned, ModeKind, ModeReport, Modifiers, MouseAction, MouseEvent,
    modifiers_from_modify_other_keys_param,
};
pub use framing::{Decoder, LegacyMouseMode};
pub use mapping::QuirkTable;
