//! Event types produced by the input decoder.

use core::fmt;

use bitflags::bitflags;

use crate::atoms::{KeyAtom, MiscAtom, RawKind};

bitflags! {
    /// Modifiers held at the time a key, char, or mouse event was produced.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    #[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT = 0b0000_0010;
        const CTRL = 0b0000_0100;
        const ALT_GR = 0b0000_1000;
        const NONE = 0b0000_0000;
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for (flag, name) in [
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::ALT_GR, "AltGr"),
        ] {
            if self.contains(flag) {
                if wrote {
                    write!(f, "+")?;
                }
                write!(f, "{name}")?;
                wrote = true;
            }
        }
        if !wrote {
            write!(f, "None")?;
        }
        Ok(())
    }
}

/// `CSI 27;mod;cp~` / `CSI cp;mod u` modify-other-keys parameter decode:
/// `mod = 1 + Shift*1 + Alt*2 + Ctrl*4`.
#[must_use]
pub fn modifiers_from_modify_other_keys_param(param: u32) -> Modifiers {
    if param == 0 {
        return Modifiers::NONE;
    }
    let bits = param.saturating_sub(1);
    let mut m = Modifiers::NONE;
    if bits & 1 != 0 {
        m |= Modifiers::SHIFT;
    }
    if bits & 2 != 0 {
        m |= Modifiers::ALT;
    }
    if bits & 4 != 0 {
        m |= Modifiers::CTRL;
    }
    m
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseAction {
    Press,
    Release,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModeKind {
    Standard,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub button: u8,
    pub action: MouseAction,
    pub modifiers: Modifiers,
    /// Raw button/flag byte as received, before decoding `button`/`action`.
    pub raw: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeReport {
    pub mode: u32,
    pub kind: ModeKind,
    pub status: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub x: u16,
    pub y: u16,
    /// True iff the originating form was `CSI ? row;col R`.
    pub safe: bool,
}

/// Events produced by [`crate::framing::Decoder::feed`], borrowing their
/// byte payloads from the decoder's internal frame buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Event<'a> {
    Key { atom: KeyAtom, modifiers: Modifiers },
    Char { bytes: &'a [u8], modifiers: Modifiers },
    CursorPosition(CursorPosition),
    Mouse(MouseEvent),
    ModeReport(ModeReport),
    Paste { bytes: &'a [u8], initial: bool, final_: bool },
    Misc(MiscAtom),
    Raw { kind: RawKind, bytes: &'a [u8] },
    PaletteColorReport { index: i32, descriptor: &'a [u8] },
    ColorSlotReport { slot: u16, descriptor: &'a [u8] },
    Overflow,
    InvalidUtf8 { bytes: &'a [u8], alt: bool },
}

impl Event<'_> {
    #[must_use]
    pub fn to_owned(&self) -> EventOwned {
        match *self {
            Event::Key { atom, modifiers } => EventOwned::Key { atom, modifiers },
            Event::Char { bytes, modifiers } => EventOwned::Char { bytes: bytes.to_vec(), modifiers },
            Event::CursorPosition(cp) => EventOwned::CursorPosition(cp),
            Event::Mouse(m) => EventOwned::Mouse(m),
            Event::ModeReport(r) => EventOwned::ModeReport(r),
            Event::Paste { bytes, initial, final_ } => {
                EventOwned::Paste { bytes: bytes.to_vec(), initial, final_ }
            }
            Event::Misc(atom) => EventOwned::Misc(atom),
            Event::Raw { kind, bytes } => EventOwned::Raw { kind, bytes: bytes.to_vec() },
            Event::PaletteColorReport { index, descriptor } => {
                EventOwned::PaletteColorReport { index, descriptor: descriptor.to_vec() }
            }
            Event::ColorSlotReport { slot, descriptor } => {
                EventOwned::ColorSlotReport { slot, descriptor: descriptor.to_vec() }
            }
            Event::Overflow => EventOwned::Overflow,
            Event::InvalidUtf8 { bytes, alt } => EventOwned::InvalidUtf8 { bytes: bytes.to_vec(), alt },
        }
    }
}

/// Owned counterpart of [`Event`], for callers that need to hold onto an
/// event past the next `feed` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOwned {
    Key { atom: KeyAtom, modifiers: Modifiers },
    Char { bytes: Vec<u8>, modifiers: Modifiers },
    CursorPosition(CursorPosition),
    Mouse(MouseEvent),
    ModeReport(ModeReport),
    Paste { bytes: Vec<u8>, initial: bool, final_: bool },
    Misc(MiscAtom),
    Raw { kind: RawKind, bytes: Vec<u8> },
    PaletteColorReport { index: i32, descriptor: Vec<u8> },
    ColorSlotReport { slot: u16, descriptor: Vec<u8> },
    Overflow,
    InvalidUtf8 { bytes: Vec<u8>, alt: bool },
}

impl EventOwned {
    #[must_use]
    pub fn borrow(&self) -> Event<'_> {
        match self {
            EventOwned::Key { atom, modifiers } => Event::Key { atom: *atom, modifiers: *modifiers },
            EventOwned::Char { bytes, modifiers } => Event::Char { bytes, modifiers: *modifiers },
            EventOwned::CursorPosition(cp) => Event::CursorPosition(*cp),
            EventOwned::Mouse(m) => Event::Mouse(*m),
            EventOwned::ModeReport(r) => Event::ModeReport(*r),
            EventOwned::Paste { bytes, initial, final_ } => {
                Event::Paste { bytes, initial: *initial, final_: *final_ }
            }
            EventOwned::Misc(atom) => Event::Misc(*atom),
            EventOwned::Raw { kind, bytes } => Event::Raw { kind: *kind, bytes },
            EventOwned::PaletteColorReport { index, descriptor } => {
                Event::PaletteColorReport { index: *index, descriptor }
            }
            EventOwned::ColorSlotReport { slot, descriptor } => {
                Event::ColorSlotReport { slot: *slot, descriptor }
            }
            EventOwned::Overflow => Event::Overflow,
            EventOwned::InvalidUtf8 { bytes, alt } => Event::InvalidUtf8 { bytes, alt: *alt },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modify_other_keys_shift_ctrl() {
        // CSI 27;6;9~ => mod=6 => Shift(1)+Ctrl(4)+1 = 6
        assert_eq!(
            modifiers_from_modify_other_keys_param(6),
            Modifiers::SHIFT | Modifiers::CTRL
        );
    }

    #[test]
    fn modify_other_keys_none() {
        assert_eq!(modifiers_from_modify_other_keys_param(1), Modifiers::NONE);
    }

    #[test]
    fn owned_roundtrip() {
        let ev = Event::Key { atom: KeyAtom::ArrowUp, modifiers: Modifiers::NONE };
        let owned = ev.to_owned();
        assert_eq!(owned.borrow(), ev);
    }

    #[test]
    fn modifiers_display() {
        assert_eq!((Modifiers::SHIFT | Modifiers::CTRL).to_string(), "Shift+Ctrl");
        assert_eq!(Modifiers::NONE.to_string(), "None");
    }
}
