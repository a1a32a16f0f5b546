//! Classification of the SS3 (`ESC O <byte>`) second byte.
//!
//! Application-mode cursor keys, Home/End, F1-F4 and the keypad all arrive
//! this way on terminals that put the keypad into application mode.

use crate::atoms::KeyAtom;
use crate::event::{Event, Modifiers};

#[must_use]
pub(crate) fn classify(byte: u8) -> Option<Event<'static>> {
    let key = |atom| Some(Event::Key { atom, modifiers: Modifiers::NONE });
    match byte {
        b'A' => key(KeyAtom::ArrowUp),
        b'B' => key(KeyAtom::ArrowDown),
        b'C' => key(KeyAtom::ArrowRight),
        b'D' => key(KeyAtom::ArrowLeft),
        b'H' => key(KeyAtom::Home),
        b'F' => key(KeyAtom::End),
        b'P' => key(KeyAtom::F(1)),
        b'Q' => key(KeyAtom::F(2)),
        b'R' => key(KeyAtom::F(3)),
        b'S' => key(KeyAtom::F(4)),
        b'M' => key(KeyAtom::KeypadEnter),
        b'X' => Some(Event::Char { bytes: b"=", modifiers: Modifiers::NONE }),
        b'j' => Some(Event::Char { bytes: b"*", modifiers: Modifiers::NONE }),
        b'k' => Some(Event::Char { bytes: b"+", modifiers: Modifiers::NONE }),
        b'l' => Some(Event::Char { bytes: b",", modifiers: Modifiers::NONE }),
        b'm' => Some(Event::Char { bytes: b"-", modifiers: Modifiers::NONE }),
        b'n' => Some(Event::Char { bytes: b".", modifiers: Modifiers::NONE }),
        b'o' => Some(Event::Char { bytes: b"/", modifiers: Modifiers::NONE }),
        b'p' => Some(Event::Char { bytes: b"0", modifiers: Modifiers::NONE }),
        b'q' => Some(Event::Char { bytes: b"1", modifiers: Modifiers::NONE }),
        b'r' => Some(Event::Char { bytes: b"2", modifiers: Modifiers::NONE }),
        b's' => Some(Event::Char { bytes: b"3", modifiers: Modifiers::NONE }),
        b't' => Some(Event::Char { bytes: b"4", modifiers: Modifiers::NONE }),
        b'u' => Some(Event::Char { bytes: b"5", modifiers: Modifiers::NONE }),
        b'v' => Some(Event::Char { bytes: b"6", modifiers: Modifiers::NONE }),
        b'w' => Some(Event::Char { bytes: b"7", modifiers: Modifiers::NONE }),
        b'x' => Some(Event::Char { bytes: b"8", modifiers: Modifiers::NONE }),
        b'y' => Some(Event::Char { bytes: b"9", modifiers: Modifiers::NONE }),
        _ => None,
    }
}
