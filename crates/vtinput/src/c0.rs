//! Classification of single C0 control bytes (0x00-0x1F, 0x7F) that reach
//! `base` state as a complete one-byte frame.
//!
//! ESC (0x1B) is excluded: it never completes as a frame here, since it
//! always starts the double-ESC lookahead in [`crate::framing`].

use crate::atoms::KeyAtom;
use crate::event::{Event, Modifiers};

const LOWER_LETTERS: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";
const CTRL_PUNCTUATION: &[u8; 4] = b"4567"; // Ctrl+\, Ctrl+], Ctrl+^, Ctrl+_

/// Classify a C0 byte other than ESC. Returns `None` for bytes this
/// decoder has no mapping for (there currently are none in 0x00-0x1F, 0x7F,
/// but the match stays exhaustive-by-range rather than asserting that).
#[must_use]
pub(crate) fn classify(byte: u8) -> Option<Event<'static>> {
    match byte {
        0x09 => Some(Event::Key { atom: KeyAtom::Tab, modifiers: Modifiers::NONE }),
        0x0D => Some(Event::Key { atom: KeyAtom::Enter, modifiers: Modifiers::NONE }),
        0x7F => Some(Event::Key { atom: KeyAtom::Backspace, modifiers: Modifiers::NONE }),
        0x00 => Some(Event::Key { atom: KeyAtom::Space, modifiers: Modifiers::CTRL }),
        0x01..=0x1A => {
            let idx = (byte - 0x01) as usize;
            Some(Event::Char { bytes: &LOWER_LETTERS[idx..=idx], modifiers: Modifiers::CTRL })
        }
        0x1C..=0x1F => {
            let idx = (byte - 0x1C) as usize;
            Some(Event::Char { bytes: &CTRL_PUNCTUATION[idx..=idx], modifiers: Modifiers::CTRL })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_is_key_atom() {
        assert_eq!(classify(0x09), Some(Event::Key { atom: KeyAtom::Tab, modifiers: Modifiers::NONE }));
    }

    #[test]
    fn ctrl_a() {
        assert_eq!(classify(0x01), Some(Event::Char { bytes: b"a", modifiers: Modifiers::CTRL }));
    }

    #[test]
    fn ctrl_j_is_linefeed() {
        assert_eq!(classify(0x0A), Some(Event::Char { bytes: b"j", modifiers: Modifiers::CTRL }));
    }

    #[test]
    fn ctrl_z() {
        assert_eq!(classify(0x1A), Some(Event::Char { bytes: b"z", modifiers: Modifiers::CTRL }));
    }

    #[test]
    fn ctrl_space_is_zero_byte() {
        assert_eq!(classify(0x00), Some(Event::Key { atom: KeyAtom::Space, modifiers: Modifiers::CTRL }));
    }

    #[test]
    fn backspace() {
        assert_eq!(classify(0x7F), Some(Event::Key { atom: KeyAtom::Backspace, modifiers: Modifiers::NONE }));
    }
}
