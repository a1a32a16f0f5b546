//! The master CSI-final-byte lookup table, and a small quirk registry for
//! terminal-specific sequences that diverge from it.
//!
//! [`classify_final`] covers the xterm-derived conventions that the large
//! majority of terminal emulators agree on. [`QuirkTable`] holds literal
//! full-frame overrides (checked first, by exact byte match) for terminals
//! that don't.

use crate::atoms::KeyAtom;
use crate::event::{Modifiers, modifiers_from_modify_other_keys_param};

/// Decode the CSI modifier parameter (xterm's `1 + Shift*1 + Alt*2 + Ctrl*4`
/// convention), shared with modifyOtherKeys.
fn modifiers_from_params(params: &[u32]) -> Modifiers {
    match params.get(1) {
        Some(&m) => modifiers_from_modify_other_keys_param(m),
        None => Modifiers::NONE,
    }
}

/// Classify an assembled CSI frame's parameters and final byte against the
/// master table. `params` excludes any private-mode marker byte.
#[must_use]
pub(crate) fn classify_final(params: &[u32], final_byte: u8) -> Option<(KeyAtom, Modifiers)> {
    let modifiers = modifiers_from_params(params);
    let atom = match final_byte {
        b'A' => KeyAtom::ArrowUp,
        b'B' => KeyAtom::ArrowDown,
        b'C' => KeyAtom::ArrowRight,
        b'D' => KeyAtom::ArrowLeft,
        b'H' => KeyAtom::Home,
        b'F' => KeyAtom::End,
        b'Z' => KeyAtom::BackTab,
        b'P' => KeyAtom::F(1),
        b'Q' => KeyAtom::F(2),
        b'R' => KeyAtom::F(3),
        b'S' => KeyAtom::F(4),
        b'~' => return classify_tilde(params.first().copied().unwrap_or(0)).map(|a| (a, modifiers)),
        _ => return None,
    };
    Some((atom, modifiers))
}

fn classify_tilde(code: u32) -> Option<KeyAtom> {
    match code {
        1 | 7 => Some(KeyAtom::Home),
        2 => Some(KeyAtom::Insert),
        3 => Some(KeyAtom::Delete),
        4 | 8 => Some(KeyAtom::End),
        5 => Some(KeyAtom::PageUp),
        6 => Some(KeyAtom::PageDown),
        11 => Some(KeyAtom::F(1)),
        12 => Some(KeyAtom::F(2)),
        13 => Some(KeyAtom::F(3)),
        14 => Some(KeyAtom::F(4)),
        15 => Some(KeyAtom::F(5)),
        17 => Some(KeyAtom::F(6)),
        18 => Some(KeyAtom::F(7)),
        19 => Some(KeyAtom::F(8)),
        20 => Some(KeyAtom::F(9)),
        21 => Some(KeyAtom::F(10)),
        23 => Some(KeyAtom::F(11)),
        24 => Some(KeyAtom::F(12)),
        _ => None,
    }
}

/// A literal full-frame override, checked before [`classify_final`].
///
/// Frame bytes include the leading `ESC` but not any trailing terminator
/// (CSI frames have none; the final byte ends the frame).
pub struct QuirkTable {
    entries: Vec<(Vec<u8>, KeyAtom, Modifiers)>,
}

impl QuirkTable {
    #[must_use]
    pub fn empty() -> Self {
        QuirkTable { entries: Vec::new() }
    }

    /// The Linux console's F1-F5 use `ESC [ [ <letter>` instead of the
    /// xterm tilde/final-byte forms.
    #[must_use]
    pub fn linux_console() -> Self {
        let mut table = Self::empty();
        for (letter, n) in [(b'A', 1u8), (b'B', 2), (b'C', 3), (b'D', 4), (b'E', 5)] {
            table.register(vec![0x1B, b'[', b'[', letter], KeyAtom::F(n), Modifiers::NONE);
        }
        table
    }

    /// `\x08`/`\x7f` remapped to `Backspace`, for terminals that send the
    /// two swapped relative to the xterm convention.
    #[must_use]
    pub fn backspace_swap() -> Self {
        let mut table = Self::empty();
        table.register(vec![0x08], KeyAtom::Backspace, Modifiers::NONE);
        table.register(vec![0x7F], KeyAtom::Backspace, Modifiers::CTRL);
        table
    }

    /// C1 control bytes (sent UTF-8 encoded as `\xC2\x80..\xC2\x9F`) standing
    /// in for Ctrl+Shift+<letter>, and `\xC2\x80` for Ctrl+Shift+Space.
    #[must_use]
    pub fn c1_for_ctrl_shift() -> Self {
        let mut table = Self::empty();
        table.register(vec![0xC2, 0x80], KeyAtom::Space, Modifiers::CTRL | Modifiers::SHIFT);
        for i in 0..26u8 {
            let cp = 0x81 + i;
            table.register(
                vec![0xC2, cp],
                KeyAtom::Char(b'A' + i),
                Modifiers::CTRL | Modifiers::SHIFT,
            );
        }
        table
    }

    /// Merge another table's entries into this one, prepending them so they
    /// take priority over entries already present. Never discards existing
    /// entries: repeated calls are additive and cumulative.
    pub fn merge(&mut self, other: QuirkTable) {
        let mut entries = other.entries;
        entries.append(&mut self.entries);
        self.entries = entries;
    }

    pub fn register(&mut self, frame: Vec<u8>, atom: KeyAtom, modifiers: Modifiers) {
        self.entries.push((frame, atom, modifiers));
    }

    #[must_use]
    pub fn lookup(&self, frame: &[u8]) -> Option<(KeyAtom, Modifiers)> {
        self.entries.iter().find(|(bytes, _, _)| bytes == frame).map(|(_, atom, m)| (*atom, *m))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for QuirkTable {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arrow_up() {
        assert_eq!(classify_final(&[], b'A'), Some((KeyAtom::ArrowUp, Modifiers::NONE)));
    }

    #[test]
    fn ctrl_arrow_up_has_modifier_param() {
        // CSI 1;5A: param 5 = Ctrl (1 + Ctrl*4)
        assert_eq!(classify_final(&[1, 5], b'A'), Some((KeyAtom::ArrowUp, Modifiers::CTRL)));
    }

    #[test]
    fn tilde_delete() {
        assert_eq!(classify_final(&[3], b'~'), Some((KeyAtom::Delete, Modifiers::NONE)));
    }

    #[test]
    fn tilde_function_key_with_modifier() {
        assert_eq!(classify_final(&[15, 2], b'~'), Some((KeyAtom::F(5), Modifiers::SHIFT)));
    }

    #[test]
    fn unknown_final_byte() {
        assert_eq!(classify_final(&[], b'x'), None);
    }

    #[test]
    fn linux_console_quirk_f1() {
        let quirks = QuirkTable::linux_console();
        assert_eq!(quirks.lookup(b"\x1B[[A"), Some((KeyAtom::F(1), Modifiers::NONE)));
        assert_eq!(quirks.lookup(b"\x1B[[Z"), None);
    }

    #[test]
    fn backspace_swap_quirk() {
        let quirks = QuirkTable::backspace_swap();
        assert_eq!(quirks.lookup(&[0x08]), Some((KeyAtom::Backspace, Modifiers::NONE)));
        assert_eq!(quirks.lookup(&[0x7F]), Some((KeyAtom::Backspace, Modifiers::CTRL)));
    }

    #[test]
    fn c1_for_ctrl_shift_quirk() {
        let quirks = QuirkTable::c1_for_ctrl_shift();
        assert_eq!(quirks.lookup(&[0xC2, 0x80]), Some((KeyAtom::Space, Modifiers::CTRL | Modifiers::SHIFT)));
        assert_eq!(quirks.lookup(&[0xC2, 0x81]), Some((KeyAtom::Char(b'A'), Modifiers::CTRL | Modifiers::SHIFT)));
        assert_eq!(quirks.lookup(&[0xC2, 0x9A]), Some((KeyAtom::Char(b'Z'), Modifiers::CTRL | Modifiers::SHIFT)));
    }

    #[test]
    fn merge_keeps_existing_entries_and_prioritizes_new_ones() {
        let mut a = QuirkTable::linux_console();
        let b = QuirkTable::backspace_swap();
        a.merge(b);
        assert_eq!(a.lookup(b"\x1B[[A"), Some((KeyAtom::F(1), Modifiers::NONE)));
        assert_eq!(a.lookup(&[0x08]), Some((KeyAtom::Backspace, Modifiers::NONE)));
    }
}
