//! Key and miscellaneous-event atoms.
//!
//! An atom names a key or event kind with a library-wide stable textual
//! form. Callers compare events by atom identity; we expose that identity
//! as a closed Rust enum instead of the C reference's interned string
//! constants, so the compiler (not string equality) enforces exhaustiveness.

/// A named key, independent of which modifiers were held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum KeyAtom {
    Escape,
    Enter,
    Tab,
    BackTab,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    F(u8),
    Space,
    /// A plain ASCII letter delivered as a named key atom rather than a
    /// `Char` event, used by quirks that remap otherwise-uninterpretable
    /// byte sequences onto modified letters (e.g. C1 bytes standing in for
    /// Ctrl+Shift+<letter> on terminals with no other way to send it).
    Char(u8),
    KeypadEnter,
    KeypadPlus,
    KeypadMinus,
    KeypadMultiply,
    KeypadDivide,
}

impl KeyAtom {
    /// The stable textual form used by the reference library's atom table.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KeyAtom::Escape => "Escape",
            KeyAtom::Enter => "Enter",
            KeyAtom::Tab => "Tab",
            KeyAtom::BackTab => "BackTab",
            KeyAtom::Backspace => "Backspace",
            KeyAtom::Insert => "Insert",
            KeyAtom::Delete => "Delete",
            KeyAtom::Home => "Home",
            KeyAtom::End => "End",
            KeyAtom::PageUp => "PageUp",
            KeyAtom::PageDown => "PageDown",
            KeyAtom::ArrowUp => "ArrowUp",
            KeyAtom::ArrowDown => "ArrowDown",
            KeyAtom::ArrowLeft => "ArrowLeft",
            KeyAtom::ArrowRight => "ArrowRight",
            KeyAtom::F(1) => "F1",
            KeyAtom::F(2) => "F2",
            KeyAtom::F(3) => "F3",
            KeyAtom::F(4) => "F4",
            KeyAtom::F(5) => "F5",
            KeyAtom::F(6) => "F6",
            KeyAtom::F(7) => "F7",
            KeyAtom::F(8) => "F8",
            KeyAtom::F(9) => "F9",
            KeyAtom::F(10) => "F10",
            KeyAtom::F(11) => "F11",
            KeyAtom::F(12) => "F12",
            KeyAtom::F(_) => "F?",
            KeyAtom::Space => "Space",
            KeyAtom::Char(b'A') => "A",
            KeyAtom::Char(b'B') => "B",
            KeyAtom::Char(b'C') => "C",
            KeyAtom::Char(b'D') => "D",
            KeyAtom::Char(b'E') => "E",
            KeyAtom::Char(b'F') => "F",
            KeyAtom::Char(b'G') => "G",
            KeyAtom::Char(b'H') => "H",
            KeyAtom::Char(b'I') => "I",
            KeyAtom::Char(b'J') => "J",
            KeyAtom::Char(b'K') => "K",
            KeyAtom::Char(b'L') => "L",
            KeyAtom::Char(b'M') => "M",
            KeyAtom::Char(b'N') => "N",
            KeyAtom::Char(b'O') => "O",
            KeyAtom::Char(b'P') => "P",
            KeyAtom::Char(b'Q') => "Q",
            KeyAtom::Char(b'R') => "R",
            KeyAtom::Char(b'S') => "S",
            KeyAtom::Char(b'T') => "T",
            KeyAtom::Char(b'U') => "U",
            KeyAtom::Char(b'V') => "V",
            KeyAtom::Char(b'W') => "W",
            KeyAtom::Char(b'X') => "X",
            KeyAtom::Char(b'Y') => "Y",
            KeyAtom::Char(b'Z') => "Z",
            KeyAtom::Char(_) => "?",
            KeyAtom::KeypadEnter => "KeypadEnter",
            KeyAtom::KeypadPlus => "KeypadPlus",
            KeyAtom::KeypadMinus => "KeypadMinus",
            KeyAtom::KeypadMultiply => "KeypadMultiply",
            KeyAtom::KeypadDivide => "KeypadDivide",
        }
    }
}

/// Non-key events carried by the `MISC` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MiscAtom {
    FocusIn,
    FocusOut,
    PasteBegin,
    PasteEnd,
    /// The decoder requested a device-status reply to re-establish framing
    /// after overflow or an ambiguous prefix.
    IResync,
}

impl MiscAtom {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MiscAtom::FocusIn => "focus-in",
            MiscAtom::FocusOut => "focus-out",
            MiscAtom::PasteBegin => "paste-begin",
            MiscAtom::PasteEnd => "paste-end",
            MiscAtom::IResync => "i_resync",
        }
    }
}

/// Which structurally-complete-but-unrecognized device reply a `RAW_*`
/// event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawKind {
    PrimaryDeviceAttributes,
    SecondaryDeviceAttributes,
    TertiaryDeviceAttributes,
    DecReqTParm,
    TerminfoQueryReply,
    TerminalNameDcs,
}
