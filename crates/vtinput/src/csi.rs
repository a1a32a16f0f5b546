//! Classification of an assembled CSI frame: `CSI [marker] params [intermediates] final`.
//!
//! [`crate::framing`] has already split the frame into a private-marker byte
//! (`?`, `<`, `>`, `=`, if any), the semicolon-separated numeric parameters,
//! any intermediate bytes, and the final byte. This module only interprets
//! that already-tokenized shape; it has no byte-stream state of its own.

use crate::atoms::{KeyAtom, MiscAtom, RawKind};
use crate::event::{CursorPosition, Event, ModeKind, ModeReport, Modifiers, modifiers_from_modify_other_keys_param};
use crate::mapping;
use crate::mouse;

/// A classified CSI frame. `Codepoint` defers UTF-8 encoding to the caller,
/// which holds the scratch buffer events can borrow from (modifyOtherKeys
/// reports a decimal codepoint, not literal UTF-8 bytes in the frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classified {
    Event(EventShape),
    Codepoint(u32, Modifiers),
    None,
}

/// Events a CSI frame can produce, all free of borrowed payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventShape {
    Key(KeyAtom, Modifiers),
    CursorPosition(CursorPosition),
    Mouse(crate::event::MouseEvent),
    ModeReport(ModeReport),
    Misc(MiscAtom),
    RawEmpty(RawKind),
}

pub(crate) fn classify(marker: Option<u8>, params: &[u32], intermediates: &[u8], final_byte: u8) -> Classified {
    if let Some(outcome) = classify_mouse(marker, params, final_byte) {
        return outcome;
    }
    if let Some(outcome) = classify_modify_other_keys(marker, params, final_byte) {
        return outcome;
    }
    if let Some(outcome) = classify_cursor_position(marker, params, final_byte) {
        return outcome;
    }
    if marker.is_none() && params.is_empty() {
        match final_byte {
            b'I' => return Classified::Event(EventShape::Misc(MiscAtom::FocusIn)),
            b'O' => return Classified::Event(EventShape::Misc(MiscAtom::FocusOut)),
            _ => {}
        }
    }
    if marker.is_none() && final_byte == b'~' {
        match params.first() {
            Some(&200) => return Classified::Event(EventShape::Misc(MiscAtom::PasteBegin)),
            Some(&201) => return Classified::Event(EventShape::Misc(MiscAtom::PasteEnd)),
            _ => {}
        }
    }
    if intermediates == [b'$'] && final_byte == b'y' {
        if let (Some(&mode), Some(&status)) = (params.first(), params.get(1)) {
            let kind = if marker == Some(b'?') { ModeKind::Private } else { ModeKind::Standard };
            return Classified::Event(EventShape::ModeReport(ModeReport { mode, kind, status: status as u8 }));
        }
    }
    if final_byte == b'c' {
        return match marker {
            Some(b'?') => Classified::Event(EventShape::RawEmpty(RawKind::PrimaryDeviceAttributes)),
            Some(b'>') => Classified::Event(EventShape::RawEmpty(RawKind::SecondaryDeviceAttributes)),
            _ => Classified::None,
        };
    }
    if final_byte == b'x' && marker.is_none() {
        return Classified::Event(EventShape::RawEmpty(RawKind::DecReqTParm));
    }
    if marker.is_none() {
        if let Some((atom, modifiers)) = mapping::classify_final(params, final_byte) {
            return Classified::Event(EventShape::Key(atom, modifiers));
        }
    }
    Classified::None
}

fn classify_mouse(marker: Option<u8>, params: &[u32], final_byte: u8) -> Option<Classified> {
    if marker == Some(b'<') && (final_byte == b'M' || final_byte == b'm') {
        let cb = *params.first()?;
        let x = *params.get(1)?;
        let y = *params.get(2)?;
        return Some(Classified::Event(EventShape::Mouse(mouse::decode_sgr(cb, x, y, final_byte))));
    }
    if marker.is_none() && final_byte == b'M' && params.len() == 3 {
        return Some(Classified::Event(EventShape::Mouse(mouse::decode_urxvt(params[0], params[1], params[2]))));
    }
    None
}

fn classify_modify_other_keys(marker: Option<u8>, params: &[u32], final_byte: u8) -> Option<Classified> {
    if marker.is_some() {
        return None;
    }
    if final_byte == b'~' && params.first() == Some(&27) {
        let modifiers = modifiers_from_modify_other_keys_param(*params.get(1).unwrap_or(&1));
        let cp = *params.get(2)?;
        return Some(Classified::Codepoint(cp, modifiers));
    }
    if final_byte == b'u' && !params.is_empty() {
        let cp = params[0];
        let modifiers = modifiers_from_modify_other_keys_param(*params.get(1).unwrap_or(&1));
        return Some(Classified::Codepoint(cp, modifiers));
    }
    None
}

fn classify_cursor_position(marker: Option<u8>, params: &[u32], final_byte: u8) -> Option<Classified> {
    if final_byte != b'R' {
        return None;
    }
    let row = *params.first()?;
    let col = *params.get(1)?;
    let safe = marker == Some(b'?');
    Some(Classified::Event(EventShape::CursorPosition(CursorPosition {
        x: col.saturating_sub(1) as u16,
        y: row.saturating_sub(1) as u16,
        safe,
    })))
}

impl EventShape {
    /// `frame` is the complete CSI frame (leading `ESC [`, marker, params,
    /// intermediates and final byte) backing any `RawEmpty` variant; other
    /// variants ignore it.
    #[must_use]
    pub(crate) fn into_event<'a>(self, frame: &'a [u8]) -> Event<'a> {
        match self {
            EventShape::Key(atom, modifiers) => Event::Key { atom, modifiers },
            EventShape::CursorPosition(cp) => Event::CursorPosition(cp),
            EventShape::Mouse(m) => Event::Mouse(m),
            EventShape::ModeReport(r) => Event::ModeReport(r),
            EventShape::Misc(atom) => Event::Misc(atom),
            EventShape::RawEmpty(kind) => Event::Raw { kind, bytes: frame },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arrow_key() {
        assert_eq!(classify(None, &[], &[], b'A'), Classified::Event(EventShape::Key(KeyAtom::ArrowUp, Modifiers::NONE)));
    }

    #[test]
    fn sgr_mouse_press() {
        let outcome = classify(Some(b'<'), &[0, 5, 3], &[], b'M');
        assert_eq!(
            outcome,
            Classified::Event(EventShape::Mouse(mouse::decode_sgr(0, 5, 3, b'M')))
        );
        let Classified::Event(EventShape::Mouse(m)) = outcome else { panic!("expected mouse event") };
        assert_eq!((m.x, m.y, m.button), (4, 2, 0));
    }

    #[test]
    fn modify_other_keys_tilde_form() {
        // CSI 27;6;9~ : Shift+Ctrl 'i' codepoint 9 (Tab)
        assert_eq!(classify(None, &[27, 6, 9], &[], b'~'), Classified::Codepoint(9, Modifiers::SHIFT | Modifiers::CTRL));
    }

    #[test]
    fn cursor_position_report() {
        assert_eq!(
            classify(None, &[10, 5], &[], b'R'),
            Classified::Event(EventShape::CursorPosition(CursorPosition { x: 4, y: 9, safe: false }))
        );
    }

    #[test]
    fn safe_cursor_position_report() {
        assert_eq!(
            classify(Some(b'?'), &[1, 1], &[], b'R'),
            Classified::Event(EventShape::CursorPosition(CursorPosition { x: 0, y: 0, safe: true }))
        );
    }

    #[test]
    fn focus_in_and_out() {
        assert_eq!(classify(None, &[], &[], b'I'), Classified::Event(EventShape::Misc(MiscAtom::FocusIn)));
        assert_eq!(classify(None, &[], &[], b'O'), Classified::Event(EventShape::Misc(MiscAtom::FocusOut)));
    }

    #[test]
    fn bracketed_paste_markers() {
        assert_eq!(classify(None, &[200], &[], b'~'), Classified::Event(EventShape::Misc(MiscAtom::PasteBegin)));
        assert_eq!(classify(None, &[201], &[], b'~'), Classified::Event(EventShape::Misc(MiscAtom::PasteEnd)));
    }

    #[test]
    fn private_mode_report() {
        assert_eq!(
            classify(Some(b'?'), &[2004, 1], &[b'$'], b'y'),
            Classified::Event(EventShape::ModeReport(ModeReport { mode: 2004, kind: ModeKind::Private, status: 1 }))
        );
    }

    #[test]
    fn primary_device_attributes() {
        assert_eq!(
            classify(Some(b'?'), &[], &[], b'c'),
            Classified::Event(EventShape::RawEmpty(RawKind::PrimaryDeviceAttributes))
        );
    }

    #[test]
    fn urxvt_mouse_has_no_marker_and_three_params() {
        assert_eq!(
            classify(None, &[32, 1, 1], &[], b'M'),
            Classified::Event(EventShape::Mouse(mouse::decode_urxvt(32, 1, 1)))
        );
    }

    #[test]
    fn unrecognized_frame_is_none() {
        assert_eq!(classify(None, &[], &[], b'z'), Classified::None);
    }
}
