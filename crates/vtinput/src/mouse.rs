//! Mouse reporting decode: legacy (`CSI M Cb Cx Cy`), SGR (`CSI < Cb;Cx;Cy M/m`)
//! and urxvt (`CSI Cb;Cx;Cy M`) encodings.
//!
//! All three share the same button/modifier bit layout in `Cb`: bits 0-1
//! are the base button number, bit 2 shift, bit 3 alt, bit 4 ctrl, bit 5
//! motion, bit 6 wheel.

use crate::event::{Modifiers, MouseAction, MouseEvent};

struct Decoded {
    button: u8,
    modifiers: Modifiers,
    motion: bool,
    base: u32,
}

fn decode_cb(cb: u32) -> Decoded {
    let base = cb & 0x3;
    let mut modifiers = Modifiers::NONE;
    if cb & 0x04 != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if cb & 0x08 != 0 {
        modifiers |= Modifiers::ALT;
    }
    if cb & 0x10 != 0 {
        modifiers |= Modifiers::CTRL;
    }
    let motion = cb & 0x20 != 0;
    let mut button = base as u8;
    if cb & 0x40 != 0 {
        button |= 4;
    }
    if cb & 0x80 != 0 {
        button |= 8;
    }
    Decoded { button, modifiers, motion, base }
}

/// Decode a legacy-protocol mouse frame: the three bytes following `CSI M`.
/// `Cb` is biased by `' '` (32); `Cx`/`Cy` are biased by `'!'` (33), one more
/// than `Cb` because they are already 1-based column/row numbers.
#[must_use]
pub(crate) fn decode_legacy(cb_byte: u8, cx_byte: u8, cy_byte: u8) -> MouseEvent {
    let cb = u32::from(cb_byte.wrapping_sub(32));
    let decoded = decode_cb(cb);
    let action = if decoded.base == 3 {
        MouseAction::Release
    } else if decoded.motion {
        MouseAction::Move
    } else {
        MouseAction::Press
    };
    MouseEvent {
        x: u16::from(cx_byte.wrapping_sub(33)),
        y: u16::from(cy_byte.wrapping_sub(33)),
        button: decoded.button,
        action,
        modifiers: decoded.modifiers,
        raw: cb as u8,
    }
}

/// Decode a urxvt-protocol mouse frame (`CSI Cb;Cx;Cy M`, decimal params,
/// same bias on `Cb` as legacy; `Cx`/`Cy` are 1-based decimal, so `- 1`).
#[must_use]
pub(crate) fn decode_urxvt(cb_param: u32, x: u32, y: u32) -> MouseEvent {
    let cb = cb_param.wrapping_sub(32);
    let decoded = decode_cb(cb);
    let action = if decoded.base == 3 {
        MouseAction::Release
    } else if decoded.motion {
        MouseAction::Move
    } else {
        MouseAction::Press
    };
    MouseEvent {
        x: x.wrapping_sub(1) as u16,
        y: y.wrapping_sub(1) as u16,
        button: decoded.button,
        action,
        modifiers: decoded.modifiers,
        raw: cb as u8,
    }
}

/// Decode an SGR-protocol mouse frame (`CSI < Cb;Cx;Cy M` or `...m`). The
/// terminator byte (`M` press, `m` release) carries press/release instead
/// of `Cb`'s base-button field, and `Cb` carries no bias at all. `Cx`/`Cy`
/// are 1-based decimal, so `- 1`.
#[must_use]
pub(crate) fn decode_sgr(cb: u32, x: u32, y: u32, terminator: u8) -> MouseEvent {
    let decoded = decode_cb(cb);
    let action = if terminator == b'm' {
        MouseAction::Release
    } else if decoded.motion {
        MouseAction::Move
    } else {
        MouseAction::Press
    };
    MouseEvent {
        x: x.wrapping_sub(1) as u16,
        y: y.wrapping_sub(1) as u16,
        button: decoded.button,
        action,
        modifiers: decoded.modifiers,
        raw: cb as u8,
    }
}

/// Decode a legacy-protocol mouse frame reported through UTF-8-multibyte
/// mode (1005): the three fields are code points biased the same way as
/// plain legacy bytes, letting values above 127 survive through a
/// UTF-8-safe stream.
#[must_use]
pub(crate) fn decode_legacy_wide(btn_cp: u32, col_cp: u32, row_cp: u32) -> MouseEvent {
    let cb = btn_cp.wrapping_sub(32);
    let decoded = decode_cb(cb);
    let action = if decoded.base == 3 {
        MouseAction::Release
    } else if decoded.motion {
        MouseAction::Move
    } else {
        MouseAction::Press
    };
    MouseEvent {
        x: col_cp.wrapping_sub(33) as u16,
        y: row_cp.wrapping_sub(33) as u16,
        button: decoded.button,
        action,
        modifiers: decoded.modifiers,
        raw: cb as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_left_press_at_origin() {
        // "\x1B[M !!" -> Cb=' '(0x20), Cx=Cy='!'(0x21)
        let ev = decode_legacy(b' ', b'!', b'!');
        assert_eq!(ev.button, 0);
        assert_eq!(ev.action, MouseAction::Press);
        assert_eq!(ev.x, 0);
        assert_eq!(ev.y, 0);
        assert_eq!(ev.raw, 0x00);
    }

    #[test]
    fn sgr_press_then_release() {
        let press = decode_sgr(0, 5, 3, b'M');
        assert_eq!(press.action, MouseAction::Press);
        assert_eq!((press.x, press.y, press.button), (4, 2, 0));

        let release = decode_sgr(0, 5, 3, b'm');
        assert_eq!(release.action, MouseAction::Release);
    }

    #[test]
    fn sgr_wheel_and_modifiers() {
        // Cb = 64 (wheel) | 4 (shift) = 68
        let ev = decode_sgr(68, 1, 1, b'M');
        assert_eq!(ev.button, 4);
        assert_eq!(ev.modifiers, Modifiers::SHIFT);
    }

    #[test]
    fn sgr_extra_button_bit() {
        // Cb = 128 (extra button bit) -> button = 0 | 8 = 8
        let ev = decode_sgr(128, 1, 1, b'M');
        assert_eq!(ev.button, 8);
    }

    #[test]
    fn urxvt_matches_legacy_decoding() {
        let ev = decode_urxvt(32, 1, 1);
        assert_eq!(ev.button, 0);
        assert_eq!(ev.action, MouseAction::Press);
        assert_eq!((ev.x, ev.y), (0, 0));
    }

    #[test]
    fn legacy_wide_matches_legacy_byte_decoding() {
        let narrow = decode_legacy(b' ', b'!', b'!');
        let wide = decode_legacy_wide(0x20, 0x21, 0x21);
        assert_eq!(
            (narrow.x, narrow.y, narrow.button, narrow.action, narrow.raw),
            (wide.x, wide.y, wide.button, wide.action, wide.raw)
        );
    }
}
