//! Classification of an assembled UTF-8 byte sequence from the `utf8_need_k`
//! states into a `CHAR` or `INVALID_UTF8` event.

use crate::event::{Event, Modifiers};
use vtwidth::utf8;

/// `bytes` is exactly as many bytes as the leading byte promised
/// ([`crate::framing`] counts continuation bytes before calling this).
/// `alt` is set when the sequence was preceded by a bare ESC (Alt-prefix).
#[must_use]
pub(crate) fn classify(bytes: &[u8], alt: bool) -> Event<'_> {
    let modifiers = if alt { Modifiers::ALT } else { Modifiers::NONE };
    match utf8::decode_validated(bytes, false) {
        Ok(_) => Event::Char { bytes, modifiers },
        Err(_) => Event::InvalidUtf8 { bytes, alt },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_char() {
        assert_eq!(classify(b"a", false), Event::Char { bytes: b"a", modifiers: Modifiers::NONE });
    }

    #[test]
    fn alt_prefixed_char() {
        assert_eq!(classify(b"a", true), Event::Char { bytes: b"a", modifiers: Modifiers::ALT });
    }

    #[test]
    fn multibyte_char() {
        let ga = "\u{304C}".as_bytes();
        assert_eq!(classify(ga, false), Event::Char { bytes: ga, modifiers: Modifiers::NONE });
    }

    #[test]
    fn overlong_encoding_is_invalid() {
        let overlong = [0xC0, 0x80];
        assert_eq!(classify(&overlong, false), Event::InvalidUtf8 { bytes: &overlong, alt: false });
    }

    #[test]
    fn surrogate_is_invalid() {
        let surrogate = [0xED, 0xA0, 0x80];
        assert!(matches!(classify(&surrogate, false), Event::InvalidUtf8 { .. }));
    }
}
