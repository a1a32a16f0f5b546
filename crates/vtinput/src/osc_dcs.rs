//! Classification of OSC and DCS string bodies, after [`crate::framing`] has
//! already stripped the introducer (`ESC ]` / `ESC P` or their 8-bit C1
//! forms) and the terminator (BEL, `ESC \`, or 0x9C).

use crate::atoms::RawKind;
use crate::event::Event;

/// Classify an OSC body. `body` is everything between the introducer and
/// the terminator, e.g. `4;5;rgb:ff/00/00` or `10;rgb:ff/ff/ff`.
#[must_use]
pub(crate) fn classify_osc(body: &[u8]) -> Option<Event<'_>> {
    let text = body;
    let mut parts = text.splitn(3, |&b| b == b';');
    let code = parts.next()?;
    let code: u16 = std::str::from_utf8(code).ok()?.parse().ok()?;

    match code {
        4 => {
            let index_bytes = parts.next()?;
            let descriptor = parts.next()?;
            let index: i32 = std::str::from_utf8(index_bytes).ok()?.parse().ok()?;
            Some(Event::PaletteColorReport { index, descriptor })
        }
        10 | 11 | 12 | 17 | 19 => {
            let descriptor = parts.next()?;
            Some(Event::ColorSlotReport { slot: code, descriptor })
        }
        _ => None,
    }
}

/// Classify a DCS body. `body` is everything between the introducer and
/// the terminator.
#[must_use]
pub(crate) fn classify_dcs(body: &[u8]) -> Option<Event<'_>> {
    if let Some(rest) = body.strip_prefix(b"!|") {
        return Some(Event::Raw { kind: RawKind::TertiaryDeviceAttributes, bytes: rest });
    }
    if let Some(rest) = body.strip_prefix(b">|") {
        return Some(Event::Raw { kind: RawKind::TerminalNameDcs, bytes: rest });
    }
    if body.starts_with(b"1+r") || body.starts_with(b"0+r") {
        return Some(Event::Raw { kind: RawKind::TerminfoQueryReply, bytes: body });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_color_report() {
        let ev = classify_osc(b"4;5;rgb:ff/00/00").unwrap();
        assert_eq!(ev, Event::PaletteColorReport { index: 5, descriptor: b"rgb:ff/00/00" });
    }

    #[test]
    fn foreground_color_slot_report() {
        let ev = classify_osc(b"10;rgb:ffff/ffff/ffff").unwrap();
        assert_eq!(ev, Event::ColorSlotReport { slot: 10, descriptor: b"rgb:ffff/ffff/ffff" });
    }

    #[test]
    fn unrelated_osc_is_none() {
        assert_eq!(classify_osc(b"0;window title"), None);
    }

    #[test]
    fn tertiary_device_attributes() {
        let ev = classify_dcs(b"!|7E565400").unwrap();
        assert_eq!(ev, Event::Raw { kind: RawKind::TertiaryDeviceAttributes, bytes: b"7E565400" });
    }

    #[test]
    fn terminal_name_dcs() {
        let ev = classify_dcs(b">|mlterm(3.9.1)").unwrap();
        assert_eq!(ev, Event::Raw { kind: RawKind::TerminalNameDcs, bytes: b"mlterm(3.9.1)" });
    }

    #[test]
    fn terminfo_query_reply() {
        let ev = classify_dcs(b"1+r544e=787465726d").unwrap();
        assert_eq!(ev, Event::Raw { kind: RawKind::TerminfoQueryReply, bytes: b"1+r544e=787465726d" });
    }
}
