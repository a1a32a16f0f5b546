//! The byte-level input decoder state machine.
//!
//! `Decoder` owns exactly one frame buffer and walks it through the named
//! states a terminal input stream can be in: plain bytes (`Base`), an
//! announced escape (`Esc`), an SS3 second byte, an assembling CSI/OSC/DCS
//! frame, a pending string terminator, a partially-seen UTF-8 sequence, or
//! the three raw bytes of a legacy mouse report.

use crate::atoms::{KeyAtom, MiscAtom};
use crate::c0;
use crate::char as charmod;
use crate::csi::{self, Classified, EventShape};
use crate::event::{Event, Modifiers};
use crate::mapping::QuirkTable;
use crate::mouse;
use crate::osc_dcs;
use crate::ss;
use vtwidth::utf8;

/// Frame buffer bound, matching the reference decoder's resync threshold.
const MAX_FRAME_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OscDcsKind {
    Osc,
    Dcs,
    Apc,
}

/// How `CSI M` is framed, set via [`Decoder::expect_legacy_mouse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegacyMouseMode {
    /// `CSI M` is not treated as mouse framing at all; it falls through to
    /// ordinary CSI classification (where it has no mapping).
    #[default]
    Disabled,
    /// The three fields following `CSI M` are one raw byte each.
    SingleByte,
    /// The three fields following `CSI M` are each one UTF-8-encoded code
    /// point, letting coordinate/button values exceed 127 (xterm mode 1005).
    Utf8Multibyte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Base,
    Esc,
    Ss3,
    Csi,
    OscOrDcs(OscDcsKind),
    /// 8-bit (C1) introducer form: `0x9D` for OSC, `0x90` for DCS.
    OscOrDcsC1(OscDcsKind),
    StEsc(OscDcsKind),
    Utf8Need { remaining: u8, alt: bool },
    MouseBtn,
    MouseCol(u8),
    MouseRow(u8, u8),
    MouseUtf8Start { field: u8, btn: u32, col: u32 },
    MouseUtf8Need { field: u8, btn: u32, col: u32, remaining: u8 },
}

struct PasteState {
    initial: bool,
}

/// Bundles the event callback with an optional raw-frame filter for a
/// single [`Decoder::feed`] call, so every internal step only needs to
/// thread one argument instead of two.
struct Sink<'cb, 'rf> {
    event_cb: &'cb mut dyn FnMut(Event<'_>),
    raw_filter: Option<&'rf mut dyn FnMut(&[u8], bool) -> bool>,
}

impl Sink<'_, '_> {
    fn event(&mut self, ev: Event<'_>) {
        (self.event_cb)(ev);
    }

    /// Notify the raw filter of a just-completed frame. Returns `true` if
    /// the filter wants event delivery for this frame suppressed.
    fn raw(&mut self, bytes: &[u8], overflow: bool) -> bool {
        match &mut self.raw_filter {
            Some(f) => f(bytes, overflow),
            None => false,
        }
    }
}

/// Streaming decoder: feed it raw bytes, get back classified events.
pub struct Decoder {
    state: State,
    buf: Vec<u8>,
    /// Set once a bare ESC has been seen and deferred, waiting to see
    /// whether the very next byte is also ESC (in which case the first one
    /// really was a standalone Escape key, not an Alt announcement).
    pending_escape: bool,
    paste: Option<PasteState>,
    /// Number of CPRs the host told us to expect via
    /// [`Decoder::expect_cursor_position_report`]; purely informational
    /// bookkeeping for callers that disambiguate CPR from other `...R`
    /// replies at a higher level.
    cpr_credits: u32,
    quirks: QuirkTable,
    synth: [u8; 4],
    legacy_mouse: LegacyMouseMode,
    expect_apc: bool,
    /// Whether a recognized `CSI 200~` should actually start paste-body
    /// suppression/synthesis, or just deliver the marker and pass bytes
    /// through like any other input (default follows the reference).
    paste_enabled: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Decoder {
            state: State::Base,
            buf: Vec::new(),
            pending_escape: false,
            paste: None,
            cpr_credits: 0,
            quirks: QuirkTable::empty(),
            synth: [0; 4],
            legacy_mouse: LegacyMouseMode::Disabled,
            expect_apc: false,
            paste_enabled: true,
        }
    }

    /// Load a named quirk table, checked before the master mapping table
    /// against every complete CSI frame, C0/DEL byte, and UTF-8-decoded
    /// multibyte sequence. Additive and cumulative: entries from earlier
    /// calls stay active, with later calls taking priority.
    pub fn activate_quirk(&mut self, table: QuirkTable) {
        self.quirks.merge(table);
    }

    /// Tell the decoder a cursor position report is expected soon, so a
    /// caller-side disambiguation heuristic (e.g. against a stray `...R`
    /// reply from something else) can use the credit count.
    pub fn expect_cursor_position_report(&mut self) {
        self.cpr_credits = self.cpr_credits.saturating_add(1);
    }

    /// Select how `CSI M` is framed as legacy mouse input, or disable
    /// recognizing it as mouse input at all. SGR and urxvt mouse framing are
    /// unaffected by this setting.
    pub fn expect_legacy_mouse(&mut self, mode: LegacyMouseMode) {
        self.legacy_mouse = mode;
    }

    /// Enable or disable recognizing `ESC _ ... ST` as an Application
    /// Program Command string. While disabled (the default), `ESC _` is an
    /// ordinary Alt-prefixed character. APC bodies carry no classification
    /// of their own; they are consumed and produce no event.
    pub fn expect_apc(&mut self, enable: bool) {
        self.expect_apc = enable;
    }

    /// Bytes currently held in the frame buffer, not yet classified.
    #[must_use]
    pub fn peek_pending(&self) -> &[u8] {
        &self.buf
    }

    /// Toggle whether a recognized bracketed-paste start marker begins
    /// paste-body suppression/synthesis. Turning this off mid-paste ends
    /// the paste immediately without a synthesized end event.
    pub fn handle_paste(&mut self, enable: bool) {
        self.paste_enabled = enable;
        if !enable {
            self.paste = None;
        }
    }

    /// Feed `input` and invoke `cb` once per classified event. Events
    /// borrow from the decoder's internal buffers and are only valid for
    /// the duration of each `cb` call.
    pub fn feed(&mut self, input: &[u8], cb: &mut dyn FnMut(Event<'_>)) {
        self.feed_with_raw_filter(input, None, cb);
    }

    /// Feed `input` like [`Decoder::feed`], additionally invoking
    /// `raw_filter` once per completed frame (CSI/OSC/DCS sequence, C0/DEL
    /// byte, character, or overflow) with that frame's raw bytes. If
    /// `raw_filter` returns `true`, the event that frame would have produced
    /// is suppressed; the decoder's internal state still advances normally.
    pub fn feed_with_raw_filter(
        &mut self,
        input: &[u8],
        raw_filter: Option<&mut dyn FnMut(&[u8], bool) -> bool>,
        cb: &mut dyn FnMut(Event<'_>),
    ) {
        let mut sink = Sink { event_cb: cb, raw_filter };
        let mut i = 0;
        while i < input.len() {
            if let Some(paste) = &self.paste {
                let initial = paste.initial;
                let (consumed, ended) = self.feed_paste(&input[i..], initial, &mut sink);
                i += consumed;
                if ended {
                    self.paste = None;
                } else if let Some(p) = &mut self.paste {
                    p.initial = false;
                }
                continue;
            }
            self.step(input[i], &mut sink);
            i += 1;
        }
    }

    /// Scan for the bracketed-paste end marker (`ESC [ 201 ~`) inside
    /// passthrough bytes. Returns bytes consumed and whether the end
    /// marker was found and consumed.
    fn feed_paste(&mut self, input: &[u8], initial: bool, sink: &mut Sink<'_, '_>) -> (usize, bool) {
        const END_MARKER: &[u8] = b"\x1B[201~";
        if let Some(pos) = input.windows(END_MARKER.len()).position(|w| w == END_MARKER) {
            if pos > 0 {
                sink.event(Event::Paste { bytes: &input[..pos], initial, final_: true });
            } else {
                sink.event(Event::Paste { bytes: &[], initial, final_: true });
            }
            sink.event(Event::Misc(MiscAtom::PasteEnd));
            (pos + END_MARKER.len(), true)
        } else {
            // Hold back enough trailing bytes that a split end marker
            // isn't mistaken for paste content.
            let hold = END_MARKER.len().saturating_sub(1).min(input.len());
            let emit_len = input.len() - hold;
            if emit_len > 0 {
                sink.event(Event::Paste { bytes: &input[..emit_len], initial, final_: false });
            }
            (emit_len, false)
        }
    }

    fn overflow_resync(&mut self, sink: &mut Sink<'_, '_>) {
        let frame = std::mem::take(&mut self.buf);
        self.state = State::Base;
        self.pending_escape = false;
        if !sink.raw(&frame, true) {
            sink.event(Event::Overflow);
            sink.event(Event::Misc(MiscAtom::IResync));
        }
        self.buf = frame;
        self.buf.clear();
    }

    fn step(&mut self, byte: u8, sink: &mut Sink<'_, '_>) {
        match self.state {
            State::Base => self.step_base(byte, sink),
            State::Esc => self.step_esc(byte, sink),
            State::Ss3 => {
                if !sink.raw(&[0x1B, b'O', byte], false) {
                    if let Some(ev) = ss::classify(byte) {
                        sink.event(ev);
                    }
                }
                self.state = State::Base;
            }
            State::Csi => self.step_csi(byte, sink),
            State::OscOrDcs(kind) | State::OscOrDcsC1(kind) => self.step_osc_dcs(kind, byte, sink),
            State::StEsc(kind) => self.step_st_esc(kind, byte, sink),
            State::Utf8Need { remaining, alt } => self.step_utf8(remaining, alt, byte, sink),
            State::MouseBtn => {
                self.buf.push(byte);
                self.state = State::MouseCol(byte);
            }
            State::MouseCol(btn) => {
                self.state = State::MouseRow(btn, byte);
            }
            State::MouseRow(btn, col) => {
                if !sink.raw(&[0x1B, b'[', b'M', btn, col, byte], false) {
                    sink.event(Event::Mouse(mouse::decode_legacy(btn, col, byte)));
                }
                self.buf.clear();
                self.state = State::Base;
            }
            State::MouseUtf8Start { field, btn, col } => self.step_mouse_utf8_start(field, btn, col, byte, sink),
            State::MouseUtf8Need { field, btn, col, remaining } => {
                self.step_mouse_utf8_need(field, btn, col, remaining, byte, sink);
            }
        }
    }

    fn step_mouse_utf8_start(&mut self, field: u8, btn: u32, col: u32, byte: u8, sink: &mut Sink<'_, '_>) {
        let len = utf8::length_of_leading_byte(byte);
        if len <= 1 {
            self.mouse_utf8_field_complete(field, btn, col, u32::from(byte), sink);
        } else {
            self.buf.clear();
            self.buf.push(byte);
            self.state = State::MouseUtf8Need { field, btn, col, remaining: len - 1 };
        }
    }

    fn step_mouse_utf8_need(
        &mut self,
        field: u8,
        btn: u32,
        col: u32,
        remaining: u8,
        byte: u8,
        sink: &mut Sink<'_, '_>,
    ) {
        if byte & 0xC0 == 0x80 {
            self.buf.push(byte);
            if remaining > 1 {
                self.state = State::MouseUtf8Need { field, btn, col, remaining: remaining - 1 };
            } else {
                let frame = std::mem::take(&mut self.buf);
                let value = utf8::decode_validated(&frame, false).unwrap_or(0);
                self.buf = frame;
                self.buf.clear();
                self.mouse_utf8_field_complete(field, btn, col, value, sink);
            }
        } else {
            self.buf.clear();
            self.state = State::Base;
            self.step(byte, sink);
        }
    }

    fn mouse_utf8_field_complete(&mut self, field: u8, btn: u32, col: u32, value: u32, sink: &mut Sink<'_, '_>) {
        match field {
            0 => self.state = State::MouseUtf8Start { field: 1, btn: value, col: 0 },
            1 => self.state = State::MouseUtf8Start { field: 2, btn, col: value },
            _ => {
                sink.event(Event::Mouse(mouse::decode_legacy_wide(btn, col, value)));
                self.state = State::Base;
            }
        }
    }

    fn flush_pending_escape(&mut self, sink: &mut Sink<'_, '_>) {
        if self.pending_escape {
            if !sink.raw(&[0x1B], false) {
                sink.event(Event::Key { atom: KeyAtom::Escape, modifiers: Modifiers::NONE });
            }
            self.pending_escape = false;
        }
    }

    fn step_base(&mut self, byte: u8, sink: &mut Sink<'_, '_>) {
        match byte {
            0x1B => {
                self.flush_pending_escape(sink);
                self.pending_escape = true;
                self.state = State::Esc;
            }
            0x9B => {
                self.flush_pending_escape(sink);
                self.buf.clear();
                self.state = State::Csi;
            }
            0x9D => {
                self.flush_pending_escape(sink);
                self.buf.clear();
                self.state = State::OscOrDcsC1(OscDcsKind::Osc);
            }
            0x90 => {
                self.flush_pending_escape(sink);
                self.buf.clear();
                self.state = State::OscOrDcsC1(OscDcsKind::Dcs);
            }
            b if b < 0x20 || b == 0x7F => {
                self.flush_pending_escape(sink);
                if sink.raw(&[b], false) {
                    return;
                }
                if let Some((atom, modifiers)) = self.quirks.lookup(&[b]) {
                    sink.event(Event::Key { atom, modifiers });
                } else if let Some(ev) = c0::classify(b) {
                    sink.event(ev);
                }
            }
            b if b < 0x80 => {
                self.flush_pending_escape(sink);
                if !sink.raw(&[b], false) {
                    sink.event(charmod::classify(&[b], false));
                }
            }
            b => {
                self.flush_pending_escape(sink);
                self.start_utf8(b, false, sink);
            }
        }
    }

    fn step_esc(&mut self, byte: u8, sink: &mut Sink<'_, '_>) {
        match byte {
            0x1B => {
                // Second ESC in a row: the first really was a bare Escape.
                self.flush_pending_escape(sink);
                self.pending_escape = true;
            }
            b'[' => {
                self.pending_escape = false;
                self.buf.clear();
                self.state = State::Csi;
            }
            b'O' => {
                self.pending_escape = false;
                self.state = State::Ss3;
            }
            b']' => {
                self.pending_escape = false;
                self.buf.clear();
                self.state = State::OscOrDcs(OscDcsKind::Osc);
            }
            b'P' => {
                self.pending_escape = false;
                self.buf.clear();
                self.state = State::OscOrDcs(OscDcsKind::Dcs);
            }
            b'_' if self.expect_apc => {
                self.pending_escape = false;
                self.buf.clear();
                self.state = State::OscOrDcs(OscDcsKind::Apc);
            }
            b if b < 0x80 => {
                // Alt+<printable or control>.
                self.pending_escape = false;
                self.state = State::Base;
                if sink.raw(&[0x1B, b], false) {
                    return;
                }
                if b < 0x20 || b == 0x7F {
                    if let Some(ev) = c0::classify(b) {
                        sink.event(ev);
                    }
                } else {
                    sink.event(charmod::classify(&[b], true));
                }
            }
            b => {
                self.pending_escape = false;
                self.state = State::Base;
                self.start_utf8(b, true, sink);
            }
        }
    }

    fn start_utf8(&mut self, lead: u8, alt: bool, sink: &mut Sink<'_, '_>) {
        let len = utf8::length_of_leading_byte(lead);
        if len <= 1 {
            if !sink.raw(&[lead], false) {
                sink.event(Event::InvalidUtf8 { bytes: &[lead], alt });
            }
            return;
        }
        self.buf.clear();
        self.buf.push(lead);
        self.state = State::Utf8Need { remaining: len - 1, alt };
    }

    fn step_utf8(&mut self, remaining: u8, alt: bool, byte: u8, sink: &mut Sink<'_, '_>) {
        if byte & 0xC0 == 0x80 {
            self.buf.push(byte);
            if remaining > 1 {
                self.state = State::Utf8Need { remaining: remaining - 1, alt };
            } else {
                let frame = std::mem::take(&mut self.buf);
                if !sink.raw(&frame, false) {
                    if let Some((atom, modifiers)) = self.quirks.lookup(&frame) {
                        sink.event(Event::Key { atom, modifiers });
                    } else {
                        sink.event(charmod::classify(&frame, alt));
                    }
                }
                self.buf = frame;
                self.buf.clear();
                self.state = State::Base;
            }
        } else {
            let frame = std::mem::take(&mut self.buf);
            if !sink.raw(&frame, false) {
                sink.event(Event::InvalidUtf8 { bytes: &frame, alt });
            }
            self.buf = frame;
            self.buf.clear();
            self.state = State::Base;
            self.step(byte, sink);
        }
    }

    fn step_csi(&mut self, byte: u8, sink: &mut Sink<'_, '_>) {
        if self.buf.is_empty() && byte == b'M' {
            match self.legacy_mouse {
                LegacyMouseMode::SingleByte => {
                    self.state = State::MouseBtn;
                    return;
                }
                LegacyMouseMode::Utf8Multibyte => {
                    self.state = State::MouseUtf8Start { field: 0, btn: 0, col: 0 };
                    return;
                }
                LegacyMouseMode::Disabled => {}
            }
        }
        if self.buf.len() >= MAX_FRAME_LEN {
            self.overflow_resync(sink);
            return;
        }
        if (0x40..=0x7E).contains(&byte) {
            self.finish_csi(byte, sink);
            return;
        }
        self.buf.push(byte);
    }

    fn finish_csi(&mut self, final_byte: u8, sink: &mut Sink<'_, '_>) {
        let frame = std::mem::take(&mut self.buf);
        let marker = frame.first().copied().filter(|b| matches!(b, b'?' | b'<' | b'>' | b'='));
        let body = if marker.is_some() { &frame[1..] } else { &frame[..] };
        let (param_bytes, intermediates): (Vec<u8>, Vec<u8>) =
            body.iter().copied().partition(|b| (0x30..=0x3B).contains(b));
        let params: Vec<u32> = if param_bytes.is_empty() {
            Vec::new()
        } else {
            param_bytes
                .split(|&b| b == b';')
                .map(|seg| std::str::from_utf8(seg).ok().and_then(|s| s.parse().ok()).unwrap_or(0))
                .collect()
        };

        let full_frame = reconstruct_full_frame(marker, &frame, final_byte).unwrap_or_default();
        let suppressed = sink.raw(&full_frame, false);

        if !suppressed && !self.quirks.is_empty() {
            if let Some((atom, modifiers)) = self.quirks.lookup(&full_frame) {
                sink.event(Event::Key { atom, modifiers });
                self.buf = frame;
                self.buf.clear();
                self.state = State::Base;
                return;
            }
        }

        match csi::classify(marker, &params, &intermediates, final_byte) {
            Classified::Event(shape) => {
                if self.paste_enabled && matches!(shape, EventShape::Misc(MiscAtom::PasteBegin)) {
                    self.paste = Some(PasteState { initial: true });
                }
                if !suppressed {
                    sink.event(shape.into_event(&full_frame));
                }
            }
            Classified::Codepoint(cp, modifiers) => {
                if !suppressed {
                    self.emit_codepoint(cp, modifiers, sink);
                }
            }
            Classified::None => {}
        }
        self.buf = frame;
        self.buf.clear();
        self.state = State::Base;
    }

    fn emit_codepoint(&mut self, cp: u32, modifiers: Modifiers, sink: &mut Sink<'_, '_>) {
        let atom = match cp {
            9 => Some(KeyAtom::Tab),
            13 => Some(KeyAtom::Enter),
            27 => Some(KeyAtom::Escape),
            127 => Some(KeyAtom::Backspace),
            _ => None,
        };
        if let Some(atom) = atom {
            sink.event(Event::Key { atom, modifiers });
            return;
        }
        let mut tmp = [0u8; 6];
        match utf8::encode(cp, false, &mut tmp) {
            Ok(len) => {
                let n = usize::from(len).min(self.synth.len());
                self.synth[..n].copy_from_slice(&tmp[..n]);
                sink.event(Event::Char { bytes: &self.synth[..n], modifiers });
            }
            Err(_) => sink.event(Event::InvalidUtf8 { bytes: &[], alt: false }),
        }
    }

    fn step_osc_dcs(&mut self, kind: OscDcsKind, byte: u8, sink: &mut Sink<'_, '_>) {
        match byte {
            0x07 => self.finish_osc_dcs(kind, sink),
            0x9C => self.finish_osc_dcs(kind, sink),
            0x1B => self.state = State::StEsc(kind),
            _ if self.buf.len() >= MAX_FRAME_LEN => self.overflow_resync(sink),
            _ => self.buf.push(byte),
        }
    }

    fn step_st_esc(&mut self, kind: OscDcsKind, byte: u8, sink: &mut Sink<'_, '_>) {
        if byte == b'\\' {
            self.finish_osc_dcs(kind, sink);
        } else {
            // Not a valid ST; abandon the string and reprocess this byte
            // as the start of a fresh escape sequence.
            self.buf.clear();
            self.state = State::Esc;
            self.step_esc(byte, sink);
        }
    }

    fn finish_osc_dcs(&mut self, kind: OscDcsKind, sink: &mut Sink<'_, '_>) {
        let frame = std::mem::take(&mut self.buf);
        let suppressed = sink.raw(&frame, false);
        let event = match kind {
            OscDcsKind::Osc => osc_dcs::classify_osc(&frame),
            OscDcsKind::Dcs => osc_dcs::classify_dcs(&frame),
            OscDcsKind::Apc => None,
        };
        if !suppressed {
            if let Some(ev) = event {
                sink.event(ev);
            }
        }
        self.buf = frame;
        self.buf.clear();
        self.state = State::Base;
    }
}

fn reconstruct_full_frame(marker: Option<u8>, body_with_marker: &[u8], final_byte: u8) -> Option<Vec<u8>> {
    let mut out = vec![0x1B, b'['];
    let _ = marker;
    out.extend_from_slice(body_with_marker);
    out.push(final_byte);
    Some(out)
}
