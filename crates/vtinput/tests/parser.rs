mod common;

use common::assert_partition_invariant;
use vtinput::{Decoder, Event, EventOwned, KeyAtom, MiscAtom, Modifiers};

fn decode(input: &[u8]) -> Vec<EventOwned> {
    let mut decoder = Decoder::new();
    let mut events = Vec::new();
    decoder.feed(input, &mut |ev: Event<'_>| events.push(ev.to_owned()));
    events
}

#[test]
fn plain_text_is_char_events() {
    let events = decode(b"hi");
    assert_eq!(
        events,
        vec![
            EventOwned::Char { bytes: b"h".to_vec(), modifiers: Modifiers::NONE },
            EventOwned::Char { bytes: b"i".to_vec(), modifiers: Modifiers::NONE },
        ]
    );
}

#[test]
fn arrow_key_partition_invariant() {
    assert_partition_invariant(b"\x1B[A");
}

#[test]
fn sgr_mouse_sequence_partition_invariant() {
    assert_partition_invariant(b"\x1B[<0;5;3M\x1B[<0;5;3m");
}

#[test]
fn modify_other_keys_partition_invariant() {
    assert_partition_invariant(b"\x1B[27;6;9~");
}

#[test]
fn legacy_mouse_partition_invariant() {
    assert_partition_invariant(b"\x1B[M !!");
}

#[test]
fn multibyte_utf8_partition_invariant() {
    assert_partition_invariant("caf\u{E9} \u{304C}".as_bytes());
}

#[test]
fn overflow_resyncs_after_1025_bytes() {
    let mut input = vec![0x1B, b'['];
    input.extend(std::iter::repeat(b'1').take(1025));
    let events = decode(&input);
    assert!(events.contains(&EventOwned::Overflow));
    assert!(events.contains(&EventOwned::Misc(MiscAtom::IResync)));
}

#[test]
fn bracketed_paste_delivers_body_between_markers() {
    let mut decoder = Decoder::new();
    let mut events = Vec::new();
    decoder.feed(b"\x1B[200~", &mut |ev: Event<'_>| events.push(ev.to_owned()));
    assert_eq!(events, vec![EventOwned::Misc(MiscAtom::PasteBegin)]);
    events.clear();
    decoder.feed(b"hello\x1B[201~", &mut |ev: Event<'_>| events.push(ev.to_owned()));
    assert!(events.iter().any(|e| matches!(e, EventOwned::Paste { bytes, .. } if bytes == b"hello")));
}

#[test]
fn double_escape_delivers_bare_escape_key() {
    let events = decode(b"\x1B\x1B");
    assert_eq!(events, vec![EventOwned::Key { atom: KeyAtom::Escape, modifiers: Modifiers::NONE }]);
}
