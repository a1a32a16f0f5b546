//! Two-level packed width table and the binary search over it.
//!
//! Mirrors the lookup shape of `termpaint_char_width.h`: a run-offset array
//! indexed by the high bits of the code point, and within each run a list of
//! `(code point << 2) | width` transition words searched by the low bits.
//! Upstream packs this table in at compile time from generated C arrays; we
//! build the same shape once per profile at first use via `OnceLock`; see
//! `DESIGN.md` for why runtime construction replaces the offline codegen.

use std::sync::OnceLock;

use crate::tables::Range;

const RUN_BITS: u32 = 14;
const RUN_SIZE: u32 = 1 << RUN_BITS;
const RUN_MASK: u32 = RUN_SIZE - 1;
const MAX_CODE_POINT_EXCLUSIVE: u32 = 0x11_0000;
const NUM_RUNS: usize = (MAX_CODE_POINT_EXCLUSIVE as usize).div_ceil(RUN_SIZE as usize);

pub(crate) struct Table {
    /// `offsets[r]..offsets[r + 1]` indexes the transition words for run `r`.
    offsets: Vec<u32>,
    /// Transition words, `(local_code_point << 2) | raw_width`, run-local.
    data: Vec<u32>,
}

impl Table {
    pub(crate) fn build(ranges: &[Range]) -> Self {
        let mut raw = vec![1u8; MAX_CODE_POINT_EXCLUSIVE as usize];
        for &(first, last, width) in ranges {
            let last = last.min(MAX_CODE_POINT_EXCLUSIVE - 1);
            if first > last {
                continue;
            }
            for cp in first..=last {
                raw[cp as usize] = width;
            }
        }

        let mut offsets = Vec::with_capacity(NUM_RUNS + 1);
        let mut data = Vec::new();
        for run in 0..NUM_RUNS {
            offsets.push(data.len() as u32);
            let run_start = run as u32 * RUN_SIZE;
            let mut prev_width: Option<u8> = None;
            for local in 0..RUN_SIZE {
                let cp = run_start + local;
                let width = raw[cp as usize];
                if prev_width != Some(width) {
                    data.push((local << 2) | u32::from(width));
                    prev_width = Some(width);
                }
            }
        }
        offsets.push(data.len() as u32);

        Table { offsets, data }
    }

    /// Raw width (including the unresolved `3` sentinel) for `cp`.
    pub(crate) fn raw_width(&self, cp: u32) -> u8 {
        if cp >= MAX_CODE_POINT_EXCLUSIVE {
            return 1;
        }
        let run = (cp >> RUN_BITS) as usize;
        let low = self.offsets[run] as usize;
        let high = self.offsets[run + 1] as usize;
        let slice = &self.data[low..high];
        let target = cp & RUN_MASK;

        let mut lo = 0i64;
        let mut hi = slice.len() as i64 - 1;
        let mut found = 1u8;
        while lo <= hi {
            let mid = ((lo + hi) / 2) as usize;
            let word = slice[mid];
            let word_cp = word >> 2;
            if word_cp <= target {
                found = (word & 0b11) as u8;
                lo = mid as i64 + 1;
            } else {
                hi = mid as i64 - 1;
            }
        }
        found
    }
}

/// Turn a raw table value into a display width in `{0, 1, 2}`.
///
/// Raw `3` ("ambiguous/emoji-presentation") resolves to `2`: every profile
/// here targets terminals that render emoji at two columns by default, and
/// narrower profiles carve out their own overrides in `tables.rs` instead.
pub(crate) fn resolve_raw(raw: u8) -> u8 {
    if raw == 3 { 2 } else { raw }
}

static DEFAULT_TABLE: OnceLock<Table> = OnceLock::new();
static KONSOLE2018_TABLE: OnceLock<Table> = OnceLock::new();
static KONSOLE2022_TABLE: OnceLock<Table> = OnceLock::new();
static EMOJI_PRESENTATION_TABLE: OnceLock<Table> = OnceLock::new();

/// Built from `COMMON` alone, so Konsole profiles' narrowing/widening
/// overrides (which replace raw `3` with a concrete `1`/`2`) can't hide a
/// code point from this check. The emoji-presentation blocks are a Unicode
/// property, not a per-profile rendering choice.
fn emoji_presentation_table() -> &'static Table {
    EMOJI_PRESENTATION_TABLE.get_or_init(|| Table::build(crate::tables::COMMON))
}

pub(crate) fn is_emoji_presentation(cp: u32) -> bool {
    emoji_presentation_table().raw_width(cp) == 3
}

fn merged(overrides: &[Range]) -> Vec<Range> {
    let mut ranges = Vec::with_capacity(crate::tables::COMMON.len() + overrides.len());
    ranges.extend_from_slice(crate::tables::COMMON);
    ranges.extend_from_slice(overrides);
    ranges
}

pub(crate) fn default_table() -> &'static Table {
    DEFAULT_TABLE.get_or_init(|| Table::build(&merged(crate::tables::DEFAULT_OVERRIDES)))
}

pub(crate) fn konsole2018_table() -> &'static Table {
    KONSOLE2018_TABLE.get_or_init(|| Table::build(&merged(crate::tables::KONSOLE2018_OVERRIDES)))
}

pub(crate) fn konsole2022_table() -> &'static Table {
    KONSOLE2022_TABLE.get_or_init(|| Table::build(&merged(crate::tables::KONSOLE2022_OVERRIDES)))
}
