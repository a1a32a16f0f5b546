//! Column-width ranges for each named profile.
//!
//! Upstream `termpaint_char_width.h` bakes its packed tables in at compile
//! time from a Unicode data file processed offline. We don't have that data
//! file or a build step available here, so these ranges are curated by hand
//! from the Unicode East Asian Width property and emoji-presentation blocks,
//! and packed once at first use (see `lookup::Table::build`). Raw width `3`
//! marks an "ambiguous/emoji-presentation" code point, exactly as in the
//! source header; `lookup::resolve_raw` is what turns that into a concrete
//! {0,1,2}.

/// `(first, last, raw_width)`, inclusive. Later ranges win where they overlap
/// earlier ones, mirroring how narrow combining sub-ranges are carved out of
/// wider blocks below.
pub(crate) type Range = (u32, u32, u8);

/// Ranges shared by every profile: combining marks, joiners, variation
/// selectors, and the unambiguous East Asian Wide/Fullwidth blocks.
pub(crate) const COMMON: &[Range] = &[
    // Combining marks and other zero-width code points.
    (0x0300, 0x036F, 0),
    (0x0483, 0x0489, 0),
    (0x0591, 0x05BD, 0),
    (0x05BF, 0x05BF, 0),
    (0x05C1, 0x05C2, 0),
    (0x0610, 0x061A, 0),
    (0x064B, 0x065F, 0),
    (0x0670, 0x0670, 0),
    (0x06D6, 0x06DC, 0),
    (0x06DF, 0x06E4, 0),
    (0x0E31, 0x0E31, 0),
    (0x0E34, 0x0E3A, 0),
    (0x0E47, 0x0E4E, 0),
    (0x1AB0, 0x1AFF, 0),
    (0x1DC0, 0x1DFF, 0),
    (0x200B, 0x200F, 0),
    (0x200D, 0x200D, 0), // ZWJ; joining semantics handled in vtgrid, width itself is 0
    (0x202A, 0x202E, 0),
    (0x2060, 0x2064, 0),
    (0x20D0, 0x20FF, 0),
    (0xFE00, 0xFE0F, 0), // variation selectors 1-16
    (0xFE20, 0xFE2F, 0),
    (0xFEFF, 0xFEFF, 0),
    (0xE0100, 0xE01EF, 0), // variation selectors 17-256
    (0xE0001, 0xE0001, 0),
    (0xE0020, 0xE007F, 0),
    // Hangul Jamo (leading consonants are wide; vowels/trailing are narrow
    // in the common profile, widened below in Konsole variants).
    (0x1100, 0x115F, 2),
    (0x2E80, 0x303E, 2),
    (0x3041, 0x33FF, 2),
    (0x3400, 0x4DBF, 2),
    (0x4E00, 0x9FFF, 2),
    (0xA000, 0xA4CF, 2),
    (0xAC00, 0xD7A3, 2),
    (0xF900, 0xFAFF, 2),
    (0xFF00, 0xFF60, 2),
    (0xFFE0, 0xFFE6, 2),
    (0x16FE0, 0x16FFF, 2),
    (0x17000, 0x18CFF, 2),
    (0x1B000, 0x1B2FF, 2),
    (0x1F200, 0x1F2FF, 2),
    (0x20000, 0x3FFFD, 2),
    // Emoji presentation blocks: ambiguous by default (East Asian "Narrow"
    // context collapses them to 1), widened per profile below.
    (0x2600, 0x27BF, 3),
    (0x2B00, 0x2BFF, 3),
    (0x1F300, 0x1F5FF, 3),
    (0x1F600, 0x1F64F, 3),
    (0x1F680, 0x1F6FF, 3),
    (0x1F900, 0x1F9FF, 3),
    (0x1FA70, 0x1FAFF, 3),
];

/// The termpaint default table: ambiguous/emoji-presentation code points
/// stay narrow unless the consuming application opts into wide emoji.
pub(crate) const DEFAULT_OVERRIDES: &[Range] = &[];

/// Konsole (pre-2019) historically rendered most emoji-presentation blocks
/// at a single column.
pub(crate) const KONSOLE2018_OVERRIDES: &[Range] = &[
    (0x2600, 0x27BF, 1),
    (0x2B00, 0x2BFF, 1),
    (0x1F300, 0x1F5FF, 1),
    (0x1F600, 0x1F64F, 1),
    (0x1F680, 0x1F6FF, 1),
    (0x1F900, 0x1F9FF, 1),
    (0x1FA70, 0x1FAFF, 1),
];

/// Konsole 2022+ renders emoji-presentation blocks at two columns, matching
/// most other modern terminal emulators.
pub(crate) const KONSOLE2022_OVERRIDES: &[Range] = &[
    (0x2600, 0x27BF, 2),
    (0x2B00, 0x2BFF, 2),
    (0x1F300, 0x1F5FF, 2),
    (0x1F600, 0x1F64F, 2),
    (0x1F680, 0x1F6FF, 2),
    (0x1F900, 0x1F9FF, 2),
    (0x1FA70, 0x1FAFF, 2),
];
