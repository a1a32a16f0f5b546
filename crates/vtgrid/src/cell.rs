//! Cell attributes: colors, the style bitmask, underline kind, and patches.

use bitflags::bitflags;

/// Named ANSI colors 0-15, in the order `termpaint_image.cpp` serializes them.
pub const NAMED_COLOR_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright black",
    "bright red",
    "bright green",
    "bright yellow",
    "bright blue",
    "bright magenta",
    "bright cyan",
    "bright white",
];

/// A cell's foreground, background, or decoration color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    #[default]
    Default,
    Rgb(u8, u8, u8),
    /// One of the 16 named ANSI colors.
    Named(u8),
    /// One of the 256 indexed palette colors.
    Indexed(u8),
}

impl Color {
    /// Serialize as `#rrggbb`, a lowercase name, or a decimal index; `None`
    /// for `Default`, matching the image format's "omit when default" rule.
    #[must_use]
    pub fn image_token(self) -> Option<String> {
        match self {
            Color::Default => None,
            Color::Rgb(r, g, b) => Some(format!("#{r:02x}{g:02x}{b:02x}")),
            Color::Named(n) => NAMED_COLOR_NAMES.get(n as usize).map(|s| (*s).to_string()),
            Color::Indexed(i) => Some(i.to_string()),
        }
    }
}

bitflags! {
    /// Style attributes orthogonal to underline kind and color.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    #[derive(Debug, Default, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct Style: u8 {
        const BOLD = 0b0000_0001;
        const ITALIC = 0b0000_0010;
        const BLINK = 0b0000_0100;
        const OVERLINE = 0b0000_1000;
        const INVERSE = 0b0001_0000;
        const STRIKE = 0b0010_0000;
        const NONE = 0b0000_0000;
    }
}

/// Underline is mutually exclusive, so it lives outside the `Style` bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    Curly,
}

/// Escape strings emitted verbatim around a cell by the (out-of-scope)
/// renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patch {
    pub setup: Option<String>,
    pub cleanup: Option<String>,
    /// When set, the renderer may merge adjacent cells carrying an
    /// identical patch into a single setup/cleanup pair.
    pub optimize: bool,
}

/// Which half of a (possibly two-column) cluster a cell represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Half {
    #[default]
    Single,
    Left,
    Right,
}

/// Cell text plus every display attribute.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) text: crate::cluster::InternId,
    pub(crate) half: Half,
    pub fg: Color,
    pub bg: Color,
    pub deco: Color,
    pub style: Style,
    pub underline: Underline,
    pub patch: Option<Patch>,
    pub softwrap: bool,
}

/// Sole text byte of a "cleared" cell: semantically blank, but keeps its
/// background color, per the erase sentinel convention.
pub const ERASE_SENTINEL: u8 = 0x7F;

impl Cell {
    pub(crate) fn new(text: crate::cluster::InternId, half: Half) -> Self {
        Cell {
            text,
            half,
            fg: Color::Default,
            bg: Color::Default,
            deco: Color::Default,
            style: Style::NONE,
            underline: Underline::None,
            patch: None,
            softwrap: false,
        }
    }

    /// A cell carries the erase sentinel and no other attributes besides
    /// whatever background color was set before the clear.
    #[must_use]
    pub fn is_cleared(&self, text: &[u8]) -> bool {
        text == [ERASE_SENTINEL]
    }

    /// True if this cell is the invisible right half of a wide cluster.
    #[must_use]
    pub fn is_right_half(&self) -> bool {
        matches!(self.half, Half::Right)
    }

    /// True if this cell is the left (text-bearing) half of a wide cluster.
    #[must_use]
    pub fn is_left_half(&self) -> bool {
        matches!(self.half, Half::Left)
    }

    #[must_use]
    pub fn width(&self) -> u8 {
        match self.half {
            Half::Single => 1,
            Half::Left | Half::Right => 2,
        }
    }
}
