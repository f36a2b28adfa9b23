//! Cell: the atomic unit of a rendered frame.
//!
//! Cells are kept at 16 bytes so four fit per cache line; the diff pass
//! compares full rows of them every frame. Most graphemes fit the 4-byte
//! inline storage; complex clusters (emoji ZWJ sequences) spill to the
//! owning buffer's overflow map.

use crate::style::{Attributes, CellStyle, Color};
use bitflags::bitflags;

bitflags! {
    /// Cell-level flags for special states.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// Grapheme overflows inline storage; check the buffer's overflow map.
        const OVERFLOW = 0b0000_0001;
        /// This cell is the continuation column of a wide character.
        const WIDE_CONTINUATION = 0b0000_0010;
    }
}

impl std::fmt::Debug for CellFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A single frame cell: one grapheme plus its resolved visual style.
#[derive(Clone, Copy)]
pub struct Cell {
    /// Inline grapheme storage (UTF-8 bytes). For overflowed graphemes
    /// this holds a little-endian u32 index into the buffer's overflow map.
    grapheme: [u8; 4],
    /// Byte length of the inline grapheme (0 when overflowed).
    grapheme_len: u8,
    /// Display width (0 = continuation, 1 = normal, 2 = wide).
    display_width: u8,
    /// Foreground color, terminal default when `None`.
    fg: Option<Color>,
    /// Background color, terminal default when `None`.
    bg: Option<Color>,
    /// Text attributes.
    attrs: Attributes,
    /// Cell flags.
    flags: CellFlags,
}

// Four cells per cache line; the diff pass depends on this staying small.
const _: () = assert!(std::mem::size_of::<Cell>() == 16);

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell: a space with terminal-default style.
    pub const EMPTY: Self = Self {
        grapheme: [b' ', 0, 0, 0],
        grapheme_len: 1,
        display_width: 1,
        fg: None,
        bg: None,
        attrs: Attributes::empty(),
        flags: CellFlags::empty(),
    };

    /// Create an unstyled cell from a character.
    pub fn from_char(c: char) -> Self {
        let mut grapheme = [0u8; 4];
        let len = c.encode_utf8(&mut grapheme).len() as u8;
        let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0) as u8;
        Self {
            grapheme,
            grapheme_len: len,
            display_width: width,
            fg: None,
            bg: None,
            attrs: Attributes::empty(),
            flags: CellFlags::empty(),
        }
    }

    /// Create a cell from a grapheme cluster, if it fits inline.
    ///
    /// Returns `None` when the cluster exceeds 4 bytes; the caller stores
    /// it in overflow storage instead.
    pub fn from_grapheme(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > 4 {
            return None;
        }
        let mut grapheme = [0u8; 4];
        grapheme[..bytes.len()].copy_from_slice(bytes);
        let width = unicode_width::UnicodeWidthStr::width(s) as u8;
        Some(Self {
            grapheme,
            grapheme_len: bytes.len() as u8,
            display_width: width,
            fg: None,
            bg: None,
            attrs: Attributes::empty(),
            flags: CellFlags::empty(),
        })
    }

    /// Create an overflow cell holding an index into external storage.
    pub const fn overflow(index: u32, display_width: u8) -> Self {
        Self {
            grapheme: index.to_le_bytes(),
            grapheme_len: 0,
            display_width,
            fg: None,
            bg: None,
            attrs: Attributes::empty(),
            flags: CellFlags::OVERFLOW,
        }
    }

    /// Create a wide-character continuation cell.
    pub const fn wide_continuation() -> Self {
        Self {
            grapheme: [0, 0, 0, 0],
            grapheme_len: 0,
            display_width: 0,
            fg: None,
            bg: None,
            attrs: Attributes::empty(),
            flags: CellFlags::WIDE_CONTINUATION,
        }
    }

    /// The inline grapheme, or `None` for overflow cells.
    #[allow(unsafe_code)]
    pub fn grapheme(&self) -> Option<&str> {
        if self.flags.contains(CellFlags::OVERFLOW) {
            return None;
        }
        // SAFETY: only valid UTF-8 is stored in the inline bytes.
        Some(unsafe { std::str::from_utf8_unchecked(&self.grapheme[..self.grapheme_len as usize]) })
    }

    /// The overflow index, when this is an overflow cell.
    pub const fn overflow_index(&self) -> Option<u32> {
        if self.flags.contains(CellFlags::OVERFLOW) {
            Some(u32::from_le_bytes(self.grapheme))
        } else {
            None
        }
    }

    /// Check whether this cell spills to overflow storage.
    #[inline]
    pub const fn is_overflow(&self) -> bool {
        self.flags.contains(CellFlags::OVERFLOW)
    }

    /// The raw cell flags.
    #[inline]
    pub const fn flags(&self) -> CellFlags {
        self.flags
    }

    /// Check whether this cell continues a wide character.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CONTINUATION)
    }

    /// Display width (0, 1, or 2).
    #[inline]
    pub const fn display_width(&self) -> u8 {
        self.display_width
    }

    /// The visual style of this cell.
    #[inline]
    pub const fn style(&self) -> CellStyle {
        CellStyle {
            fg: self.fg,
            bg: self.bg,
            attrs: self.attrs,
        }
    }

    /// The background color.
    #[inline]
    pub const fn bg(&self) -> Option<Color> {
        self.bg
    }

    /// Set the visual style (builder pattern).
    #[must_use]
    pub const fn with_style(mut self, style: CellStyle) -> Self {
        self.fg = style.fg;
        self.bg = style.bg;
        self.attrs = style.attrs;
        self
    }

    /// Set the foreground (builder pattern).
    #[must_use]
    pub const fn with_fg(mut self, fg: Option<Color>) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background (builder pattern).
    #[must_use]
    pub const fn with_bg(mut self, bg: Option<Color>) -> Self {
        self.bg = bg;
        self
    }
}

impl PartialEq for Cell {
    /// Compare in order of most likely difference: grapheme bytes first,
    /// then colors, then the rarely-differing attribute and flag bytes.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.grapheme == other.grapheme
            && self.grapheme_len == other.grapheme_len
            && self.fg == other.fg
            && self.bg == other.bg
            && self.attrs == other.attrs
            && self.flags == other.flags
            && self.display_width == other.display_width
    }
}

impl Eq for Cell {}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("grapheme", &self.grapheme().unwrap_or("<overflow>"))
            .field("width", &self.display_width)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("attrs", &self.attrs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(std::mem::size_of::<Cell>(), 16);
    }

    #[test]
    fn test_from_char_ascii() {
        let cell = Cell::from_char('A');
        assert_eq!(cell.grapheme(), Some("A"));
        assert_eq!(cell.display_width(), 1);
    }

    #[test]
    fn test_from_char_wide() {
        let cell = Cell::from_char('日');
        assert_eq!(cell.grapheme(), Some("日"));
        assert_eq!(cell.display_width(), 2);
    }

    #[test]
    fn test_from_grapheme_overflow() {
        assert!(Cell::from_grapheme("👨‍👩‍👧").is_none());
        let cell = Cell::overflow(7, 2);
        assert!(cell.is_overflow());
        assert_eq!(cell.overflow_index(), Some(7));
        assert_eq!(cell.grapheme(), None);
    }

    #[test]
    fn test_style_roundtrip() {
        let style = CellStyle {
            fg: Some(Color::Ansi(1)),
            bg: Some(Color::Rgb(0, 0, 255)),
            attrs: Attributes::BOLD | Attributes::ITALIC,
        };
        let cell = Cell::from_char('X').with_style(style);
        assert_eq!(cell.style(), style);
    }

    #[test]
    fn test_equality_tracks_style() {
        let a = Cell::from_char('A').with_fg(Some(Color::Ansi(1)));
        let b = Cell::from_char('A').with_fg(Some(Color::Ansi(1)));
        let c = Cell::from_char('A').with_fg(Some(Color::Ansi(2)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_wide_continuation() {
        let cont = Cell::wide_continuation();
        assert!(cont.is_wide_continuation());
        assert_eq!(cont.display_width(), 0);
    }
}
