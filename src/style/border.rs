//! Border kinds and their glyph sets.

/// The kind of border drawn around a box.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum BorderKind {
    /// No border; the box reserves no edge cells.
    #[default]
    None,
    /// Single line (`┌─┐`).
    Single,
    /// Double line (`╔═╗`).
    Double,
    /// Rounded corners (`╭─╮`).
    Round,
    /// Heavy line (`┏━┓`).
    Bold,
    /// ASCII-only (`+-+`).
    Classic,
}

impl BorderKind {
    /// Parse a border token. Unknown tokens fall back to `Single`; only an
    /// explicit `"none"` (or empty token) yields `None`.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Self::None,
            "double" => Self::Double,
            "round" | "rounded" => Self::Round,
            "bold" | "heavy" => Self::Bold,
            "classic" | "ascii" => Self::Classic,
            _ => Self::Single,
        }
    }

    /// The glyph set for this kind; `None` reserves no glyphs.
    pub const fn glyphs(self) -> Option<&'static BorderGlyphs> {
        match self {
            Self::None => None,
            Self::Single => Some(&SINGLE),
            Self::Double => Some(&DOUBLE),
            Self::Round => Some(&ROUND),
            Self::Bold => Some(&BOLD),
            Self::Classic => Some(&CLASSIC),
        }
    }

    /// Whether this kind occupies a one-cell frame on each side.
    #[inline]
    pub const fn is_some(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// The eight glyphs of a border: four corners and four edges.
#[derive(Clone, Copy, Debug)]
pub struct BorderGlyphs {
    /// Top-left corner.
    pub top_left: char,
    /// Top edge.
    pub top: char,
    /// Top-right corner.
    pub top_right: char,
    /// Left edge.
    pub left: char,
    /// Right edge.
    pub right: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Bottom edge.
    pub bottom: char,
    /// Bottom-right corner.
    pub bottom_right: char,
}

const SINGLE: BorderGlyphs = BorderGlyphs {
    top_left: '┌',
    top: '─',
    top_right: '┐',
    left: '│',
    right: '│',
    bottom_left: '└',
    bottom: '─',
    bottom_right: '┘',
};

const DOUBLE: BorderGlyphs = BorderGlyphs {
    top_left: '╔',
    top: '═',
    top_right: '╗',
    left: '║',
    right: '║',
    bottom_left: '╚',
    bottom: '═',
    bottom_right: '╝',
};

const ROUND: BorderGlyphs = BorderGlyphs {
    top_left: '╭',
    top: '─',
    top_right: '╮',
    left: '│',
    right: '│',
    bottom_left: '╰',
    bottom: '─',
    bottom_right: '╯',
};

const BOLD: BorderGlyphs = BorderGlyphs {
    top_left: '┏',
    top: '━',
    top_right: '┓',
    left: '┃',
    right: '┃',
    bottom_left: '┗',
    bottom: '━',
    bottom_right: '┛',
};

const CLASSIC: BorderGlyphs = BorderGlyphs {
    top_left: '+',
    top: '-',
    top_right: '+',
    left: '|',
    right: '|',
    bottom_left: '+',
    bottom: '-',
    bottom_right: '+',
};
