//! Color: terminal color forms and lenient parsing.
//!
//! Colors arrive from the tree producer as loosely-typed tokens: a named
//! keyword, a `#rrggbb` / `#rgb` hex string, a 0-255 palette index, or an
//! RGB triple. Malformed tokens degrade to "no color" rather than failing
//! the frame.

/// A terminal color in one of the three forms the SGR engine can emit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    /// One of the 16 basic ANSI colors (0-7 normal, 8-15 bright).
    Ansi(u8),
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit truecolor.
    Rgb(u8, u8, u8),
}

/// Named keywords for the 16 basic ANSI colors, index-aligned with the
/// `Ansi` payload.
const NAMED: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "brightblack",
    "brightred",
    "brightgreen",
    "brightyellow",
    "brightblue",
    "brightmagenta",
    "brightcyan",
    "brightwhite",
];

impl Color {
    /// Create a truecolor value from an RGB triple.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(r, g, b)
    }

    /// Parse a color token.
    ///
    /// Accepted forms: a named keyword (`"red"`, `"brightcyan"`, case
    /// insensitive), `#rrggbb` or `#rgb` hex, or a decimal 0-255 palette
    /// index. Returns `None` for anything else.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        if let Some(hex) = token.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        if token.bytes().all(|b| b.is_ascii_digit()) {
            return match token.parse::<u32>() {
                Ok(n) if n <= 255 => Some(Self::Indexed(n as u8)),
                _ => None,
            };
        }

        let lower = token.to_ascii_lowercase();
        let name = lower.as_str();
        // "gray" is a common alias for the dim white slot.
        let name = match name {
            "gray" | "grey" => "brightblack",
            other => other,
        };
        NAMED
            .iter()
            .position(|&n| n == name)
            .map(|i| Self::Ansi(i as u8))
    }

    /// Parse the hex digits after `#`. Three-digit shorthand expands each
    /// digit (`#f00` == `#ff0000`).
    fn parse_hex(hex: &str) -> Option<Self> {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |s: &str| channel(s).map(|n| n << 4 | n);
                Some(Self::Rgb(
                    expand(&hex[0..1])?,
                    expand(&hex[1..2])?,
                    expand(&hex[2..3])?,
                ))
            }
            _ => None,
        }
    }
}

impl From<(u8, u8, u8)> for Color {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::Rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("red"), Some(Color::Ansi(1)));
        assert_eq!(Color::parse("BrightCyan"), Some(Color::Ansi(14)));
        assert_eq!(Color::parse("gray"), Some(Color::Ansi(8)));
    }

    #[test]
    fn test_parse_hex_full() {
        assert_eq!(Color::parse("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(Color::parse("#000000"), Some(Color::Rgb(0, 0, 0)));
    }

    #[test]
    fn test_parse_hex_shorthand_expands() {
        assert_eq!(Color::parse("#f00"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(Color::parse("#abc"), Some(Color::Rgb(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn test_parse_indexed() {
        assert_eq!(Color::parse("0"), Some(Color::Indexed(0)));
        assert_eq!(Color::parse("255"), Some(Color::Indexed(255)));
        assert_eq!(Color::parse("256"), None);
    }

    #[test]
    fn test_parse_malformed_degrades() {
        assert_eq!(Color::parse(""), None);
        assert_eq!(Color::parse("#zzzzzz"), None);
        assert_eq!(Color::parse("#ff80"), None);
        assert_eq!(Color::parse("ultraviolet"), None);
        assert_eq!(Color::parse("-3"), None);
    }

    #[test]
    fn test_option_color_is_compact() {
        // The cell layout relies on the niche here; see buffer::cell.
        assert_eq!(std::mem::size_of::<Option<Color>>(), 4);
    }
}
