//! SGR engine: translate style transitions into escape sequences.
//!
//! Attribute open/close codes are composed in a fixed outer-to-inner
//! order; closes are emitted in the reverse order so concurrent
//! attributes never clobber each other. Colors close with the default
//! foreground/background codes (39/49) rather than a full reset, so
//! unrelated attributes survive a color change.

use super::{Attributes, CellStyle, Color};
use std::io::Write;

/// Attribute open/close SGR pairs, in composition (outer-to-inner) order.
///
/// Bold and dim share close code 22; [`SgrState::transition`] re-opens the
/// survivor when only one of the pair closes.
const ATTR_CODES: [(Attributes, u8, u8); 6] = [
    (Attributes::BOLD, 1, 22),
    (Attributes::DIM, 2, 22),
    (Attributes::ITALIC, 3, 23),
    (Attributes::UNDERLINE, 4, 24),
    (Attributes::INVERSE, 7, 27),
    (Attributes::STRIKETHROUGH, 9, 29),
];

/// Write the SGR open sequences for `attrs`, in composition order.
pub fn open_attributes(out: &mut Vec<u8>, attrs: Attributes) {
    for (flag, open, _) in ATTR_CODES {
        if attrs.contains(flag) {
            let _ = write!(out, "\x1b[{open}m");
        }
    }
}

/// Write the SGR close sequences for `attrs`, in reverse composition
/// order. A close code shared by two attributes is emitted once.
pub fn close_attributes(out: &mut Vec<u8>, attrs: Attributes) {
    let mut last_close = 0u8;
    for (flag, _, close) in ATTR_CODES.iter().rev() {
        if attrs.contains(*flag) && *close != last_close {
            let _ = write!(out, "\x1b[{close}m");
            last_close = *close;
        }
    }
}

/// Write the foreground open sequence for a color.
pub fn open_fg(out: &mut Vec<u8>, color: Color) {
    match color {
        Color::Ansi(n) if n < 8 => {
            let _ = write!(out, "\x1b[{}m", 30 + u16::from(n));
        }
        Color::Ansi(n) => {
            let _ = write!(out, "\x1b[{}m", 90 + u16::from(n & 0x7));
        }
        Color::Indexed(n) => {
            let _ = write!(out, "\x1b[38;5;{n}m");
        }
        Color::Rgb(r, g, b) => {
            let _ = write!(out, "\x1b[38;2;{r};{g};{b}m");
        }
    }
}

/// Write the background open sequence for a color.
pub fn open_bg(out: &mut Vec<u8>, color: Color) {
    match color {
        Color::Ansi(n) if n < 8 => {
            let _ = write!(out, "\x1b[{}m", 40 + u16::from(n));
        }
        Color::Ansi(n) => {
            let _ = write!(out, "\x1b[{}m", 100 + u16::from(n & 0x7));
        }
        Color::Indexed(n) => {
            let _ = write!(out, "\x1b[48;5;{n}m");
        }
        Color::Rgb(r, g, b) => {
            let _ = write!(out, "\x1b[48;2;{r};{g};{b}m");
        }
    }
}

/// Restore the default foreground.
#[inline]
pub fn close_fg(out: &mut Vec<u8>) {
    out.extend_from_slice(b"\x1b[39m");
}

/// Restore the default background.
#[inline]
pub fn close_bg(out: &mut Vec<u8>) {
    out.extend_from_slice(b"\x1b[49m");
}

/// Reset all attributes and colors.
#[inline]
pub fn reset_all(out: &mut Vec<u8>) {
    out.extend_from_slice(b"\x1b[0m");
}

/// Tracks the style currently active on the terminal during emission.
///
/// Open/close sequences are written only on actual transitions, keeping
/// the emitted byte volume minimal.
#[derive(Clone, Debug, Default)]
pub struct SgrState {
    active: CellStyle,
}

impl SgrState {
    /// A state with nothing active (terminal defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active style.
    #[inline]
    pub fn active(&self) -> CellStyle {
        self.active
    }

    /// Emit the minimal sequences transforming the active style into
    /// `next`.
    pub fn transition(&mut self, next: CellStyle, out: &mut Vec<u8>) {
        if next == self.active {
            return;
        }

        let removed = self.active.attrs.difference(next.attrs);
        let mut added = next.attrs.difference(self.active.attrs);

        if !removed.is_empty() {
            close_attributes(out, removed);
            // Code 22 clears bold and dim together; re-open the survivor.
            let bold_dim = Attributes::BOLD | Attributes::DIM;
            if removed.intersects(bold_dim) {
                added |= next.attrs.intersection(bold_dim);
            }
        }

        if next.fg != self.active.fg {
            match next.fg {
                Some(color) => open_fg(out, color),
                None => close_fg(out),
            }
        }
        if next.bg != self.active.bg {
            match next.bg {
                Some(color) => open_bg(out, color),
                None => close_bg(out),
            }
        }

        open_attributes(out, added);
        self.active = next;
    }

    /// Reset the terminal to defaults if anything is active.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        if !self.active.is_plain() {
            reset_all(out);
            self.active = CellStyle::PLAIN;
        }
    }

    /// Forget the tracked state without emitting anything, e.g. after a
    /// sequence that implicitly reset the terminal.
    pub fn invalidate(&mut self) {
        self.active = CellStyle::PLAIN;
    }
}
