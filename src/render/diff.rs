//! Diff emission: minimal escape sequences between two frames.
//!
//! The region path walks each dirty rectangle row by row: rows with no
//! cell differences are skipped outright; otherwise one cursor-position
//! command is emitted for the contiguous changed span, followed by the
//! span's characters with style sequences only on actual transitions.
//! All output accumulates in one byte buffer and reaches the sink in a
//! single write.

use crate::buffer::{Buffer, Cell};
use crate::layout::Bounds;
use crate::style::sgr::SgrState;
use std::io::Write;

/// Statistics for one emission (observational only).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitStats {
    /// Cells written to the output.
    pub cells_written: usize,
    /// Cursor position commands emitted.
    pub cursor_moves: usize,
    /// Style transitions emitted.
    pub style_transitions: usize,
}

/// Move the cursor to the home position.
#[inline]
pub(crate) fn cursor_home(out: &mut Vec<u8>) {
    out.extend_from_slice(b"\x1b[H");
}

/// Move the cursor to a 0-indexed cell, using the most compact form.
pub(crate) fn cursor_to(out: &mut Vec<u8>, x: u16, y: u16) {
    let row = u32::from(y) + 1;
    let col = u32::from(x) + 1;
    if row == 1 && col == 1 {
        out.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(out, "\x1b[{row}H");
    } else {
        let _ = write!(out, "\x1b[{row};{col}H");
    }
}

/// Clear the cursor's line.
#[inline]
pub(crate) fn clear_line(out: &mut Vec<u8>) {
    out.extend_from_slice(b"\x1b[2K");
}

/// Emit one cell's grapheme, resolving overflow storage; gaps become
/// spaces.
fn emit_grapheme(out: &mut Vec<u8>, cell: &Cell, buffer: &Buffer) {
    if let Some(index) = cell.overflow_index() {
        if let Some(grapheme) = buffer.get_overflow(index) {
            out.extend_from_slice(grapheme.as_bytes());
            return;
        }
        out.push(b' ');
    } else if let Some(grapheme) = cell.grapheme() {
        out.extend_from_slice(if grapheme.is_empty() { b" " } else { grapheme.as_bytes() });
    } else {
        out.push(b' ');
    }
}

/// Emit a styled run of cells from `start` through `last` on row `y`.
fn emit_span(
    current: &Buffer,
    y: u16,
    start: u16,
    last: u16,
    out: &mut Vec<u8>,
    sgr: &mut SgrState,
    stats: &mut EmitStats,
) {
    cursor_to(out, start, y);
    stats.cursor_moves += 1;

    let mut x = start;
    while x <= last {
        let Some(cell) = current.get(x, y) else {
            break;
        };
        if cell.is_wide_continuation() {
            x += 1;
            continue;
        }
        if cell.style() != sgr.active() {
            stats.style_transitions += 1;
            sgr.transition(cell.style(), out);
        }
        emit_grapheme(out, cell, current);
        stats.cells_written += 1;
        x += u16::from(cell.display_width().max(1));
    }
}

/// Emit the minimal update transforming `previous` into `current` within
/// the given dirty regions (already viewport-clipped and sorted).
pub(crate) fn emit_regions(
    previous: &Buffer,
    current: &Buffer,
    regions: &[Bounds],
    out: &mut Vec<u8>,
) -> EmitStats {
    debug_assert_eq!(previous.width(), current.width());
    debug_assert_eq!(previous.height(), current.height());

    let mut stats = EmitStats::default();
    let mut sgr = SgrState::new();

    for region in regions {
        let x_end = region.right().min(current.width());
        let y_end = region.bottom().min(current.height());
        for y in region.y..y_end {
            // Contiguous changed column span; rows without differences
            // (including cells that now need clearing) are skipped.
            let mut first: Option<u16> = None;
            let mut last: u16 = 0;
            for x in region.x..x_end {
                if previous.get(x, y) != current.get(x, y) {
                    if first.is_none() {
                        first = Some(x);
                    }
                    last = x;
                }
            }
            let Some(mut start) = first else {
                continue;
            };
            // Never start emission on the tail of a wide glyph.
            while start > region.x
                && current.get(start, y).is_some_and(Cell::is_wide_continuation)
            {
                start -= 1;
            }
            emit_span(current, y, start, last, out, &mut sgr, &mut stats);
        }
    }

    sgr.finish(out);
    stats
}

/// Emit a full-screen repaint of `current`: cursor home, then per row a
/// move-to-line, clear-line, and a style-aware run with trailing blank
/// cells elided; the style resets at each line end.
pub(crate) fn emit_full(current: &Buffer, out: &mut Vec<u8>) -> EmitStats {
    let mut stats = EmitStats::default();
    let mut sgr = SgrState::new();

    cursor_home(out);
    for y in 0..current.height() {
        cursor_to(out, 0, y);
        clear_line(out);
        stats.cursor_moves += 1;

        let mut last = None;
        for x in (0..current.width()).rev() {
            if current.get(x, y).is_some_and(|cell| *cell != Cell::EMPTY) {
                last = Some(x);
                break;
            }
        }
        let Some(last) = last else {
            continue;
        };

        let mut x = 0;
        while x <= last {
            let Some(cell) = current.get(x, y) else {
                break;
            };
            if cell.is_wide_continuation() {
                x += 1;
                continue;
            }
            if cell.style() != sgr.active() {
                stats.style_transitions += 1;
                sgr.transition(cell.style(), out);
            }
            emit_grapheme(out, cell, current);
            stats.cells_written += 1;
            x += u16::from(cell.display_width().max(1));
        }
        sgr.finish(out);
    }
    stats
}
