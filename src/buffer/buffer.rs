//! Buffer: a grid of cells representing one full frame.
//!
//! Cells are stored contiguously in row-major order. Graphemes wider than
//! the inline cell storage live in a per-buffer overflow map, referenced
//! by index from the cell.

use super::cell::{Cell, CellFlags};
use crate::style::CellStyle;
use std::collections::HashMap;

/// A grid of cells with dimensions equal to the viewport.
///
/// Zero-dimension buffers are valid (a viewport may be 0 in either axis);
/// every accessor degrades to a no-op on them.
#[derive(Clone, Debug)]
pub struct Buffer {
    /// Contiguous cell storage, row-major.
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
    /// Overflow storage for graphemes that do not fit a cell inline.
    overflow: HashMap<u32, String>,
    /// Next overflow index to assign.
    next_overflow_index: u32,
}

impl Buffer {
    /// Create a buffer with all cells empty.
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
            overflow: HashMap::new(),
            next_overflow_index: 0,
        }
    }

    /// Buffer width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether the buffer covers no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) to a linear index, if in bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// The cell at (x, y), if in bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set the cell at (x, y). Out-of-bounds writes are dropped.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Write a grapheme at (x, y) with a style, spilling to overflow
    /// storage when it does not fit a cell inline and placing a
    /// continuation cell after wide characters.
    ///
    /// Returns the display width written, or 0 when out of bounds.
    pub fn set_grapheme(&mut self, x: u16, y: u16, grapheme: &str, style: CellStyle) -> u8 {
        let Some(idx) = self.index_of(x, y) else {
            return 0;
        };

        let cell = if let Some(cell) = Cell::from_grapheme(grapheme) {
            cell.with_style(style)
        } else {
            let width = unicode_width::UnicodeWidthStr::width(grapheme) as u8;
            let overflow_idx = self.next_overflow_index;
            self.next_overflow_index += 1;
            self.overflow.insert(overflow_idx, grapheme.to_string());
            Cell::overflow(overflow_idx, width).with_style(style)
        };

        let width = cell.display_width();
        self.cells[idx] = cell;

        if width == 2 {
            if let Some(next_idx) = self.index_of(x + 1, y) {
                self.cells[next_idx] = Cell::wide_continuation().with_bg(style.bg);
            }
        }
        width
    }

    /// The grapheme at (x, y), following overflow indirection. `None` for
    /// out-of-bounds or continuation cells.
    pub fn get_grapheme(&self, x: u16, y: u16) -> Option<&str> {
        let cell = self.get(x, y)?;
        if cell.is_wide_continuation() {
            return None;
        }
        if cell.flags().contains(CellFlags::OVERFLOW) {
            self.overflow.get(&cell.overflow_index()?).map(String::as_str)
        } else {
            cell.grapheme()
        }
    }

    /// Look up an overflow grapheme by index.
    #[inline]
    pub fn get_overflow(&self, index: u32) -> Option<&str> {
        self.overflow.get(&index).map(String::as_str)
    }

    /// Fill a rectangular region with a cell, clipped to the buffer.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, cell: Cell) {
        for row in y..y.saturating_add(height).min(self.height) {
            for col in x..x.saturating_add(width).min(self.width) {
                if let Some(idx) = self.index_of(col, row) {
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Resize, preserving overlapping content. New cells are empty.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        if new_width == self.width && new_height == self.height {
            return;
        }
        let new_size = (new_width as usize) * (new_height as usize);
        let mut new_cells = vec![Cell::EMPTY; new_size];

        let copy_width = self.width.min(new_width) as usize;
        let copy_height = self.height.min(new_height) as usize;
        for y in 0..copy_height {
            let old_start = y * (self.width as usize);
            let new_start = y * (new_width as usize);
            new_cells[new_start..new_start + copy_width]
                .copy_from_slice(&self.cells[old_start..old_start + copy_width]);
        }

        self.cells = new_cells;
        self.width = new_width;
        self.height = new_height;
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Render the buffer as plain text lines, one string per row.
    ///
    /// Styles are ignored; overflow graphemes are resolved. Intended for
    /// tests and debugging.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.height as usize);
        for y in 0..self.height {
            let mut line = String::with_capacity(self.width as usize);
            for x in 0..self.width {
                if let Some(cell) = self.get(x, y) {
                    if cell.is_wide_continuation() {
                        continue;
                    }
                    if let Some(g) = self.get_grapheme(x, y) {
                        line.push_str(g);
                    }
                }
            }
            lines.push(line);
        }
        lines
    }
}
