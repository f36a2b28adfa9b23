//! Paint pass: draw the committed tree into a cell buffer.
//!
//! Painting is top-down. A box fills its background, draws its border
//! glyphs, then recurses into children with the clip narrowed to its
//! content rectangle. Clipping operates per cell: a subtree is never
//! rejected wholesale, only the cells that fall outside the clip chain
//! are dropped.

use crate::buffer::{Buffer, Cell};
use crate::layout::{content_box, Bounds};
use crate::style::{BorderGlyphs, CellStyle};
use crate::tree::{NodeId, NodeKind, Tree};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Paint a whole tree into `buffer`.
pub(crate) fn paint_tree(tree: &Tree, buffer: &mut Buffer) {
    let Some(root) = tree.root() else {
        return;
    };
    let clip = Bounds::from_size(buffer.width(), buffer.height());
    paint_node(tree, root, buffer, clip);
}

fn paint_node(tree: &Tree, id: NodeId, buffer: &mut Buffer, clip: Bounds) {
    if clip.is_empty() {
        return;
    }
    let node = tree.node(id);
    let bounds = node.layout;

    match &node.kind {
        NodeKind::Box { children } => {
            let style = &node.style;
            if style.bg.is_some() {
                let fill = bounds.intersection(&clip);
                buffer.fill_rect(
                    fill.x,
                    fill.y,
                    fill.width,
                    fill.height,
                    Cell::EMPTY.with_bg(style.bg),
                );
            }
            if let Some(glyphs) = style.border.glyphs() {
                draw_border(buffer, bounds, glyphs, style.cell_style(), clip);
            }
            let child_clip = clip.intersection(&content_box(style, bounds));
            for &child in children {
                paint_node(tree, child, buffer, child_clip);
            }
        }
        NodeKind::Text { content } => {
            let clip = clip.intersection(&bounds);
            if clip.is_empty() {
                return;
            }
            paint_text(buffer, content, bounds, node.style.cell_style(), clip);
        }
    }
}

/// Write a text run, split on line breaks, clipped per cell.
fn paint_text(buffer: &mut Buffer, content: &str, bounds: Bounds, style: CellStyle, clip: Bounds) {
    for (line_index, line) in content.split('\n').enumerate() {
        let Ok(offset) = u16::try_from(line_index) else {
            break;
        };
        let y = bounds.y.saturating_add(offset);
        if y < clip.y {
            continue;
        }
        if y >= clip.bottom() {
            break;
        }

        let mut x = bounds.x;
        for grapheme in line.graphemes(true) {
            let width = u16::try_from(UnicodeWidthStr::width(grapheme)).unwrap_or(0);
            if width == 0 {
                continue;
            }
            if x >= clip.right() {
                break;
            }
            let end = x.saturating_add(width);
            // A wide glyph straddling the clip edge cannot be half drawn.
            if x >= clip.x && end <= clip.right() {
                let merged = CellStyle {
                    fg: style.fg,
                    bg: style.bg.or(buffer.get(x, y).and_then(Cell::bg)),
                    attrs: style.attrs,
                };
                buffer.set_grapheme(x, y, grapheme, merged);
            }
            x = end;
        }
    }
}

/// Draw the eight border glyphs around `bounds`, clipped per cell.
fn draw_border(
    buffer: &mut Buffer,
    bounds: Bounds,
    glyphs: &BorderGlyphs,
    style: CellStyle,
    clip: Bounds,
) {
    if bounds.is_empty() {
        return;
    }
    let left = bounds.x;
    let top = bounds.y;
    let right = bounds.right() - 1;
    let bottom = bounds.bottom() - 1;

    let mut put = |x: u16, y: u16, glyph: char| {
        if clip.contains(x, y) {
            buffer.set(x, y, Cell::from_char(glyph).with_style(style));
        }
    };

    for x in (left + 1)..right {
        put(x, top, glyphs.top);
        put(x, bottom, glyphs.bottom);
    }
    for y in (top + 1)..bottom {
        put(left, y, glyphs.left);
        put(right, y, glyphs.right);
    }
    put(left, top, glyphs.top_left);
    put(right, top, glyphs.top_right);
    put(left, bottom, glyphs.bottom_left);
    put(right, bottom, glyphs.bottom_right);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty::DirtyTracker;
    use crate::layout::commit;
    use crate::style::{BorderKind, Color, Style};
    use crate::tree::Tree;

    fn render_to_lines(tree: &mut Tree, width: u16, height: u16) -> Vec<String> {
        let mut tracker = DirtyTracker::new(width, height);
        commit(tree, (width, height), &mut tracker);
        let mut buffer = Buffer::new(width, height);
        paint_tree(tree, &mut buffer);
        buffer.to_lines()
    }

    #[test]
    fn test_bordered_box_with_text() {
        let mut tree = Tree::new();
        let root = tree.insert_box(
            None,
            Style::new()
                .with_width(10)
                .with_height(3)
                .with_border(BorderKind::Single),
        );
        tree.insert_text(Some(root), "Hi", Style::default());

        let lines = render_to_lines(&mut tree, 10, 3);
        assert_eq!(lines, vec!["┌────────┐", "│Hi      │", "└────────┘"]);
    }

    #[test]
    fn test_background_fill_covers_box() {
        let mut tree = Tree::new();
        tree.insert_box(
            None,
            Style::new()
                .with_width(4)
                .with_height(2)
                .with_bg(Color::Ansi(4)),
        );

        let mut tracker = DirtyTracker::new(6, 3);
        let mut tree2 = tree;
        commit(&mut tree2, (6, 3), &mut tracker);
        let mut buffer = Buffer::new(6, 3);
        paint_tree(&tree2, &mut buffer);

        assert_eq!(buffer.get(0, 0).unwrap().bg(), Some(Color::Ansi(4)));
        assert_eq!(buffer.get(3, 1).unwrap().bg(), Some(Color::Ansi(4)));
        assert_eq!(buffer.get(4, 0).unwrap().bg(), None);
        assert_eq!(buffer.get(0, 2).unwrap().bg(), None);
    }

    #[test]
    fn test_text_inherits_painted_background() {
        let mut tree = Tree::new();
        let root = tree.insert_box(
            None,
            Style::new()
                .with_width(6)
                .with_height(1)
                .with_bg(Color::Ansi(2)),
        );
        tree.insert_text(Some(root), "ok", Style::new().with_fg(Color::Ansi(0)));

        let mut tracker = DirtyTracker::new(6, 1);
        commit(&mut tree, (6, 1), &mut tracker);
        let mut buffer = Buffer::new(6, 1);
        paint_tree(&tree, &mut buffer);

        let cell = buffer.get(0, 0).unwrap();
        assert_eq!(cell.grapheme(), Some("o"));
        assert_eq!(cell.bg(), Some(Color::Ansi(2)));
        assert_eq!(cell.style().fg, Some(Color::Ansi(0)));
    }

    #[test]
    fn test_text_clipped_to_parent_content() {
        let mut tree = Tree::new();
        let root = tree.insert_box(
            None,
            Style::new()
                .with_width(6)
                .with_height(3)
                .with_border(BorderKind::Single),
        );
        tree.insert_text(Some(root), "overflowing", Style::default());

        let lines = render_to_lines(&mut tree, 6, 3);
        // Glyphs past the content rect are dropped cell by cell.
        assert_eq!(lines[1], "│over│");
    }

    #[test]
    fn test_multiline_text_splits_on_newline() {
        let mut tree = Tree::new();
        tree.insert_text(None, "ab\ncd", Style::default());

        let lines = render_to_lines(&mut tree, 4, 2);
        assert_eq!(lines, vec!["ab  ", "cd  "]);
    }

    #[test]
    fn test_wide_glyph_not_half_clipped() {
        let mut tree = Tree::new();
        tree.insert_text(None, "a日b", Style::default());

        // Clip to 2 columns: the wide glyph would straddle the edge.
        let lines = render_to_lines(&mut tree, 2, 1);
        assert_eq!(lines[0], "a ");
    }

    #[test]
    fn test_nested_boxes_clip_transitively() {
        let mut tree = Tree::new();
        let outer = tree.insert_box(
            None,
            Style::new().with_width(4).with_height(2),
        );
        let inner = tree.insert_box(Some(outer), Style::new().with_width(10).with_height(10));
        tree.insert_text(Some(inner), "xxxxxxxxxx", Style::default());

        let lines = render_to_lines(&mut tree, 8, 4);
        assert_eq!(lines[0], "xxxx    ");
        assert_eq!(lines[2], "        ");
    }
}
