//! Measurement pass: intrinsic sizes under constraints.
//!
//! Measurement is pure with respect to the tree: it never touches the
//! `layout` slots. Results are memoized in a [`MeasurePass`] created per
//! commit call and threaded through explicitly, so there is no hidden
//! process-wide state and passes cannot bleed into each other.

use super::{edge_cells, grid, Constraints, Size};
use crate::style::{Direction, Display};
use crate::tree::{NodeId, NodeKind, Tree};
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

/// Memoization token for one commit pass.
#[derive(Debug, Default)]
pub struct MeasurePass {
    memo: HashMap<(NodeId, Constraints), Size>,
}

impl MeasurePass {
    /// Create an empty pass token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized entries (observational).
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    /// Whether nothing has been measured yet.
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

/// Measure the natural size of a node under `constraints`.
pub fn measure(tree: &Tree, id: NodeId, constraints: Constraints, pass: &mut MeasurePass) -> Size {
    let key = (id, constraints);
    if let Some(&hit) = pass.memo.get(&key) {
        return hit;
    }

    let node = tree.node(id);
    let style = &node.style;

    let mut size = match &node.kind {
        NodeKind::Text { content } => text_size(content, constraints),
        NodeKind::Box { .. } => box_size(tree, id, constraints, pass),
    };

    if let Some(width) = style.width {
        size.width = width;
    }
    if let Some(height) = style.height {
        size.height = height;
    }
    size = style_constraints(style).clamp(size);
    size = constraints.clamp(size);

    pass.memo.insert(key, size);
    size
}

/// The node's own min/max fields as constraints.
fn style_constraints(style: &crate::style::Style) -> Constraints {
    Constraints {
        min_width: style.min_width.unwrap_or(0),
        max_width: style.max_width,
        min_height: style.min_height.unwrap_or(0),
        max_height: style.max_height,
    }
}

/// Text measures as display width by line count; a width constraint
/// narrower than the content forces greedy display-width wrapping.
fn text_size(content: &str, constraints: Constraints) -> Size {
    let mut width: u16 = 0;
    let mut lines: u16 = 0;
    for line in content.split('\n') {
        lines = lines.saturating_add(1);
        width = width.max(display_width(line));
    }
    let mut height = lines.max(1);

    if let Some(max_width) = constraints.max_width {
        if max_width > 0 && width > max_width {
            height = content
                .split('\n')
                .map(|line| display_width(line).div_ceil(max_width).max(1))
                .fold(0u16, u16::saturating_add);
            width = max_width;
        }
    }
    Size { width, height }
}

#[inline]
fn display_width(s: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(s)).unwrap_or(u16::MAX)
}

/// A box measures as the aggregate of its children under its layout mode,
/// plus padding and border chrome.
fn box_size(tree: &Tree, id: NodeId, constraints: Constraints, pass: &mut MeasurePass) -> Size {
    let style = &tree.node(id).style;
    let edge = edge_cells(style);
    let chrome = edge * 2;

    let inner = Constraints {
        min_width: 0,
        max_width: style
            .width
            .or(constraints.max_width)
            .map(|w| w.saturating_sub(chrome)),
        min_height: 0,
        max_height: style
            .height
            .or(constraints.max_height)
            .map(|h| h.saturating_sub(chrome)),
    };

    let content = match style.display {
        Display::Flex => flex_content_size(tree, id, inner, pass),
        Display::Grid => grid::intrinsic_size(tree, id, inner, pass),
    };

    Size {
        width: content.width.saturating_add(chrome),
        height: content.height.saturating_add(chrome),
    }
}

/// Flex aggregation: sum along the main axis (children, margins, gaps),
/// maximum along the cross axis.
fn flex_content_size(
    tree: &Tree,
    id: NodeId,
    inner: Constraints,
    pass: &mut MeasurePass,
) -> Size {
    let style = &tree.node(id).style;
    let is_row = style.direction == Direction::Row;
    let gap = style.gap;
    let children = tree.children(id).to_vec();

    let mut sum_main: u16 = 0;
    let mut max_cross: u16 = 0;
    for &child in &children {
        let margin2 = tree.node(child).style.margin.saturating_mul(2);
        let measured = measure(tree, child, inner, pass);
        let (main, cross) = if is_row {
            (measured.width, measured.height)
        } else {
            (measured.height, measured.width)
        };
        sum_main = sum_main.saturating_add(main).saturating_add(margin2);
        max_cross = max_cross.max(cross.saturating_add(margin2));
    }
    if let Some(gaps) = (children.len() as u16).checked_sub(1) {
        sum_main = sum_main.saturating_add(gap.saturating_mul(gaps));
    }

    if is_row {
        Size { width: sum_main, height: max_cross }
    } else {
        Size { width: max_cross, height: sum_main }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderKind, Style};
    use crate::tree::Tree;

    fn measure_root(tree: &Tree, constraints: Constraints) -> Size {
        let mut pass = MeasurePass::new();
        measure(tree, tree.root().unwrap(), constraints, &mut pass)
    }

    #[test]
    fn test_text_measures_display_width_by_lines() {
        assert_eq!(text_size("hello", Constraints::none()), Size { width: 5, height: 1 });
        assert_eq!(text_size("ab\ncdef", Constraints::none()), Size { width: 4, height: 2 });
        assert_eq!(text_size("", Constraints::none()), Size { width: 0, height: 1 });
    }

    #[test]
    fn test_text_accounts_for_wide_characters() {
        assert_eq!(text_size("日本", Constraints::none()).width, 4);
    }

    #[test]
    fn test_text_wraps_under_width_constraint() {
        let size = text_size("abcdefgh", Constraints::loose(3, 100));
        assert_eq!(size, Size { width: 3, height: 3 });
    }

    #[test]
    fn test_box_sums_children_along_main_axis() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, Style::new().with_gap(1));
        tree.insert_text(Some(root), "aa", Style::default());
        tree.insert_text(Some(root), "bbbb", Style::default());

        // Column direction: heights sum (1 + gap + 1), width is the max.
        let size = measure_root(&tree, Constraints::none());
        assert_eq!(size, Size { width: 4, height: 3 });
    }

    #[test]
    fn test_box_chrome_adds_padding_and_border() {
        let mut tree = Tree::new();
        let root = tree.insert_box(
            None,
            Style::new().with_padding(1).with_border(BorderKind::Single),
        );
        tree.insert_text(Some(root), "hi", Style::default());

        let size = measure_root(&tree, Constraints::none());
        assert_eq!(size, Size { width: 2 + 4, height: 1 + 4 });
    }

    #[test]
    fn test_explicit_size_overrides_content() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, Style::new().with_width(10).with_height(3));
        tree.insert_text(Some(root), "a much longer run of text", Style::default());

        let size = measure_root(&tree, Constraints::none());
        assert_eq!(size, Size { width: 10, height: 3 });
    }

    #[test]
    fn test_measure_is_pure_and_memoized() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, Style::default());
        tree.insert_text(Some(root), "hello", Style::default());

        let mut pass = MeasurePass::new();
        let a = measure(&tree, root, Constraints::none(), &mut pass);
        let entries = pass.len();
        let b = measure(&tree, root, Constraints::none(), &mut pass);
        assert_eq!(a, b);
        assert_eq!(pass.len(), entries);
        assert_eq!(tree.node(root).layout, crate::layout::Bounds::ZERO);
    }
}
