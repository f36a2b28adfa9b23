//! Layout module: measurement and position assignment.
//!
//! Layout runs in two passes per frame:
//! 1. **Measurement** ([`measure`]) computes intrinsic sizes under
//!    constraints, memoized per commit pass (no global state).
//! 2. **Commit** ([`commit`]) walks top-down assigning absolute [`Bounds`]
//!    to every node via the flex or grid algorithm, recording dirty
//!    regions for every node whose bounds moved or whose content changed.

mod bounds;
mod flex;
pub mod grid;
mod measure;

pub use bounds::Bounds;
pub use grid::{parse_template, Track};
pub use measure::{measure, MeasurePass};

use crate::dirty::DirtyTracker;
use crate::style::{Display, Style};
use crate::tree::{NodeId, NodeKind, Tree};

/// Extra cells marked dirty around a moved region, absorbing border and
/// overlap effects at the region's rim.
pub(crate) const DIRTY_MARGIN: u16 = 1;

/// Size constraints handed to the measurement pass.
///
/// Minimums default to zero; `None` maximums are unconstrained.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Constraints {
    /// Minimum width.
    pub min_width: u16,
    /// Maximum width, if constrained.
    pub max_width: Option<u16>,
    /// Minimum height.
    pub min_height: u16,
    /// Maximum height, if constrained.
    pub max_height: Option<u16>,
}

impl Constraints {
    /// Constraints with only maximums set.
    pub const fn loose(max_width: u16, max_height: u16) -> Self {
        Self {
            min_width: 0,
            max_width: Some(max_width),
            min_height: 0,
            max_height: Some(max_height),
        }
    }

    /// Completely unconstrained.
    pub const fn none() -> Self {
        Self {
            min_width: 0,
            max_width: None,
            min_height: 0,
            max_height: None,
        }
    }

    /// Clamp a size into these constraints (maximum wins over minimum).
    pub fn clamp(&self, size: Size) -> Size {
        let mut width = size.width.max(self.min_width);
        if let Some(max) = self.max_width {
            width = width.min(max);
        }
        let mut height = size.height.max(self.min_height);
        if let Some(max) = self.max_height {
            height = height.min(max);
        }
        Size { width, height }
    }
}

/// A measured natural size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Size {
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

/// Cells consumed on each side of a box by padding plus border.
#[inline]
pub(crate) fn edge_cells(style: &Style) -> u16 {
    style.padding + u16::from(style.border.is_some())
}

/// The content box of a node: its bounds minus padding and the one-cell
/// border offset per side, clamped to zero.
pub(crate) fn content_box(style: &Style, bounds: Bounds) -> Bounds {
    let edge = edge_cells(style);
    Bounds::new(
        bounds.x.saturating_add(edge),
        bounds.y.saturating_add(edge),
        bounds.width.saturating_sub(edge * 2),
        bounds.height.saturating_sub(edge * 2),
    )
}

/// Commit the layout for a whole tree against a viewport.
///
/// Every node's `layout` is recomputed from scratch; `previous_layout`
/// keeps the prior frame's bounds just long enough to mark both the old
/// and new regions dirty when they differ.
pub fn commit(tree: &mut Tree, viewport: (u16, u16), tracker: &mut DirtyTracker) {
    let Some(root) = tree.root() else {
        return;
    };
    let mut pass = MeasurePass::new();
    let style = &tree.node(root).style;
    let width = style.width.unwrap_or(viewport.0);
    let height = style.height.unwrap_or(viewport.1);
    commit_node(tree, root, Bounds::new(0, 0, width, height), tracker, &mut pass);
}

fn commit_node(
    tree: &mut Tree,
    id: NodeId,
    bounds: Bounds,
    tracker: &mut DirtyTracker,
    pass: &mut MeasurePass,
) {
    let node = tree.node_mut(id);
    let previous = node.previous_layout;
    let content_changed = std::mem::take(&mut node.needs_paint);
    node.layout = bounds;
    node.previous_layout = Some(bounds);

    match previous {
        Some(prev) if prev == bounds => {
            if content_changed {
                tracker.mark_region(bounds, DIRTY_MARGIN);
            }
        }
        Some(prev) => {
            tracker.mark_region(prev, DIRTY_MARGIN);
            tracker.mark_region(bounds, DIRTY_MARGIN);
        }
        None => tracker.mark_region(bounds, DIRTY_MARGIN),
    }

    let node = tree.node(id);
    if !matches!(node.kind, NodeKind::Box { .. }) {
        return;
    }
    let style = &node.style;
    let content = content_box(style, bounds);
    let placed = match style.display {
        Display::Flex => flex::position_children(tree, id, content, pass),
        Display::Grid => grid::position_children(tree, id, content, pass),
    };
    for (child, child_bounds) in placed {
        commit_node(tree, child, child_bounds, tracker, pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BorderKind;

    #[test]
    fn test_content_box_subtracts_padding_and_border() {
        let style = Style::new().with_padding(1).with_border(BorderKind::Single);
        let content = content_box(&style, Bounds::new(2, 2, 10, 8));
        assert_eq!(content, Bounds::new(4, 4, 6, 4));
    }

    #[test]
    fn test_content_box_clamps_to_zero() {
        let style = Style::new().with_padding(3);
        let content = content_box(&style, Bounds::new(0, 0, 4, 4));
        assert_eq!(content.width, 0);
        assert_eq!(content.height, 0);
    }

    #[test]
    fn test_constraints_clamp() {
        let c = Constraints {
            min_width: 5,
            max_width: Some(10),
            min_height: 0,
            max_height: Some(3),
        };
        assert_eq!(c.clamp(Size { width: 2, height: 2 }), Size { width: 5, height: 2 });
        assert_eq!(c.clamp(Size { width: 20, height: 9 }), Size { width: 10, height: 3 });
    }

    #[test]
    fn test_commit_marks_old_and_new_bounds_on_move() {
        use crate::tree::Tree;
        let mut tree = Tree::new();
        let root = tree.insert_box(None, Style::default());
        let child = tree.insert_box(
            Some(root),
            Style::new().with_width(4).with_height(2),
        );

        let mut tracker = DirtyTracker::new(40, 20);
        commit(&mut tree, (40, 20), &mut tracker);
        tracker.clear();

        // Grow the child; old and new regions must both be marked.
        tree.set_style(child, Style::new().with_width(8).with_height(2));
        commit(&mut tree, (40, 20), &mut tracker);
        assert!(tracker.len() >= 2);
    }

    #[test]
    fn test_commit_unchanged_tree_marks_nothing() {
        use crate::tree::Tree;
        let mut tree = Tree::new();
        let root = tree.insert_box(None, Style::default());
        tree.insert_text(Some(root), "hello", Style::default());

        let mut tracker = DirtyTracker::new(40, 20);
        commit(&mut tree, (40, 20), &mut tracker);
        tracker.clear();

        commit(&mut tree, (40, 20), &mut tracker);
        assert!(tracker.is_empty());
    }
}
