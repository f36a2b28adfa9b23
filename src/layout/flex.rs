//! Flex positioning: single-axis distribution with grow/shrink.
//!
//! Grow and shrink are mutually exclusive per pass, selected by the sign
//! of the available space. Fractional shares are converted to integers by
//! cumulative rounding along the main axis, so the assigned sizes always
//! sum to the space actually distributed.

use super::measure::{measure, MeasurePass};
use super::{Bounds, Constraints};
use crate::style::{Align, Direction, Justify};
use crate::tree::{NodeId, Tree};

struct FlexItem {
    id: NodeId,
    basis: u16,
    grow: u16,
    shrink: u16,
    margin: u16,
    cross: u16,
    main: f32,
}

/// Assign bounds to the children of a flex container within its content
/// box. Children are returned in tree order.
pub(crate) fn position_children(
    tree: &Tree,
    parent: NodeId,
    content: Bounds,
    pass: &mut MeasurePass,
) -> Vec<(NodeId, Bounds)> {
    let style = &tree.node(parent).style;
    let is_row = style.direction == Direction::Row;
    let gap = style.gap;
    let justify = style.justify;
    let align = style.align;

    let children = tree.children(parent).to_vec();
    if children.is_empty() {
        return Vec::new();
    }

    let (content_main, content_cross) = if is_row {
        (content.width, content.height)
    } else {
        (content.height, content.width)
    };

    // Resolve each child's flex basis and hypothetical cross size.
    let mut items: Vec<FlexItem> = Vec::with_capacity(children.len());
    for &child in &children {
        let child_style = &tree.node(child).style;
        let margin = child_style.margin;
        let inner = Constraints::loose(
            content.width.saturating_sub(margin * 2),
            content.height.saturating_sub(margin * 2),
        );
        let measured = measure(tree, child, inner, pass);
        let (natural_main, natural_cross) = if is_row {
            (measured.width, measured.height)
        } else {
            (measured.height, measured.width)
        };
        let explicit_main = if is_row { child_style.width } else { child_style.height };
        let basis = child_style.basis.or(explicit_main).unwrap_or(natural_main);

        let explicit_cross = if is_row { child_style.height } else { child_style.width };
        let cross = explicit_cross.unwrap_or(match align {
            Align::Stretch => content_cross.saturating_sub(margin * 2),
            _ => natural_cross,
        });

        items.push(FlexItem {
            id: child,
            basis,
            grow: child_style.grow,
            shrink: child_style.shrink,
            margin,
            cross,
            main: f32::from(basis),
        });
    }

    let used: i64 = items
        .iter()
        .map(|item| i64::from(item.basis) + 2 * i64::from(item.margin))
        .sum::<i64>()
        + i64::from(gap) * (items.len() as i64 - 1);
    let available = i64::from(content_main) - used;
    let total_grow: u32 = items.iter().map(|item| u32::from(item.grow)).sum();

    if available > 0 && total_grow > 0 {
        let unit = available as f32 / total_grow as f32;
        for item in &mut items {
            item.main += unit * f32::from(item.grow);
        }
    } else if available < 0 {
        let weighted: f32 = items
            .iter()
            .map(|item| f32::from(item.shrink) * f32::from(item.basis))
            .sum();
        if weighted > 0.0 {
            let ratio = (-available) as f32 / weighted;
            for item in &mut items {
                let loss = f32::from(item.shrink) * f32::from(item.basis) * ratio;
                item.main = (item.main - loss).max(0.0);
            }
        }
    }

    // Justify distributes leftover space only when no grow consumed it.
    let (lead, between) = if available > 0 && total_grow == 0 {
        let leftover = available as f32;
        let count = items.len() as f32;
        match justify {
            Justify::Start => (0.0, 0.0),
            Justify::Center => (leftover / 2.0, 0.0),
            Justify::End => (leftover, 0.0),
            Justify::Between if items.len() > 1 => (0.0, leftover / (count - 1.0)),
            Justify::Between => (0.0, 0.0),
            Justify::Around => (leftover / count / 2.0, leftover / count),
            Justify::Evenly => (leftover / (count + 1.0), leftover / (count + 1.0)),
        }
    } else {
        (0.0, 0.0)
    };

    let main_origin = if is_row { content.x } else { content.y };
    let cross_origin = if is_row { content.y } else { content.x };

    let mut placed = Vec::with_capacity(items.len());
    let mut cursor = f32::from(main_origin) + lead;
    for (index, item) in items.iter().enumerate() {
        cursor += f32::from(item.margin);
        let start = cursor.round() as u16;
        let end = (cursor + item.main).round() as u16;
        cursor += item.main + f32::from(item.margin);
        if index + 1 < items.len() {
            cursor += f32::from(gap) + between;
        }

        let child_style = &tree.node(item.id).style;
        let (min_main, max_main) = if is_row {
            (child_style.min_width, child_style.max_width)
        } else {
            (child_style.min_height, child_style.max_height)
        };
        let mut main_size = end.saturating_sub(start);
        main_size = main_size.max(min_main.unwrap_or(0));
        if let Some(max) = max_main {
            main_size = main_size.min(max);
        }

        let cross_size = item.cross;
        let cross_pos = match align {
            Align::Start | Align::Stretch => cross_origin.saturating_add(item.margin),
            Align::Center => {
                cross_origin.saturating_add(content_cross.saturating_sub(cross_size) / 2)
            }
            Align::End => cross_origin
                .saturating_add(content_cross.saturating_sub(cross_size.saturating_add(item.margin))),
        };

        let bounds = if is_row {
            Bounds::new(start, cross_pos, main_size, cross_size)
        } else {
            Bounds::new(cross_pos, start, cross_size, main_size)
        };
        placed.push((item.id, bounds));
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Display, Style};
    use crate::tree::Tree;

    fn row(gap: u16) -> Style {
        Style::new().with_direction(Direction::Row).with_gap(gap)
    }

    fn place(tree: &Tree, parent: NodeId, content: Bounds) -> Vec<Bounds> {
        let mut pass = MeasurePass::new();
        position_children(tree, parent, content, &mut pass)
            .into_iter()
            .map(|(_, b)| b)
            .collect()
    }

    #[test]
    fn test_grow_distribution_weights() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0));
        for grow in [1u16, 2, 1] {
            tree.insert_box(Some(root), Style::new().with_basis(0).with_grow(grow));
        }

        let bounds = place(&tree, root, Bounds::new(0, 0, 30, 4));
        let widths: Vec<u16> = bounds.iter().map(|b| b.width).collect();
        assert_eq!(widths.iter().sum::<u16>(), 30);
        assert!((i32::from(widths[1]) - 2 * i32::from(widths[0])).abs() <= 1);
        assert!((i32::from(widths[1]) - 2 * i32::from(widths[2])).abs() <= 1);
        // Children tile the axis with no gaps.
        assert_eq!(bounds[1].x, bounds[0].right());
        assert_eq!(bounds[2].x, bounds[1].right());
    }

    #[test]
    fn test_shrink_distribution_proportional_to_weighted_basis() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0));
        tree.insert_box(Some(root), Style::new().with_basis(20).with_shrink(1));
        tree.insert_box(Some(root), Style::new().with_basis(20).with_shrink(3));

        // 40 requested into 30: deficit 10, weighted 20 + 60.
        let bounds = place(&tree, root, Bounds::new(0, 0, 30, 4));
        let widths: Vec<u16> = bounds.iter().map(|b| b.width).collect();
        assert_eq!(widths.iter().sum::<u16>(), 30);
        assert!(widths[0] > widths[1]);
        assert_eq!(widths[0], 18);
        assert_eq!(widths[1], 12);
    }

    #[test]
    fn test_shrink_never_goes_negative() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0));
        tree.insert_box(Some(root), Style::new().with_basis(50).with_shrink(1));

        let bounds = place(&tree, root, Bounds::new(0, 0, 10, 2));
        assert_eq!(bounds[0].width, 10);
    }

    #[test]
    fn test_justify_center_offsets_run() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0).with_justify(Justify::Center));
        tree.insert_box(Some(root), Style::new().with_basis(4));
        tree.insert_box(Some(root), Style::new().with_basis(4));

        let bounds = place(&tree, root, Bounds::new(0, 0, 20, 2));
        assert_eq!(bounds[0].x, 6);
        assert_eq!(bounds[1].x, 10);
    }

    #[test]
    fn test_justify_between_spreads_children() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0).with_justify(Justify::Between));
        tree.insert_box(Some(root), Style::new().with_basis(3));
        tree.insert_box(Some(root), Style::new().with_basis(3));
        tree.insert_box(Some(root), Style::new().with_basis(3));

        let bounds = place(&tree, root, Bounds::new(0, 0, 21, 2));
        assert_eq!(bounds[0].x, 0);
        assert_eq!(bounds[2].right(), 21);
    }

    #[test]
    fn test_justify_ignored_when_grow_consumes_space() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0).with_justify(Justify::End));
        tree.insert_box(Some(root), Style::new().with_basis(0).with_grow(1));

        let bounds = place(&tree, root, Bounds::new(0, 0, 12, 2));
        assert_eq!(bounds[0], Bounds::new(0, 0, 12, 2));
    }

    #[test]
    fn test_column_direction_stacks_vertically() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, Style::new().with_gap(1));
        tree.insert_text(Some(root), "one", Style::default());
        tree.insert_text(Some(root), "two", Style::default());

        let bounds = place(&tree, root, Bounds::new(0, 0, 10, 10));
        assert_eq!(bounds[0].y, 0);
        assert_eq!(bounds[1].y, 2);
        // Default align stretches the cross axis.
        assert_eq!(bounds[0].width, 10);
    }

    #[test]
    fn test_align_center_and_end() {
        let mut tree = Tree::new();
        let root = tree.insert_box(
            None,
            row(0).with_align(Align::Center),
        );
        tree.insert_box(Some(root), Style::new().with_basis(2).with_height(2));
        let bounds = place(&tree, root, Bounds::new(0, 0, 10, 6));
        assert_eq!(bounds[0].y, 2);

        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0).with_align(Align::End));
        tree.insert_box(Some(root), Style::new().with_basis(2).with_height(2));
        let bounds = place(&tree, root, Bounds::new(0, 0, 10, 6));
        assert_eq!(bounds[0].y, 4);
    }

    #[test]
    fn test_margin_insets_child() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0));
        tree.insert_box(
            Some(root),
            Style::new().with_basis(4).with_margin(2).with_height(1),
        );

        let bounds = place(&tree, root, Bounds::new(0, 0, 20, 6));
        assert_eq!(bounds[0].x, 2);
        assert_eq!(bounds[0].y, 2);
    }

    #[test]
    fn test_nested_grid_child_participates_as_flex_item() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, row(0));
        let grid = tree.insert_box(
            Some(root),
            Style::new()
                .with_display(Display::Grid)
                .with_template_columns("3 3"),
        );
        tree.insert_text(Some(grid), "a", Style::default());
        tree.insert_text(Some(grid), "b", Style::default());

        let bounds = place(&tree, root, Bounds::new(0, 0, 20, 4));
        // Intrinsic width of the grid: two fixed 3-cell tracks.
        assert_eq!(bounds[0].width, 6);
    }
}
