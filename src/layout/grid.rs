//! Grid positioning: template tracks, placement, and fr distribution.
//!
//! Templates are parsed from whitespace-separated tokens: a bare number
//! is a fixed track, `auto` sizes to content, `Nfr` takes a weighted
//! share of the leftover space. Malformed tokens degrade to `auto`.
//!
//! Items with an explicit column/row are placed first; the remainder
//! auto-place into the first unoccupied slot in template order, expanding
//! the implicit track count when nothing fits. An explicit placement that
//! resolves entirely outside the content box collapses to zero bounds:
//! it is skipped, never fatal.

use super::measure::{measure, MeasurePass};
use super::{Bounds, Constraints, Size};
use crate::style::AutoFlow;
use crate::tree::{NodeId, Tree};
use std::collections::HashSet;

/// One template track.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Track {
    /// Fixed size in cells.
    Fixed(u16),
    /// Sized to the largest single-span item in the track.
    Auto,
    /// Weighted share of the leftover space.
    Fr(u16),
}

/// Parse a track template such as `"10 auto 1fr"`.
pub fn parse_template(input: &str) -> Vec<Track> {
    input.split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Track {
    let token = token.to_ascii_lowercase();
    if token == "auto" {
        return Track::Auto;
    }
    if let Some(weight) = token.strip_suffix("fr") {
        if weight.is_empty() {
            return Track::Fr(1);
        }
        return weight.parse().map_or(Track::Auto, Track::Fr);
    }
    token.parse().map_or(Track::Auto, Track::Fixed)
}

/// A placed grid item.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GridCell {
    pub node: NodeId,
    pub column: u16,
    pub row: u16,
    pub column_span: u16,
    pub row_span: u16,
}

struct Placement {
    cells: Vec<GridCell>,
    columns: u16,
    rows: u16,
}

/// Place all children: explicit positions first, then auto-placement in
/// `auto_flow` order.
fn place_items(tree: &Tree, parent: NodeId) -> Placement {
    let style = &tree.node(parent).style;
    let mut columns = (style.template_columns.len() as u16).max(1);
    let mut rows = (style.template_rows.len() as u16).max(1);
    let mut occupied: HashSet<(u16, u16)> = HashSet::new();
    let mut cells = Vec::new();
    let mut auto_items = Vec::new();

    for &child in tree.children(parent) {
        let child_style = &tree.node(child).style;
        let column_span = child_style.column_span.max(1);
        let row_span = child_style.row_span.max(1);
        if child_style.column.is_some() || child_style.row.is_some() {
            let column = child_style.column.unwrap_or(0);
            let row = child_style.row.unwrap_or(0);
            columns = columns.max(column.saturating_add(column_span));
            rows = rows.max(row.saturating_add(row_span));
            occupy(&mut occupied, column, row, column_span, row_span);
            cells.push(GridCell { node: child, column, row, column_span, row_span });
        } else {
            auto_items.push((child, column_span, row_span));
        }
    }

    for (node, column_span, row_span) in auto_items {
        let (column, row) = match style.auto_flow {
            AutoFlow::Row => {
                columns = columns.max(column_span);
                let mut row = 0u16;
                loop {
                    let mut found = None;
                    for column in 0..=columns - column_span {
                        if is_free(&occupied, column, row, column_span, row_span) {
                            found = Some(column);
                            break;
                        }
                    }
                    if let Some(column) = found {
                        break (column, row);
                    }
                    row = row.saturating_add(1);
                }
            }
            AutoFlow::Column => {
                rows = rows.max(row_span);
                let mut column = 0u16;
                loop {
                    let mut found = None;
                    for row in 0..=rows - row_span {
                        if is_free(&occupied, column, row, column_span, row_span) {
                            found = Some(row);
                            break;
                        }
                    }
                    if let Some(row) = found {
                        break (column, row);
                    }
                    column = column.saturating_add(1);
                }
            }
        };
        columns = columns.max(column.saturating_add(column_span));
        rows = rows.max(row.saturating_add(row_span));
        occupy(&mut occupied, column, row, column_span, row_span);
        cells.push(GridCell { node, column, row, column_span, row_span });
    }

    Placement { cells, columns, rows }
}

fn occupy(occupied: &mut HashSet<(u16, u16)>, column: u16, row: u16, cspan: u16, rspan: u16) {
    for c in column..column.saturating_add(cspan) {
        for r in row..row.saturating_add(rspan) {
            occupied.insert((c, r));
        }
    }
}

fn is_free(occupied: &HashSet<(u16, u16)>, column: u16, row: u16, cspan: u16, rspan: u16) -> bool {
    for c in column..column.saturating_add(cspan) {
        for r in row..row.saturating_add(rspan) {
            if occupied.contains(&(c, r)) {
                return false;
            }
        }
    }
    true
}

/// Per-track intrinsic sizes: the maximum natural size, in the given
/// dimension, of single-span items in that track.
fn track_intrinsics(
    tree: &Tree,
    cells: &[GridCell],
    count: u16,
    inner: Constraints,
    horizontal: bool,
    pass: &mut MeasurePass,
) -> Vec<u16> {
    let mut intrinsic = vec![0u16; count as usize];
    for cell in cells {
        let span = if horizontal { cell.column_span } else { cell.row_span };
        if span != 1 {
            continue;
        }
        let index = usize::from(if horizontal { cell.column } else { cell.row });
        if index >= intrinsic.len() {
            continue;
        }
        let measured = measure(tree, cell.node, inner, pass);
        let value = if horizontal { measured.width } else { measured.height };
        intrinsic[index] = intrinsic[index].max(value);
    }
    intrinsic
}

/// Resolve track sizes. With `available` space, fr tracks split the
/// leftover proportionally (cumulative rounding keeps the sum exact);
/// without it (intrinsic measurement) they size to content like `auto`.
fn size_tracks(
    template: &[Track],
    count: u16,
    intrinsic: &[u16],
    gap: u16,
    available: Option<u16>,
) -> Vec<u16> {
    let tracks: Vec<Track> = (0..count as usize)
        .map(|i| template.get(i).copied().unwrap_or(Track::Auto))
        .collect();

    let mut sizes = vec![0u16; tracks.len()];
    let mut fr_total: u32 = 0;
    for (i, track) in tracks.iter().enumerate() {
        match *track {
            Track::Fixed(n) => sizes[i] = n,
            Track::Auto => sizes[i] = intrinsic[i],
            Track::Fr(weight) => {
                if available.is_none() {
                    sizes[i] = intrinsic[i];
                }
                fr_total += u32::from(weight);
            }
        }
    }

    if let Some(available) = available {
        if fr_total > 0 {
            let gaps = u32::from(gap) * (u32::from(count).saturating_sub(1));
            let used: u32 = sizes.iter().map(|&s| u32::from(s)).sum::<u32>() + gaps;
            let leftover = u32::from(available).saturating_sub(used) as f32;
            let mut acc = 0.0f32;
            let mut assigned: u16 = 0;
            for (i, track) in tracks.iter().enumerate() {
                if let Track::Fr(weight) = *track {
                    acc += leftover * f32::from(weight) / fr_total as f32;
                    let end = acc.round() as u16;
                    sizes[i] = end.saturating_sub(assigned);
                    assigned = end;
                }
            }
        }
    }
    sizes
}

fn offsets(sizes: &[u16], gap: u16) -> Vec<u16> {
    let mut out = Vec::with_capacity(sizes.len());
    let mut cursor: u16 = 0;
    for (i, &size) in sizes.iter().enumerate() {
        out.push(cursor);
        cursor = cursor.saturating_add(size);
        if i + 1 < sizes.len() {
            cursor = cursor.saturating_add(gap);
        }
    }
    out
}

fn span_size(sizes: &[u16], start: u16, span: u16, gap: u16) -> u16 {
    let start = usize::from(start);
    let end = (start + usize::from(span)).min(sizes.len());
    let cells: u16 = sizes[start..end].iter().fold(0, |a, &s| a.saturating_add(s));
    cells.saturating_add(gap.saturating_mul(span.saturating_sub(1)))
}

/// Intrinsic content size of a grid container (excluding its chrome).
pub(crate) fn intrinsic_size(
    tree: &Tree,
    parent: NodeId,
    inner: Constraints,
    pass: &mut MeasurePass,
) -> Size {
    let style = &tree.node(parent).style;
    let gap = style.gap;
    let placement = place_items(tree, parent);

    let col_intrinsic =
        track_intrinsics(tree, &placement.cells, placement.columns, inner, true, pass);
    let row_intrinsic =
        track_intrinsics(tree, &placement.cells, placement.rows, inner, false, pass);
    let col_sizes = size_tracks(&style.template_columns, placement.columns, &col_intrinsic, gap, None);
    let row_sizes = size_tracks(&style.template_rows, placement.rows, &row_intrinsic, gap, None);

    Size {
        width: span_size(&col_sizes, 0, placement.columns, gap),
        height: span_size(&row_sizes, 0, placement.rows, gap),
    }
}

/// Assign bounds to the children of a grid container within its content
/// box. Children are returned in tree order.
pub(crate) fn position_children(
    tree: &Tree,
    parent: NodeId,
    content: Bounds,
    pass: &mut MeasurePass,
) -> Vec<(NodeId, Bounds)> {
    let style = &tree.node(parent).style;
    let gap = style.gap;
    let placement = place_items(tree, parent);
    if placement.cells.is_empty() {
        return Vec::new();
    }

    let inner = Constraints::loose(content.width, content.height);
    let col_intrinsic =
        track_intrinsics(tree, &placement.cells, placement.columns, inner, true, pass);
    let row_intrinsic =
        track_intrinsics(tree, &placement.cells, placement.rows, inner, false, pass);
    let col_sizes = size_tracks(
        &style.template_columns,
        placement.columns,
        &col_intrinsic,
        gap,
        Some(content.width),
    );
    let row_sizes = size_tracks(
        &style.template_rows,
        placement.rows,
        &row_intrinsic,
        gap,
        Some(content.height),
    );
    let col_offsets = offsets(&col_sizes, gap);
    let row_offsets = offsets(&row_sizes, gap);

    let mut by_cell = Vec::with_capacity(placement.cells.len());
    for cell in &placement.cells {
        let cx = col_offsets[usize::from(cell.column)];
        let cy = row_offsets[usize::from(cell.row)];
        // Placements starting beyond the content box are skipped.
        let bounds = if (cx >= content.width && content.width > 0)
            || (cy >= content.height && content.height > 0)
            || content.is_empty()
        {
            Bounds::ZERO
        } else {
            Bounds::new(
                content.x.saturating_add(cx),
                content.y.saturating_add(cy),
                span_size(&col_sizes, cell.column, cell.column_span, gap),
                span_size(&row_sizes, cell.row, cell.row_span, gap),
            )
        };
        by_cell.push((cell.node, bounds));
    }

    // Restore tree order for deterministic paint.
    let order = tree.children(parent).to_vec();
    let mut placed = Vec::with_capacity(by_cell.len());
    for id in order {
        if let Some(&(node, bounds)) = by_cell.iter().find(|(n, _)| *n == id) {
            placed.push((node, bounds));
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Display, Style};
    use crate::tree::Tree;

    fn grid(columns: &str, rows: &str, gap: u16) -> Style {
        let mut style = Style::new().with_display(Display::Grid).with_gap(gap);
        if !columns.is_empty() {
            style = style.with_template_columns(columns);
        }
        if !rows.is_empty() {
            style = style.with_template_rows(rows);
        }
        style
    }

    fn place(tree: &Tree, parent: NodeId, content: Bounds) -> Vec<Bounds> {
        let mut pass = MeasurePass::new();
        position_children(tree, parent, content, &mut pass)
            .into_iter()
            .map(|(_, b)| b)
            .collect()
    }

    #[test]
    fn test_parse_template_tokens() {
        assert_eq!(
            parse_template("10 auto 1fr fr 2fr"),
            vec![Track::Fixed(10), Track::Auto, Track::Fr(1), Track::Fr(1), Track::Fr(2)]
        );
    }

    #[test]
    fn test_parse_malformed_token_degrades_to_auto() {
        assert_eq!(parse_template("banana 1.5fr"), vec![Track::Auto, Track::Auto]);
    }

    #[test]
    fn test_fr_distribution() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, grid("1fr 2fr", "", 0));
        tree.insert_text(Some(root), "a", Style::default());
        tree.insert_text(Some(root), "b", Style::default());

        let bounds = place(&tree, root, Bounds::new(0, 0, 30, 4));
        assert_eq!(bounds[0].width, 10);
        assert_eq!(bounds[1].width, 20);
        assert_eq!(bounds[1].x, 10);
    }

    #[test]
    fn test_fixed_and_fr_share_with_gap() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, grid("4 1fr", "", 2));
        tree.insert_text(Some(root), "a", Style::default());
        tree.insert_text(Some(root), "b", Style::default());

        let bounds = place(&tree, root, Bounds::new(0, 0, 20, 4));
        assert_eq!(bounds[0].width, 4);
        // Leftover: 20 - 4 fixed - 2 gap.
        assert_eq!(bounds[1].width, 14);
        assert_eq!(bounds[1].x, 6);
    }

    #[test]
    fn test_auto_track_sizes_to_content() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, grid("auto 1fr", "", 0));
        tree.insert_text(Some(root), "abcde", Style::default());
        tree.insert_text(Some(root), "x", Style::default());

        let bounds = place(&tree, root, Bounds::new(0, 0, 20, 4));
        assert_eq!(bounds[0].width, 5);
        assert_eq!(bounds[1].width, 15);
    }

    #[test]
    fn test_auto_placement_row_major_wraps() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, grid("5 5", "", 0));
        for text in ["a", "b", "c"] {
            tree.insert_text(Some(root), text, Style::default());
        }

        let bounds = place(&tree, root, Bounds::new(0, 0, 10, 4));
        assert_eq!((bounds[0].x, bounds[0].y), (0, 0));
        assert_eq!((bounds[1].x, bounds[1].y), (5, 0));
        // Third item wraps onto an implicit second row.
        assert_eq!(bounds[2].x, 0);
        assert!(bounds[2].y > 0);
    }

    #[test]
    fn test_auto_placement_column_major() {
        let mut tree = Tree::new();
        let root = tree.insert_box(
            None,
            grid("5 5", "1 1", 0).with_auto_flow(crate::style::AutoFlow::Column),
        );
        for text in ["a", "b", "c"] {
            tree.insert_text(Some(root), text, Style::default());
        }

        let bounds = place(&tree, root, Bounds::new(0, 0, 10, 4));
        assert_eq!((bounds[0].x, bounds[0].y), (0, 0));
        assert_eq!((bounds[1].x, bounds[1].y), (0, 1));
        assert_eq!((bounds[2].x, bounds[2].y), (5, 0));
    }

    #[test]
    fn test_explicit_placement_with_span() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, grid("5 5 5", "", 0));
        tree.insert_text(
            Some(root),
            "wide",
            Style::new().with_grid_position(1, 0).with_grid_span(2, 1),
        );

        let bounds = place(&tree, root, Bounds::new(0, 0, 15, 4));
        assert_eq!(bounds[0], Bounds::new(5, 0, 10, 1));
    }

    #[test]
    fn test_auto_items_avoid_explicit_occupancy() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, grid("5 5", "", 0));
        tree.insert_text(Some(root), "pinned", Style::new().with_grid_position(0, 0));
        tree.insert_text(Some(root), "auto", Style::default());

        let bounds = place(&tree, root, Bounds::new(0, 0, 10, 4));
        // The auto item lands in the first free slot: column 1.
        assert_eq!(bounds[1].x, 5);
        assert_eq!(bounds[1].y, 0);
    }

    #[test]
    fn test_out_of_bounds_placement_is_skipped() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, grid("10 10 10", "", 0));
        tree.insert_text(Some(root), "far", Style::new().with_grid_position(2, 0));

        // Content box only 12 wide: track 2 starts at 20, beyond it.
        let bounds = place(&tree, root, Bounds::new(0, 0, 12, 4));
        assert!(bounds[0].is_empty());
    }

    #[test]
    fn test_span_expands_track_count() {
        let mut tree = Tree::new();
        let root = tree.insert_box(None, grid("3", "", 0));
        tree.insert_text(Some(root), "wide", Style::new().with_grid_span(2, 1));

        let mut pass = MeasurePass::new();
        let size = intrinsic_size(&tree, root, Constraints::none(), &mut pass);
        // Track 0 fixed at 3, implicit track 1 is auto (content-less).
        assert_eq!(size.width, 3);
    }
}
