//! Style module: node styling and its translation to escape sequences.
//!
//! This module contains:
//! - [`Style`]: the full per-node style (visual + box model + flex + grid)
//! - [`CellStyle`]: the resolved visual subset a painted cell carries
//! - [`Color`]: color forms and lenient parsing
//! - [`Attributes`]: text attribute bitflags
//! - [`BorderKind`]: border glyph sets
//! - [`sgr`]: SGR open/close composition and active-style tracking

mod border;
mod color;
pub mod sgr;

pub use border::{BorderGlyphs, BorderKind};
pub use color::Color;

use crate::layout::grid::{parse_template, Track};
use bitflags::bitflags;
use std::hash::{Hash, Hasher};

bitflags! {
    /// Text attributes.
    ///
    /// These can be combined using bitwise OR. Each attribute has a
    /// distinct SGR open/close pair; see [`sgr`].
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u8 {
        /// Bold text.
        const BOLD = 0b0000_0001;
        /// Dim/faint text.
        const DIM = 0b0000_0010;
        /// Italic text.
        const ITALIC = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE = 0b0000_1000;
        /// Reversed colors (fg/bg swapped).
        const INVERSE = 0b0001_0000;
        /// Strikethrough text.
        const STRIKETHROUGH = 0b0010_0000;
    }
}

impl std::fmt::Debug for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// The visual style a painted cell carries: colors and attributes only.
///
/// `None` colors mean the terminal default. This is the unit the SGR
/// engine diffs when tracking the currently active style.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct CellStyle {
    /// Foreground color, or terminal default.
    pub fg: Option<Color>,
    /// Background color, or terminal default.
    pub bg: Option<Color>,
    /// Text attributes.
    pub attrs: Attributes,
}

impl CellStyle {
    /// Completely unstyled.
    pub const PLAIN: Self = Self {
        fg: None,
        bg: None,
        attrs: Attributes::empty(),
    };

    /// Check whether this style sets nothing.
    #[inline]
    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

/// Main layout direction of a flex container.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Direction {
    /// Children stack vertically; the main axis is vertical.
    #[default]
    Column,
    /// Children flow horizontally; the main axis is horizontal.
    Row,
}

/// Layout algorithm selector for a box's children.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Display {
    /// Flexbox-like single-axis layout.
    #[default]
    Flex,
    /// Grid layout driven by column/row templates.
    Grid,
}

/// Main-axis distribution of leftover space when no child grows.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Justify {
    /// Pack children at the main-axis start.
    #[default]
    Start,
    /// Center children.
    Center,
    /// Pack children at the main-axis end.
    End,
    /// Equal space between children, none at the edges.
    Between,
    /// Equal space around each child (half-size edges).
    Around,
    /// Equal space between children and at both edges.
    Evenly,
}

/// Cross-axis placement of a flex child.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Align {
    /// Fill the container's cross axis (unless the child has an explicit
    /// cross size).
    #[default]
    Stretch,
    /// Place at the cross-axis start.
    Start,
    /// Center on the cross axis.
    Center,
    /// Place at the cross-axis end.
    End,
}

/// Placement order for grid items without an explicit position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum AutoFlow {
    /// Fill rows left-to-right, adding rows as needed.
    #[default]
    Row,
    /// Fill columns top-to-bottom, adding columns as needed.
    Column,
}

/// Full per-node style.
///
/// A default `Style` sets nothing: no colors, no border, automatic sizes.
/// Builder methods follow the `with_*` convention:
///
/// ```
/// use trellis::{Attributes, BorderKind, Color, Style};
/// let style = Style::new()
///     .with_fg(Color::Ansi(1))
///     .with_attrs(Attributes::BOLD)
///     .with_border(BorderKind::Round)
///     .with_padding(1);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Style {
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Text attributes.
    pub attrs: Attributes,
    /// Border kind; `None` reserves no edge cells.
    pub border: BorderKind,

    /// Explicit width in cells.
    pub width: Option<u16>,
    /// Explicit height in cells.
    pub height: Option<u16>,
    /// Minimum width.
    pub min_width: Option<u16>,
    /// Maximum width.
    pub max_width: Option<u16>,
    /// Minimum height.
    pub min_height: Option<u16>,
    /// Maximum height.
    pub max_height: Option<u16>,
    /// Uniform padding inside the border.
    pub padding: u16,
    /// Uniform margin outside the box.
    pub margin: u16,
    /// Gap between consecutive children (flex) or tracks (grid).
    pub gap: u16,

    /// Layout algorithm for this box's children.
    pub display: Display,
    /// Flex main-axis direction.
    pub direction: Direction,
    /// Flex basis: hypothetical main-axis size before grow/shrink.
    pub basis: Option<u16>,
    /// Flex grow weight.
    pub grow: u16,
    /// Flex shrink weight.
    pub shrink: u16,
    /// Main-axis distribution of leftover space.
    pub justify: Justify,
    /// Cross-axis placement of children.
    pub align: Align,

    /// Grid column template.
    pub template_columns: Vec<Track>,
    /// Grid row template.
    pub template_rows: Vec<Track>,
    /// Auto-placement order for unpositioned grid items.
    pub auto_flow: AutoFlow,
    /// Explicit grid column (0-based track index).
    pub column: Option<u16>,
    /// Explicit grid row (0-based track index).
    pub row: Option<u16>,
    /// Number of column tracks this item spans.
    pub column_span: u16,
    /// Number of row tracks this item spans.
    pub row_span: u16,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: Attributes::empty(),
            border: BorderKind::None,
            width: None,
            height: None,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            padding: 0,
            margin: 0,
            gap: 0,
            display: Display::Flex,
            direction: Direction::Column,
            basis: None,
            grow: 0,
            shrink: 1,
            justify: Justify::Start,
            align: Align::Stretch,
            template_columns: Vec::new(),
            template_rows: Vec::new(),
            auto_flow: AutoFlow::Row,
            column: None,
            row: None,
            column_span: 1,
            row_span: 1,
        }
    }
}

impl Style {
    /// An empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color.
    #[must_use]
    pub fn with_fg(mut self, fg: Color) -> Self {
        self.fg = Some(fg);
        self
    }

    /// Set the foreground from a color token; malformed tokens leave the
    /// text unstyled.
    #[must_use]
    pub fn with_fg_token(mut self, token: &str) -> Self {
        self.fg = Color::parse(token);
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Set the background from a color token; malformed tokens leave the
    /// background unset.
    #[must_use]
    pub fn with_bg_token(mut self, token: &str) -> Self {
        self.bg = Color::parse(token);
        self
    }

    /// Set the text attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// Set the border kind.
    #[must_use]
    pub fn with_border(mut self, border: BorderKind) -> Self {
        self.border = border;
        self
    }

    /// Set an explicit width.
    #[must_use]
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Set an explicit height.
    #[must_use]
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    /// Set minimum width.
    #[must_use]
    pub fn with_min_width(mut self, v: u16) -> Self {
        self.min_width = Some(v);
        self
    }

    /// Set maximum width.
    #[must_use]
    pub fn with_max_width(mut self, v: u16) -> Self {
        self.max_width = Some(v);
        self
    }

    /// Set minimum height.
    #[must_use]
    pub fn with_min_height(mut self, v: u16) -> Self {
        self.min_height = Some(v);
        self
    }

    /// Set maximum height.
    #[must_use]
    pub fn with_max_height(mut self, v: u16) -> Self {
        self.max_height = Some(v);
        self
    }

    /// Set uniform padding.
    #[must_use]
    pub fn with_padding(mut self, padding: u16) -> Self {
        self.padding = padding;
        self
    }

    /// Set uniform margin.
    #[must_use]
    pub fn with_margin(mut self, margin: u16) -> Self {
        self.margin = margin;
        self
    }

    /// Set the inter-child (or inter-track) gap.
    #[must_use]
    pub fn with_gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    /// Set the layout algorithm.
    #[must_use]
    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    /// Set the flex direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the flex basis.
    #[must_use]
    pub fn with_basis(mut self, basis: u16) -> Self {
        self.basis = Some(basis);
        self
    }

    /// Set the flex grow weight.
    #[must_use]
    pub fn with_grow(mut self, grow: u16) -> Self {
        self.grow = grow;
        self
    }

    /// Set the flex shrink weight.
    #[must_use]
    pub fn with_shrink(mut self, shrink: u16) -> Self {
        self.shrink = shrink;
        self
    }

    /// Set the justify mode.
    #[must_use]
    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    /// Set the align mode.
    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Parse and set the grid column template (`"10 auto 1fr"`).
    #[must_use]
    pub fn with_template_columns(mut self, template: &str) -> Self {
        self.display = Display::Grid;
        self.template_columns = parse_template(template);
        self
    }

    /// Parse and set the grid row template.
    #[must_use]
    pub fn with_template_rows(mut self, template: &str) -> Self {
        self.display = Display::Grid;
        self.template_rows = parse_template(template);
        self
    }

    /// Set the auto-placement flow.
    #[must_use]
    pub fn with_auto_flow(mut self, flow: AutoFlow) -> Self {
        self.auto_flow = flow;
        self
    }

    /// Set an explicit grid position (0-based column and row).
    #[must_use]
    pub fn with_grid_position(mut self, column: u16, row: u16) -> Self {
        self.column = Some(column);
        self.row = Some(row);
        self
    }

    /// Set grid spans.
    #[must_use]
    pub fn with_grid_span(mut self, column_span: u16, row_span: u16) -> Self {
        self.column_span = column_span.max(1);
        self.row_span = row_span.max(1);
        self
    }

    /// The visual subset of this style, as painted into cells.
    #[inline]
    pub fn cell_style(&self) -> CellStyle {
        CellStyle {
            fg: self.fg,
            bg: self.bg,
            attrs: self.attrs,
        }
    }

    /// Compact hash over all recognized fields.
    pub fn style_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Compare only the fields that influence layout.
    ///
    /// A delta confined to colors and attributes is render-only: bounds
    /// cannot move, so only the node's own region needs repainting.
    pub fn layout_eq(&self, other: &Self) -> bool {
        self.border == other.border
            && self.width == other.width
            && self.height == other.height
            && self.min_width == other.min_width
            && self.max_width == other.max_width
            && self.min_height == other.min_height
            && self.max_height == other.max_height
            && self.padding == other.padding
            && self.margin == other.margin
            && self.gap == other.gap
            && self.display == other.display
            && self.direction == other.direction
            && self.basis == other.basis
            && self.grow == other.grow
            && self.shrink == other.shrink
            && self.justify == other.justify
            && self.align == other.align
            && self.template_columns == other.template_columns
            && self.template_rows == other.template_rows
            && self.auto_flow == other.auto_flow
            && self.column == other.column
            && self.row == other.row
            && self.column_span == other.column_span
            && self.row_span == other.row_span
    }
}
