//! # Trellis
//!
//! A flexbox/grid layout engine with differential rendering for
//! character terminals.
//!
//! Trellis lets an application describe its UI as a tree of styled boxes
//! and text runs. Each frame it computes a CSS-like layout (flex and grid
//! algorithms), paints the tree into a cell buffer, diffs against the
//! previously displayed buffer, and emits only the escape sequences
//! needed to transform the screen — no manual cursor math, no full
//! repaints for incremental changes.
//!
//! ## Core concepts
//!
//! - **Tree**: an arena of `Box | Text` nodes built and mutated by the
//!   caller, handed to the renderer once per frame
//! - **Layout**: pure measurement plus a top-down commit pass assigning
//!   absolute bounds via flex or grid distribution
//! - **Differential rendering**: double-buffered cells, dirty-region
//!   tracking, and minimal escape-sequence emission
//!
//! ## Example
//!
//! ```no_run
//! use trellis::{BorderKind, Renderer, Style, Tree};
//!
//! fn main() -> std::io::Result<()> {
//!     let mut tree = Tree::new();
//!     let root = tree.insert_box(
//!         None,
//!         Style::new().with_width(10).with_height(3).with_border(BorderKind::Single),
//!     );
//!     tree.insert_text(Some(root), "Hi", Style::default());
//!
//!     let mut renderer = Renderer::new(std::io::stdout(), 80, 24);
//!     renderer.render(&mut tree)?;
//!     Ok(())
//! }
//! ```
//!
//! Terminal setup (raw mode, alternate screen, cursor visibility) is the
//! host application's responsibility; see the programs under `demos/`.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod dirty;
pub mod layout;
pub mod render;
pub mod style;
pub mod tree;

// Re-exports for convenience
pub use buffer::{Buffer, Cell, CellFlags};
pub use dirty::DirtyTracker;
pub use layout::{parse_template, Bounds, Constraints, MeasurePass, Size, Track};
pub use render::{EmitStats, Metrics, Renderer};
pub use style::{
    Align, Attributes, AutoFlow, BorderKind, CellStyle, Color, Direction, Display, Justify, Style,
};
pub use tree::{Node, NodeId, NodeKind, Tree};
