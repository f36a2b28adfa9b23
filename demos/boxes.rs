//! Minimal smoke demo: a few bordered boxes in a flex row.
//!
//! Run with: cargo run --example boxes

use std::io::stdout;

use crossterm::terminal;
use trellis::{Attributes, BorderKind, Color, Direction, Renderer, Style, Tree};

fn main() -> std::io::Result<()> {
    let (width, height) = terminal::size().unwrap_or((80, 24));

    let mut tree = Tree::new();
    let root = tree.insert_box(
        None,
        Style::new().with_direction(Direction::Row).with_gap(2).with_padding(1),
    );

    for (label, border, color) in [
        ("single", BorderKind::Single, "cyan"),
        ("round", BorderKind::Round, "green"),
        ("double", BorderKind::Double, "magenta"),
        ("bold", BorderKind::Bold, "yellow"),
    ] {
        let panel = tree.insert_box(
            Some(root),
            Style::new()
                .with_border(border)
                .with_fg_token(color)
                .with_padding(1)
                .with_grow(1)
                .with_height(5),
        );
        tree.insert_text(
            Some(panel),
            label,
            Style::new().with_attrs(Attributes::BOLD).with_fg(Color::Ansi(7)),
        );
    }

    // Clear once; trellis owns everything after that.
    print!("\x1b[2J");
    let mut renderer = Renderer::new(stdout(), width, height);
    renderer.render(&mut tree)?;

    // Park the cursor under the boxes before handing the shell back.
    println!("\x1b[9H");
    let metrics = renderer.metrics();
    println!("rendered in {:.2}ms", metrics.last_render_time_ms);
    Ok(())
}
