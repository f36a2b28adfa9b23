//! Dashboard demo: a grid layout with live content churn.
//!
//! Exercises the differential path: after the first full paint, each
//! frame only re-emits the cells whose content actually changed.
//!
//! Run with: cargo run --example dashboard

use std::io::stdout;
use std::time::Duration;

use crossterm::terminal;
use trellis::{
    Attributes, BorderKind, Color, Display, NodeId, Renderer, Style, Tree,
};

struct Dashboard {
    tree: Tree,
    ticker: NodeId,
    gauge: NodeId,
    log: NodeId,
}

fn build(width: u16) -> Dashboard {
    let mut tree = Tree::new();
    let root = tree.insert_box(
        None,
        Style::new()
            .with_display(Display::Grid)
            .with_template_columns("1fr 2fr")
            .with_template_rows("5 1fr")
            .with_gap(1)
            .with_width(width),
    );

    let status = tree.insert_box(
        Some(root),
        Style::new()
            .with_border(BorderKind::Round)
            .with_fg_token("brightcyan")
            .with_padding(1),
    );
    let ticker = tree.insert_text(
        Some(status),
        "tick 0",
        Style::new().with_attrs(Attributes::BOLD),
    );

    let meter = tree.insert_box(
        Some(root),
        Style::new()
            .with_border(BorderKind::Single)
            .with_fg_token("green")
            .with_padding(1),
    );
    let gauge = tree.insert_text(Some(meter), "", Style::new().with_fg(Color::Ansi(2)));

    let log_panel = tree.insert_box(
        Some(root),
        Style::new()
            .with_border(BorderKind::Single)
            .with_grid_position(0, 1)
            .with_grid_span(2, 1)
            .with_padding(1),
    );
    let log = tree.insert_text(Some(log_panel), "", Style::default());

    Dashboard { tree, ticker, gauge, log }
}

fn main() -> std::io::Result<()> {
    let (width, height) = terminal::size().unwrap_or((80, 24));

    let mut dashboard = build(width);
    print!("\x1b[2J");
    let mut renderer = Renderer::new(stdout(), width, height);

    for frame in 0u32..120 {
        dashboard
            .tree
            .set_text(dashboard.ticker, format!("tick {frame}"));

        let filled = (frame as usize * 2) % 24;
        dashboard.tree.set_text(
            dashboard.gauge,
            format!("{}{}", "█".repeat(filled), "░".repeat(24 - filled)),
        );

        if frame % 10 == 0 {
            dashboard
                .tree
                .set_text(dashboard.log, format!("checkpoint at frame {frame}"));
        }

        renderer.render(&mut dashboard.tree)?;
        std::thread::sleep(Duration::from_millis(50));
    }

    let metrics = renderer.metrics();
    println!(
        "\x1b[{height}H{} frames, avg {:.2}ms, last coverage {:.1}%",
        metrics.render_count,
        metrics.average_render_time_ms,
        metrics.dirty_coverage_ratio * 100.0
    );
    Ok(())
}
