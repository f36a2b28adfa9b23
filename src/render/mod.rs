//! Render module: the per-frame pipeline behind [`Renderer`].
//!
//! Each render call runs measurement → commit → paint → diff → emit as
//! one uninterrupted synchronous sequence. The renderer is an explicit
//! handle held by the caller; it owns the buffer pair and the dirty
//! tracker, and nothing about it is process-global.

mod diff;
mod paint;

pub use diff::EmitStats;

use crate::buffer::Buffer;
use crate::dirty::DirtyTracker;
use crate::layout;
use crate::tree::Tree;
use std::io::{self, Write};
use std::time::Instant;

/// Observational rendering statistics.
///
/// Metrics never affect correctness; they exist for dashboards and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Metrics {
    /// Total successful render calls.
    pub render_count: u64,
    /// Duration of the last successful render, in milliseconds.
    pub last_render_time_ms: f64,
    /// Mean duration across all successful renders, in milliseconds.
    pub average_render_time_ms: f64,
    /// Dirty regions consumed by the last render (0 on the full path).
    pub dirty_region_count: usize,
    /// Fraction of the viewport covered by the last render's dirty
    /// regions (1.0 on the full path).
    pub dirty_coverage_ratio: f64,
}

/// Double-buffered differential renderer writing to an output sink.
///
/// The renderer owns the current/previous cell buffers and the dirty
/// tracker. Callers serialize invocations: a render call runs to
/// completion and there is no internal locking.
///
/// # Errors
///
/// Only sink write failures propagate. After a failed emit the on-screen
/// state is suspect, so the next successful render takes the full-redraw
/// path.
pub struct Renderer<W: Write> {
    sink: W,
    width: u16,
    height: u16,
    previous: Option<Buffer>,
    tracker: DirtyTracker,
    /// Reused emission buffer; flushed to the sink in a single write.
    scratch: Vec<u8>,
    metrics: Metrics,
    last_emit: EmitStats,
    total_time_ms: f64,
}

impl<W: Write> Renderer<W> {
    /// Create a renderer for a viewport. The first render is always a
    /// full redraw.
    pub fn new(sink: W, width: u16, height: u16) -> Self {
        Self {
            sink,
            width,
            height,
            previous: None,
            tracker: DirtyTracker::new(width, height),
            scratch: Vec::with_capacity(4096),
            metrics: Metrics::default(),
            last_emit: EmitStats::default(),
            total_time_ms: 0.0,
        }
    }

    /// Viewport dimensions.
    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Read-only metrics snapshot.
    #[must_use]
    pub const fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Emission statistics of the last successful render.
    #[must_use]
    pub const fn last_emit_stats(&self) -> EmitStats {
        self.last_emit
    }

    /// Adopt a new viewport between frames.
    ///
    /// The previous buffer is invalid after a dimension change, so the
    /// next render performs a full redraw regardless of tracker state.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.previous = None;
        self.tracker.resize(width, height);
    }

    /// Layout, paint, diff, and emit one frame of `tree`.
    pub fn render(&mut self, tree: &mut Tree) -> io::Result<()> {
        let started = Instant::now();

        layout::commit(tree, (self.width, self.height), &mut self.tracker);

        let mut current = Buffer::new(self.width, self.height);
        paint::paint_tree(tree, &mut current);

        self.scratch.clear();
        let (emit, region_count, coverage) = match &self.previous {
            Some(previous) if !self.tracker.is_full_redraw() => {
                let regions = self.tracker.dirty_regions();
                let emit = diff::emit_regions(previous, &current, &regions, &mut self.scratch);
                let area: u64 = regions.iter().map(|r| u64::from(r.area())).sum();
                let total = u64::from(self.width) * u64::from(self.height);
                let ratio = if total == 0 {
                    0.0
                } else {
                    (area as f64 / total as f64).min(1.0)
                };
                (emit, regions.len(), ratio)
            }
            _ => {
                let emit = diff::emit_full(&current, &mut self.scratch);
                (emit, 0, 1.0)
            }
        };

        if let Err(error) = self
            .sink
            .write_all(&self.scratch)
            .and_then(|()| self.sink.flush())
        {
            // Aborted mid-emission: the displayed state is unknown.
            self.previous = None;
            self.tracker.mark_full_redraw();
            return Err(error);
        }

        self.previous = Some(current);
        self.tracker.clear();
        self.last_emit = emit;

        let elapsed = started.elapsed().as_secs_f64() * 1_000.0;
        self.metrics.render_count += 1;
        self.metrics.last_render_time_ms = elapsed;
        self.total_time_ms += elapsed;
        self.metrics.average_render_time_ms =
            self.total_time_ms / self.metrics.render_count as f64;
        self.metrics.dirty_region_count = region_count;
        self.metrics.dirty_coverage_ratio = coverage;
        Ok(())
    }

    /// Consume the renderer and return its sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}
