//! Dirty region tracker: rectangles that changed since the last paint.
//!
//! The tracker only promises that the recorded set is a superset of every
//! actually-changed cell; regions are never merged. A resize invalidates
//! all prior state and forces the next render onto the full-redraw path.

use crate::layout::Bounds;

/// Accumulates viewport-clipped dirty rectangles between paints.
#[derive(Clone, Debug)]
pub struct DirtyTracker {
    regions: Vec<Bounds>,
    full_redraw: bool,
    width: u16,
    height: u16,
}

impl DirtyTracker {
    /// Create a tracker for a viewport; the first frame is always a full
    /// redraw.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            regions: Vec::new(),
            full_redraw: true,
            width,
            height,
        }
    }

    /// Record a region, expanded by `margin` on all sides and clipped to
    /// the viewport. Empty results are dropped.
    pub fn mark_region(&mut self, bounds: Bounds, margin: u16) {
        if self.full_redraw {
            return;
        }
        let clipped = bounds
            .expand(margin)
            .intersection(&Bounds::from_size(self.width, self.height));
        if !clipped.is_empty() {
            self.regions.push(clipped);
        }
    }

    /// Flag the next render as a full repaint.
    pub fn mark_full_redraw(&mut self) {
        self.full_redraw = true;
        self.regions.clear();
    }

    /// Whether the next render must repaint everything.
    #[inline]
    pub const fn is_full_redraw(&self) -> bool {
        self.full_redraw
    }

    /// The recorded regions, sorted top-to-bottom then left-to-right.
    pub fn dirty_regions(&self) -> Vec<Bounds> {
        let mut regions = self.regions.clone();
        regions.sort_by_key(|r| (r.y, r.x));
        regions
    }

    /// Number of recorded regions.
    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether nothing is marked (and no full redraw is pending).
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && !self.full_redraw
    }

    /// Forget all recorded state after a successful emit.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.full_redraw = false;
    }

    /// Adopt a new viewport; a buffer captured before a dimension change
    /// is invalid, so this forces a full redraw.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.mark_full_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(width: u16, height: u16) -> DirtyTracker {
        let mut tracker = DirtyTracker::new(width, height);
        tracker.clear();
        tracker
    }

    #[test]
    fn test_new_tracker_wants_full_redraw() {
        let tracker = DirtyTracker::new(80, 24);
        assert!(tracker.is_full_redraw());
    }

    #[test]
    fn test_mark_region_expands_and_clips() {
        let mut tracker = cleared(10, 10);
        tracker.mark_region(Bounds::new(8, 8, 4, 4), 1);
        assert_eq!(tracker.dirty_regions(), vec![Bounds::new(7, 7, 3, 3)]);
    }

    #[test]
    fn test_mark_region_outside_viewport_is_dropped() {
        let mut tracker = cleared(10, 10);
        tracker.mark_region(Bounds::new(20, 20, 5, 5), 2);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_regions_sorted_top_to_bottom() {
        let mut tracker = cleared(40, 40);
        tracker.mark_region(Bounds::new(5, 20, 2, 2), 0);
        tracker.mark_region(Bounds::new(9, 3, 2, 2), 0);
        tracker.mark_region(Bounds::new(1, 3, 2, 2), 0);
        let regions = tracker.dirty_regions();
        assert_eq!(regions[0], Bounds::new(1, 3, 2, 2));
        assert_eq!(regions[1], Bounds::new(9, 3, 2, 2));
        assert_eq!(regions[2], Bounds::new(5, 20, 2, 2));
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let mut tracker = cleared(10, 10);
        tracker.mark_region(Bounds::new(0, 0, 2, 2), 0);
        tracker.resize(20, 20);
        assert!(tracker.is_full_redraw());
        assert_eq!(tracker.len(), 0);
    }

    #[test]
    fn test_clear_resets_both_states() {
        let mut tracker = DirtyTracker::new(10, 10);
        tracker.mark_full_redraw();
        tracker.clear();
        assert!(!tracker.is_full_redraw());
        assert!(tracker.is_empty());
    }
}
