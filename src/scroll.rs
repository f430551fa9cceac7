//! Scroll Controller
//!
//! Maps the viewport onto the grid. The offset row stays inside
//! `[0, max(0, rows - viewport_height)]`. Auto-adjust runs after every
//! write, in a fixed precedence:
//!
//! 1. cursor outside the viewport: recenter the viewport on the cursor;
//! 2. viewing at/near the bottom, cursor near the bottom, or the last
//!    operation was a full-screen clear: snap to the bottom;
//! 3. otherwise leave the offset alone, preserving manual scroll-back.
//!
//! Page up/down are the only player-invoked scroll steps; auto-adjust
//! never runs between one of them and the next write.

use serde::{Deserialize, Serialize};

/// How close to an edge counts as "near" for the snap-to-bottom rule
const NEAR_BOTTOM_MARGIN: usize = 2;

/// Viewport origin: the grid coordinate mapped to the viewport's (0, 0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scroll {
    /// Topmost visible grid row
    pub row: usize,
    /// Leftmost visible grid column
    pub col: usize,
}

impl Scroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest legal offset row for the given grid/viewport heights
    pub fn max_offset(rows: usize, viewport_height: usize) -> usize {
        rows.saturating_sub(viewport_height)
    }

    /// Re-evaluate the offset after a write
    pub fn auto_adjust(
        &mut self,
        cursor_y: usize,
        rows: usize,
        viewport_height: usize,
        after_clear: bool,
    ) {
        let max = Self::max_offset(rows, viewport_height);

        let outside = cursor_y < self.row || cursor_y >= self.row + viewport_height;
        if outside {
            self.row = cursor_y.saturating_sub(viewport_height / 2).min(max);
            return;
        }

        let viewing_near_bottom = self.row + NEAR_BOTTOM_MARGIN >= max;
        let cursor_near_bottom = cursor_y + NEAR_BOTTOM_MARGIN + 1 >= rows;
        if after_clear || viewing_near_bottom || cursor_near_bottom {
            self.row = max;
        }
    }

    /// Move up one viewport height, clamped at the top
    pub fn page_up(&mut self, viewport_height: usize) {
        self.row = self.row.saturating_sub(viewport_height);
    }

    /// Move down one viewport height, clamped at the bottom
    pub fn page_down(&mut self, viewport_height: usize, rows: usize) {
        let max = Self::max_offset(rows, viewport_height);
        self.row = (self.row + viewport_height).min(max);
    }

    /// Jump to an explicit offset, clamped into range
    pub fn scroll_to(
        &mut self,
        row: usize,
        col: usize,
        rows: usize,
        viewport_height: usize,
        width: usize,
    ) {
        self.row = row.min(Self::max_offset(rows, viewport_height));
        self.col = col.min(width.saturating_sub(1));
    }

    /// Re-clamp after a resize or history trim
    pub fn clamp(&mut self, rows: usize, viewport_height: usize, width: usize) {
        self.row = self.row.min(Self::max_offset(rows, viewport_height));
        self.col = self.col.min(width.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_adjust_recenter_when_cursor_outside() {
        let mut s = Scroll::new();
        // 100 rows, viewport of 10, cursor way below the viewport
        s.auto_adjust(50, 100, 10, false);
        assert_eq!(s.row, 45); // 50 - 10/2
    }

    #[test]
    fn test_auto_adjust_recenter_clamps_to_bottom() {
        let mut s = Scroll::new();
        s.auto_adjust(99, 100, 10, false);
        assert_eq!(s.row, 90);
    }

    #[test]
    fn test_auto_adjust_snap_when_viewing_near_bottom() {
        let mut s = Scroll { row: 89, col: 0 };
        // Cursor visible, viewport one row shy of the bottom
        s.auto_adjust(92, 100, 10, false);
        assert_eq!(s.row, 90);
    }

    #[test]
    fn test_auto_adjust_preserves_manual_scrollback() {
        let mut s = Scroll { row: 20, col: 0 };
        // Cursor visible inside the viewport, nowhere near the bottom
        s.auto_adjust(25, 100, 10, false);
        assert_eq!(s.row, 20);
    }

    #[test]
    fn test_auto_adjust_snap_after_clear() {
        let mut s = Scroll { row: 20, col: 0 };
        s.auto_adjust(25, 100, 10, true);
        assert_eq!(s.row, 90);
    }

    #[test]
    fn test_paging_clamps() {
        let mut s = Scroll::new();
        s.page_up(10);
        assert_eq!(s.row, 0);
        s.page_down(10, 25);
        assert_eq!(s.row, 10);
        s.page_down(10, 25);
        assert_eq!(s.row, 15); // clamped at max offset
        s.page_up(10);
        assert_eq!(s.row, 5);
    }

    #[test]
    fn test_scroll_to_clamps() {
        let mut s = Scroll::new();
        s.scroll_to(500, 500, 40, 10, 80);
        assert_eq!((s.row, s.col), (30, 79));
        s.scroll_to(5, 3, 40, 10, 80);
        assert_eq!((s.row, s.col), (5, 3));
    }

    #[test]
    fn test_small_grid_has_zero_max_offset() {
        assert_eq!(Scroll::max_offset(5, 10), 0);
        let mut s = Scroll { row: 3, col: 0 };
        s.clamp(5, 10, 80);
        assert_eq!(s.row, 0);
    }
}
