//! Cursor Controller
//!
//! Grid-space cursor coordinates and the movement rules the interpreter
//! applies. `x` stays within `[0, width)` via wrap-on-write; `y` only
//! grows (rows are materialized lazily by the grid when content lands).

use serde::{Deserialize, Serialize};

/// Tab stops are every 8 columns
const TAB_WIDTH: usize = 8;

/// Cursor position in grid coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Column (0-indexed)
    pub x: usize,
    /// Grid row (0-indexed, may point past the last materialized row)
    pub y: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// CR: return to column 0
    pub fn carriage_return(&mut self) {
        self.x = 0;
    }

    /// LF: move down one row; column is unchanged
    pub fn linefeed(&mut self) {
        self.y += 1;
    }

    /// Move up, clamping at the top of the grid
    pub fn move_up(&mut self, n: usize) {
        self.y = self.y.saturating_sub(n);
    }

    /// Move down; no clamp, rows materialize when content is placed
    pub fn move_down(&mut self, n: usize) {
        self.y += n;
    }

    /// Move left, clamping at column 0
    pub fn move_left(&mut self, n: usize) {
        self.x = self.x.saturating_sub(n);
    }

    /// Move right; wrap-on-write handles anything past the width
    pub fn move_right(&mut self, n: usize) {
        self.x += n;
    }

    /// BS: one column left unless already at column 0
    pub fn backspace(&mut self) {
        self.x = self.x.saturating_sub(1);
    }

    /// HT: advance to the next multiple of 8, clamped to the last column
    pub fn tab(&mut self, width: usize) {
        let next = (self.x / TAB_WIDTH + 1) * TAB_WIDTH;
        self.x = next.min(width.saturating_sub(1));
    }

    /// Clamp the column after a width shrink
    pub fn clamp_x(&mut self, width: usize) {
        self.x = self.x.min(width.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_movement_clamps() {
        let mut c = Cursor::new();
        c.move_up(3);
        assert_eq!(c.y, 0);
        c.move_left(2);
        assert_eq!(c.x, 0);
        c.move_down(5);
        c.move_right(7);
        assert_eq!((c.x, c.y), (7, 5));
        c.move_up(2);
        assert_eq!(c.y, 3);
    }

    #[test]
    fn test_cursor_tab() {
        let mut c = Cursor::new();
        c.x = 3;
        c.tab(80);
        assert_eq!(c.x, 8);
        c.tab(80);
        assert_eq!(c.x, 16);
        // Clamped at the last column
        c.x = 79;
        c.tab(80);
        assert_eq!(c.x, 79);
    }

    #[test]
    fn test_cursor_backspace() {
        let mut c = Cursor::new();
        c.backspace();
        assert_eq!(c.x, 0);
        c.x = 4;
        c.backspace();
        assert_eq!(c.x, 3);
    }

    #[test]
    fn test_cursor_carriage_return_keeps_row() {
        let mut c = Cursor { x: 12, y: 4 };
        c.carriage_return();
        assert_eq!((c.x, c.y), (0, 4));
        c.linefeed();
        assert_eq!((c.x, c.y), (0, 5));
    }
}
