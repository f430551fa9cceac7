//! Screen Grid
//!
//! A growable sequence of fixed-width rows. Unlike a classic fixed-size
//! screen, the grid keeps every row ever written as scrollback history;
//! the viewport is mapped onto it by the scroll controller. Row retention
//! is bounded only by an externally configured [`HistoryPolicy`].

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::style::Style;

/// Memory policy for history retention.
///
/// `max_rows = None` keeps every row forever. With a bound, the oldest rows
/// are dropped once the grid exceeds it; the emulator shifts cursor and
/// scroll coordinates to match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryPolicy {
    /// Maximum number of rows to retain, oldest dropped first
    pub max_rows: Option<NonZeroUsize>,
}

impl HistoryPolicy {
    /// Unbounded history
    pub fn unbounded() -> Self {
        Self { max_rows: None }
    }

    /// Keep at most `max_rows` rows
    pub fn bounded(max_rows: NonZeroUsize) -> Self {
        Self {
            max_rows: Some(max_rows),
        }
    }
}

/// A row of cells, always exactly `width` cells long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// The cells in this row
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a blank row of the given width
    pub fn new(width: usize, style: Style) -> Self {
        Self {
            cells: vec![Cell::blank(style); width],
        }
    }

    /// Truncate or pad the row to a new width. Padding cells get `style`.
    pub fn resize(&mut self, width: usize, style: Style) {
        self.cells.resize(width, Cell::blank(style));
    }

    /// Blank out cells in `[start, end)`, clamped to the row
    pub fn erase_range(&mut self, start: usize, end: usize, style: Style) {
        let end = end.min(self.cells.len());
        for cell in &mut self.cells[start.min(end)..end] {
            *cell = Cell::blank(style);
        }
    }

    /// Extract the text content, trailing blanks trimmed
    pub fn text(&self) -> String {
        let s: String = self.cells.iter().map(|c| c.ch).collect();
        s.trim_end().to_string()
    }
}

/// The full line history: an ordered sequence of fixed-width rows.
///
/// Rows are materialized lazily: the cursor may point below the last row
/// until content is placed there, at which point `ensure_row` grows the
/// grid with default-style blanks.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: Vec<Row>,
    width: usize,
    /// Style for blank cells; injected at construction, never the pen
    default_style: Style,
}

impl Grid {
    /// Create a grid with `height` blank rows of `width` cells
    pub fn new(width: usize, height: usize, default_style: Style) -> Self {
        Self {
            rows: (0..height).map(|_| Row::new(width, default_style)).collect(),
            width,
            default_style,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn default_style(&self) -> Style {
        self.default_style
    }

    /// Get a reference to a row
    pub fn row(&self, y: usize) -> Option<&Row> {
        self.rows.get(y)
    }

    /// Get a reference to a cell
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.rows.get(y).and_then(|r| r.cells.get(x))
    }

    /// Grow the grid until row `y` exists. New rows are blank with the
    /// default style.
    pub fn ensure_row(&mut self, y: usize) {
        while self.rows.len() <= y {
            self.rows.push(Row::new(self.width, self.default_style));
        }
    }

    /// Place a cell, materializing the row first if needed. Out-of-width
    /// placements are dropped.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        if x >= self.width {
            return;
        }
        self.ensure_row(y);
        self.rows[y].cells[x] = cell;
    }

    /// Append `n` blank rows at the bottom
    pub fn append_blank_rows(&mut self, n: usize) {
        for _ in 0..n {
            self.rows.push(Row::new(self.width, self.default_style));
        }
    }

    /// Change the width of every row. Existing content keeps its first
    /// `width` columns; padding uses the default style so stale pen
    /// formatting never bleeds into freshly exposed columns.
    pub fn resize_width(&mut self, width: usize) {
        if width == self.width {
            return;
        }
        for row in &mut self.rows {
            row.resize(width, self.default_style);
        }
        self.width = width;
    }

    /// Blank cells `[start, end)` of row `y` with the default style
    pub fn erase_in_row(&mut self, y: usize, start: usize, end: usize) {
        let style = self.default_style;
        if let Some(row) = self.rows.get_mut(y) {
            row.erase_range(start, end, style);
        }
    }

    /// Blank rows `[start, end)` entirely with the default style
    pub fn erase_rows(&mut self, start: usize, end: usize) {
        let style = self.default_style;
        let end = end.min(self.rows.len());
        for row in &mut self.rows[start.min(end)..end] {
            for cell in &mut row.cells {
                *cell = Cell::blank(style);
            }
        }
    }

    /// Drop the oldest rows until at most `max` remain. Returns the number
    /// of rows dropped so the caller can shift cursor/scroll coordinates.
    pub fn trim_front(&mut self, max: usize) -> usize {
        if self.rows.len() <= max {
            return 0;
        }
        let n = self.rows.len() - max;
        self.rows.drain(..n);
        n
    }
}
