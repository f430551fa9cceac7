//! Terminal Cell
//!
//! One grid position: a character and its style. Empty positions hold a
//! space with the grid's default style; there is no sentinel "null" cell.

use serde::{Deserialize, Serialize};

use crate::style::Style;

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The character in this cell
    pub ch: char,
    /// Styling for this cell
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

impl Cell {
    /// Create a cell with a character and style
    pub fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    /// Create a blank cell carrying the given style
    pub fn blank(style: Style) -> Self {
        Self { ch: ' ', style }
    }

    /// Check whether this cell shows a space with the given style
    pub fn is_blank(&self, style: Style) -> bool {
        self.ch == ' ' && self.style == style
    }
}
