//! Viewport snapshots
//!
//! A `Snapshot` is a deep copy of the visible screen taken under the read
//! lock: cells, cursor, offset and dimensions. The presentation side
//! paints from these; the headless tool and golden tests serialize them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::Cell;
use crate::interp::Term;

/// Snapshot serialization failure
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A copied view of the viewport at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Viewport width in columns
    pub width: usize,
    /// Viewport height in rows
    pub height: usize,
    /// Cursor (x, y) in grid coordinates
    pub cursor: (usize, usize),
    /// Scroll offset (row, col)
    pub offset: (usize, usize),
    /// Total materialized grid rows at capture time
    pub line_count: usize,
    /// The visible rows, top to bottom; short grids yield fewer rows
    pub rows: Vec<Vec<Cell>>,
}

impl Snapshot {
    pub(crate) fn from_term(term: &Term) -> Self {
        let scroll = term.scroll();
        let cursor = term.cursor();
        let top = scroll.row;
        let bottom = (top + term.viewport_height()).min(term.line_count());
        let rows = (top..bottom)
            .filter_map(|y| term.grid().row(y).map(|r| r.cells.clone()))
            .collect();
        Self {
            width: term.width(),
            height: term.viewport_height(),
            cursor: (cursor.x, cursor.y),
            offset: (scroll.row, scroll.col),
            line_count: term.line_count(),
            rows,
        }
    }

    /// Plain-text rendering of the viewport, trailing blanks trimmed
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                let s: String = row.iter().map(|c| c.ch).collect();
                s.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HistoryPolicy;
    use crate::style::Style;

    fn term_with(bytes: &[u8]) -> Term {
        let mut t = Term::new(10, 4, Style::default(), HistoryPolicy::unbounded());
        t.write(bytes);
        t
    }

    #[test]
    fn test_snapshot_text() {
        let t = term_with(b"hi\r\nthere");
        let snap = Snapshot::from_term(&t);
        assert_eq!(snap.to_text(), "hi\nthere\n\n");
        assert_eq!(snap.cursor, (5, 1));
        assert_eq!(snap.rows.len(), 4);
    }

    #[test]
    fn test_snapshot_follows_viewport() {
        let mut t = Term::new(10, 4, Style::default(), HistoryPolicy::unbounded());
        for i in 0..12 {
            t.write(format!("l{}\n", i).as_bytes());
        }
        let snap = Snapshot::from_term(&t);
        assert_eq!(snap.offset.0, t.scroll().row);
        let first = snap.rows[0].iter().map(|c| c.ch).collect::<String>();
        assert!(first.starts_with(&format!("l{}", snap.offset.0)));
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let t = term_with(b"\x1b[1;31mRED\x1b[0m plain");
        let snap = Snapshot::from_term(&t);
        let json = snap.to_json().unwrap();
        let back = Snapshot::from_json(&json).unwrap();
        assert_eq!(snap, back);
    }
}
