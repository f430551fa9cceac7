//! Emulator
//!
//! The thread-safe boundary around [`Term`]: one reader-writer lock over
//! all mutable state, copying read accessors for the presentation side,
//! and a change notification posted on a channel *after* the lock is
//! released so a notified party can immediately call back into a read
//! accessor without deadlocking.

use std::io;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cell::Cell;
use crate::grid::HistoryPolicy;
use crate::interp::Term;
use crate::snapshot::Snapshot;
use crate::style::Style;

/// Streaming terminal emulator with concurrent read access.
///
/// One execution context feeds raw bytes via [`Emulator::write`] (or a
/// [`WriteHandle`]); any number of others read grid/cursor/scroll state
/// through the copying accessors.
#[derive(Debug)]
pub struct Emulator {
    term: RwLock<Term>,
    notifier: Mutex<Option<Sender<()>>>,
}

impl Emulator {
    /// Create an emulator with the given viewport size, default style and
    /// history policy. The default style is what blank cells carry; there
    /// is no ambient global theme lookup.
    pub fn new(
        width: usize,
        height: usize,
        default_style: Style,
        history: HistoryPolicy,
    ) -> Self {
        Self {
            term: RwLock::new(Term::new(width, height, default_style, history)),
            notifier: Mutex::new(None),
        }
    }

    /// 80x24, default style, unbounded history
    pub fn with_defaults() -> Self {
        Self::new(80, 24, Style::default(), HistoryPolicy::unbounded())
    }

    // A panicked writer must not wedge the render side, and the emulator
    // surfaces no errors by design, so lock poisoning is swallowed.
    fn read_lock(&self) -> RwLockReadGuard<'_, Term> {
        self.term.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Term> {
        self.term.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Process a chunk of the byte stream. Always consumes all input and
    /// never reports a parse error; returns the number of bytes consumed.
    pub fn write(&self, bytes: &[u8]) -> usize {
        let changed = {
            let mut term = self.write_lock();
            term.write(bytes)
        };
        if changed {
            self.notify();
        }
        bytes.len()
    }

    /// Reshape the viewport. A zero dimension is rejected as a no-op.
    pub fn resize(&self, width: usize, height: usize) {
        self.write_lock().resize(width, height);
        self.notify();
    }

    /// Synchronous full reset of grid, cursor and scroll state
    pub fn clear(&self) {
        self.write_lock().clear();
        self.notify();
    }

    /// Jump the viewport to an explicit grid position, clamped into range
    pub fn scroll_to(&self, row: usize, col: usize) {
        self.write_lock().scroll_to(row, col);
        self.notify();
    }

    /// Page the viewport up by one height; never overridden by
    /// auto-adjust until the next write
    pub fn page_up(&self) {
        self.write_lock().page_up();
        self.notify();
    }

    /// Page the viewport down by one height
    pub fn page_down(&self) {
        self.write_lock().page_down();
        self.notify();
    }

    /// Cursor position in grid coordinates
    pub fn cursor(&self) -> (usize, usize) {
        let term = self.read_lock();
        let c = term.cursor();
        (c.x, c.y)
    }

    /// Number of materialized grid rows (visible plus scrollback)
    pub fn line_count(&self) -> usize {
        self.read_lock().line_count()
    }

    /// Viewport origin as (row, col)
    pub fn scroll_offset(&self) -> (usize, usize) {
        let term = self.read_lock();
        let s = term.scroll();
        (s.row, s.col)
    }

    /// Current (width, height) of the viewport
    pub fn size(&self) -> (usize, usize) {
        let term = self.read_lock();
        (term.width(), term.viewport_height())
    }

    /// Copy out a range of grid rows. Rows outside the grid are omitted;
    /// every returned row is exactly `width` cells.
    pub fn snapshot_rows(&self, range: std::ops::Range<usize>) -> Vec<Vec<Cell>> {
        let term = self.read_lock();
        let end = range.end.min(term.line_count());
        (range.start.min(end)..end)
            .filter_map(|y| term.grid().row(y).map(|r| r.cells.clone()))
            .collect()
    }

    /// Copy out the current viewport plus cursor and offset
    pub fn snapshot(&self) -> Snapshot {
        let term = self.read_lock();
        Snapshot::from_term(&term)
    }

    /// Register the channel that receives change notifications. Each
    /// state-altering write posts one `()` after releasing the lock;
    /// coalescing and back-pressure belong to the receiver.
    pub fn on_changed(&self, sender: Sender<()>) {
        let mut slot = self.notifier.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(sender);
    }

    fn notify(&self) {
        let slot = self.notifier.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(sender) = slot.as_ref() {
            // A disconnected receiver just means nobody is listening
            let _ = sender.send(());
        }
    }
}

/// Cloneable `io::Write` adapter for the byte-source collaborator
#[derive(Debug, Clone)]
pub struct WriteHandle {
    emulator: Arc<Emulator>,
}

impl WriteHandle {
    pub fn new(emulator: Arc<Emulator>) -> Self {
        Self { emulator }
    }
}

impl io::Write for WriteHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.emulator.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
