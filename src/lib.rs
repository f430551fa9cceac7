//! Termgrid
//!
//! A streaming terminal emulator core built from scratch: it turns an
//! arbitrary, chunk-fragmented byte stream of text and an ANSI/VT100
//! subset into a persistent grid of styled cells, a cursor and a scroll
//! viewport. The grid keeps unbounded line history (subject to an
//! explicit [`HistoryPolicy`]); a full-screen clear scrolls history away
//! rather than destroying it.
//!
//! - `scanner`: incremental CSI/text recognition with a bounded pending
//!   buffer that guarantees forward progress on malformed input
//! - `interp`: maps recognized sequences onto grid/cursor/style/scroll
//! - `grid`, `cursor`, `scroll`, `style`, `cell`: the state model
//! - `emulator`: the lock-guarded boundary with copying accessors and an
//!   after-unlock change notification channel
//! - `snapshot`: deep copies of the viewport for the presentation side
//!
//! Malformed or unsupported escape sequences are consumed silently; the
//! emulator never errors, blocks or deadlocks on its input.

pub mod cell;
pub mod cursor;
pub mod emulator;
pub mod grid;
mod interp;
pub mod scanner;
pub mod scroll;
pub mod snapshot;
pub mod style;

pub use cell::Cell;
pub use cursor::Cursor;
pub use emulator::{Emulator, WriteHandle};
pub use grid::{Grid, HistoryPolicy, Row};
pub use scanner::{CsiSeq, Scanner, Token, PENDING_CAPACITY};
pub use scroll::Scroll;
pub use snapshot::{Snapshot, SnapshotError};
pub use style::{Attrs, Color, Style};
