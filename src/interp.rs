//! Command Interpreter
//!
//! Applies scanner tokens to the grid, cursor, pen and scroll offset.
//! [`Term`] is the single-threaded state machine; the [`crate::Emulator`]
//! wraps it in a lock for concurrent use.
//!
//! Semantics worth calling out:
//! - `CSI H` addresses rows relative to the current viewport origin, so
//!   "home" means the top of the visible screen, not the top of scrollback.
//! - `CSI 2J` appends a fresh viewport's worth of blank rows and scrolls
//!   to show only them; history above is retained.
//! - Resize padding and lazily materialized rows always use the default
//!   style injected at construction, never the current pen.

use crate::cell::Cell;
use crate::cursor::Cursor;
use crate::grid::{Grid, HistoryPolicy};
use crate::scanner::{CsiSeq, Scanner, Token};
use crate::scroll::Scroll;
use crate::style::{Color, Style};

/// The complete emulator state machine
#[derive(Debug)]
pub(crate) struct Term {
    grid: Grid,
    cursor: Cursor,
    /// Current writing style, mutated by SGR
    pen: Style,
    scroll: Scroll,
    scanner: Scanner,
    /// Viewport height in rows
    viewport_height: usize,
    history: HistoryPolicy,
    /// A full-screen clear happened since the last auto-adjust
    cleared: bool,
}

impl Term {
    pub fn new(
        width: usize,
        height: usize,
        default_style: Style,
        history: HistoryPolicy,
    ) -> Self {
        // A degenerate viewport is useless but must not break invariants
        let width = width.max(1);
        let height = height.max(1);
        Self {
            grid: Grid::new(width, height, default_style),
            cursor: Cursor::new(),
            pen: default_style,
            scroll: Scroll::new(),
            scanner: Scanner::new(),
            viewport_height: height,
            history,
            cleared: false,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn scroll(&self) -> Scroll {
        self.scroll
    }

    pub fn line_count(&self) -> usize {
        self.grid.row_count()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Process one chunk. Returns whether any state was touched, for the
    /// change notification.
    ///
    /// Trim and auto-adjust run after every token, not once per chunk:
    /// viewport-relative addressing must observe the same offsets no
    /// matter how the stream was split across write calls.
    pub fn write(&mut self, bytes: &[u8]) -> bool {
        let tokens = self.scanner.scan(bytes);
        let changed = !tokens.is_empty();
        for token in tokens {
            match token {
                Token::Char(c) => self.put_char(c),
                Token::Csi(seq) => self.apply_csi(seq),
            }
            self.trim_history();
            self.scroll.auto_adjust(
                self.cursor.y,
                self.grid.row_count(),
                self.viewport_height,
                self.cleared,
            );
            self.cleared = false;
        }
        changed
    }

    /// Reshape the grid. Zero dimensions are rejected as a no-op.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "resize rejected");
            return;
        }
        self.grid.resize_width(width);
        self.viewport_height = height;
        self.cursor.clamp_x(width);
        self.scroll
            .clamp(self.grid.row_count(), self.viewport_height, width);
    }

    /// Full reset back to the initial empty state
    pub fn clear(&mut self) {
        let width = self.grid.width();
        let default_style = self.grid.default_style();
        self.grid = Grid::new(width, self.viewport_height, default_style);
        self.cursor = Cursor::new();
        self.pen = default_style;
        self.scroll = Scroll::new();
        self.scanner.reset();
        self.cleared = false;
    }

    pub fn scroll_to(&mut self, row: usize, col: usize) {
        self.scroll.scroll_to(
            row,
            col,
            self.grid.row_count(),
            self.viewport_height,
            self.grid.width(),
        );
    }

    pub fn page_up(&mut self) {
        self.scroll.page_up(self.viewport_height);
    }

    pub fn page_down(&mut self) {
        self.scroll
            .page_down(self.viewport_height, self.grid.row_count());
    }

    /// Place a literal character, or execute it if it is a C0 control
    fn put_char(&mut self, c: char) {
        let code = c as u32;
        if code < 0x20 {
            return self.execute_control(code as u8);
        }
        if code == 0x7f {
            return;
        }
        let width = self.grid.width();
        if self.cursor.x >= width {
            // Auto-wrap: forced newline before placement
            self.cursor.carriage_return();
            self.cursor.linefeed();
        }
        self.grid
            .set_cell(self.cursor.x, self.cursor.y, Cell::new(c, self.pen));
        self.cursor.x += 1;
    }

    fn execute_control(&mut self, byte: u8) {
        match byte {
            0x08 => self.cursor.backspace(),
            0x09 => self.cursor.tab(self.grid.width()),
            // VT and FF are treated as LF
            0x0a | 0x0b | 0x0c => self.cursor.linefeed(),
            0x0d => self.cursor.carriage_return(),
            _ => {}
        }
    }

    fn apply_csi(&mut self, seq: CsiSeq) {
        match seq.command {
            b'm' => self.apply_sgr(&seq),
            b'H' | b'f' => {
                let row = seq.param_or(0, 1) as usize;
                let col = seq.param_or(1, 1) as usize;
                // Viewport-relative addressing: home is the top of the
                // visible screen, not grid row 0
                self.cursor.y = self.scroll.row + row - 1;
                self.cursor.x = (col - 1).min(self.grid.width().saturating_sub(1));
                if self.cursor.y < self.scroll.row {
                    self.scroll.row = self.cursor.y;
                }
            }
            b'A' => self.cursor.move_up(seq.param_or(0, 1) as usize),
            b'B' => self.cursor.move_down(seq.param_or(0, 1) as usize),
            b'C' => self.cursor.move_right(seq.param_or(0, 1) as usize),
            b'D' => self.cursor.move_left(seq.param_or(0, 1) as usize),
            b'J' => self.erase_in_display(seq.param(0, 0)),
            b'K' => self.erase_in_line(seq.param(0, 0)),
            _ => {
                tracing::debug!(
                    command = %(seq.command as char),
                    params = ?seq.params,
                    "unhandled CSI sequence"
                );
            }
        }
    }

    fn erase_in_display(&mut self, mode: u16) {
        let (x, y) = (self.cursor.x, self.cursor.y);
        let width = self.grid.width();
        let viewport_end = self.scroll.row + self.viewport_height;
        match mode {
            0 => {
                // Cursor to end of screen
                self.grid.erase_in_row(y, x, width);
                self.grid.erase_rows(y + 1, viewport_end);
            }
            1 => {
                // Start of screen to cursor, inclusive
                self.grid.erase_rows(self.scroll.row, y);
                self.grid.erase_in_row(y, 0, x + 1);
            }
            2 => {
                // Clear the visible screen by appending a fresh viewport of
                // blank rows; scrollback history stays intact above it
                self.grid.append_blank_rows(self.viewport_height);
                self.scroll.row =
                    Scroll::max_offset(self.grid.row_count(), self.viewport_height);
                self.cleared = true;
            }
            _ => {}
        }
    }

    fn erase_in_line(&mut self, mode: u16) {
        let (x, y) = (self.cursor.x, self.cursor.y);
        let width = self.grid.width();
        match mode {
            0 => self.grid.erase_in_row(y, x, width),
            1 => self.grid.erase_in_row(y, 0, x + 1),
            2 => self.grid.erase_in_row(y, 0, width),
            _ => {}
        }
    }

    /// SGR: standard parameter list, with `38`/`48` extended color forms.
    /// Unrecognized parameters are ignored without error.
    fn apply_sgr(&mut self, seq: &CsiSeq) {
        let default_style = self.grid.default_style();
        if seq.params.is_empty() {
            self.pen = default_style;
            return;
        }
        let params = &seq.params;
        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => self.pen = default_style,
                1 => self.pen.attrs.bold = true,
                2 => self.pen.attrs.faint = true,
                3 => self.pen.attrs.italic = true,
                4 => self.pen.attrs.underline = true,
                5 | 6 => self.pen.attrs.blink = true,
                7 => self.pen.attrs.inverse = true,
                8 => self.pen.attrs.hidden = true,
                9 => self.pen.attrs.strikethrough = true,
                22 => {
                    self.pen.attrs.bold = false;
                    self.pen.attrs.faint = false;
                }
                23 => self.pen.attrs.italic = false,
                24 => self.pen.attrs.underline = false,
                25 => self.pen.attrs.blink = false,
                27 => self.pen.attrs.inverse = false,
                28 => self.pen.attrs.hidden = false,
                29 => self.pen.attrs.strikethrough = false,
                30..=37 => self.pen.fg = Color::Indexed((params[i] - 30) as u8),
                38 => {
                    if let Some((color, used)) = parse_extended_color(&params[i + 1..]) {
                        self.pen.fg = color;
                        i += used;
                    }
                }
                39 => self.pen.fg = default_style.fg,
                40..=47 => self.pen.bg = Color::Indexed((params[i] - 40) as u8),
                48 => {
                    if let Some((color, used)) = parse_extended_color(&params[i + 1..]) {
                        self.pen.bg = color;
                        i += used;
                    }
                }
                49 => self.pen.bg = default_style.bg,
                90..=97 => self.pen.fg = Color::Indexed((params[i] - 90 + 8) as u8),
                100..=107 => self.pen.bg = Color::Indexed((params[i] - 100 + 8) as u8),
                other => {
                    tracing::debug!(param = other, "ignored SGR parameter");
                }
            }
            i += 1;
        }
    }

    /// Drop the oldest rows past the history limit, shifting every grid
    /// coordinate we hold so the invariants keep holding
    fn trim_history(&mut self) {
        let Some(max) = self.history.max_rows else {
            return;
        };
        let dropped = self.grid.trim_front(max.get());
        if dropped > 0 {
            self.cursor.y = self.cursor.y.saturating_sub(dropped);
            self.scroll.row = self.scroll.row.saturating_sub(dropped);
        }
    }
}

/// `38;2;r;g;b` and `38;5;n` color forms. Returns the color and how many
/// parameters beyond the introducer were consumed.
fn parse_extended_color(rest: &[u16]) -> Option<(Color, usize)> {
    match rest.first()? {
        2 => {
            let (r, g, b) = (*rest.get(1)?, *rest.get(2)?, *rest.get(3)?);
            Some((Color::Rgb(r as u8, g as u8, b as u8), 4))
        }
        5 => {
            let n = *rest.get(1)?;
            Some((Color::Indexed(n as u8), 2))
        }
        _ => None,
    }
}
