//! Viewport — the visible window onto the document.
//!
//! The viewport holds the scroll offsets (top row, left render column) and
//! the size of the text area. The text area is the terminal minus two rows:
//! one for the status bar and one for the message bar.
//!
//! Two coordinate systems meet here. The cursor lives in *content* columns
//! (byte offsets into a row), but the screen is laid out in *render* columns,
//! where a tab spans up to [`TAB_STOP`] cells. [`column_to_render`] walks the
//! row from the left every time it is asked; the answer depends on every tab
//! to the left of the cursor, so there is nothing worth caching.

use crate::config::TAB_STOP;

/// Rows the status bar and message bar take from the terminal.
pub const RESERVED_ROWS: usize = 2;

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Render column of content column `x` in `content`.
///
/// Each ordinary byte advances one column; a tab advances to the next
/// multiple of [`TAB_STOP`]. `x` past the end of the row is treated as the
/// end of the row.
#[must_use]
pub fn column_to_render(content: &[u8], x: usize) -> usize {
    content.iter().take(x).fold(0, |rx, &b| {
        if b == b'\t' {
            rx + (TAB_STOP - rx % TAB_STOP)
        } else {
            rx + 1
        }
    })
}

/// Content column whose render span covers render column `rx`.
///
/// The inverse of [`column_to_render`]: a render column that falls inside a
/// tab's span maps back to the tab itself. Render columns past the end of
/// the row map to the row length.
#[must_use]
pub fn render_to_column(content: &[u8], rx: usize) -> usize {
    let mut cur = 0;
    for (cx, &b) in content.iter().enumerate() {
        if b == b'\t' {
            cur += TAB_STOP - cur % TAB_STOP;
        } else {
            cur += 1;
        }
        if cur > rx {
            return cx;
        }
    }
    content.len()
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Scroll offsets plus the size of the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First document row on screen.
    pub row_offset: usize,
    /// First render column on screen.
    pub col_offset: usize,
    /// Text rows on screen.
    pub rows: usize,
    /// Columns on screen.
    pub cols: usize,
}

impl Viewport {
    /// A viewport with a text area of `rows` × `cols`, scrolled to the top.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            rows,
            cols,
        }
    }

    /// A viewport for a terminal of `screen_rows` × `screen_cols`, leaving
    /// [`RESERVED_ROWS`] for the bars.
    #[must_use]
    pub const fn for_screen(screen_rows: usize, screen_cols: usize) -> Self {
        Self::new(screen_rows.saturating_sub(RESERVED_ROWS), screen_cols)
    }

    /// Shift the offsets just far enough that `(cy, rx)` is on screen.
    ///
    /// Idempotent: a second call with the same cursor changes nothing.
    pub const fn scroll_to(&mut self, cy: usize, rx: usize) {
        if cy < self.row_offset {
            self.row_offset = cy;
        }
        if self.rows > 0 && cy >= self.row_offset + self.rows {
            self.row_offset = cy + 1 - self.rows;
        }
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if self.cols > 0 && rx >= self.col_offset + self.cols {
            self.col_offset = rx + 1 - self.cols;
        }
    }

    /// Whether `(cy, rx)` is inside the visible window.
    #[must_use]
    pub const fn contains(&self, cy: usize, rx: usize) -> bool {
        cy >= self.row_offset
            && cy < self.row_offset + self.rows
            && rx >= self.col_offset
            && rx < self.col_offset + self.cols
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
