//! Cursor position and movement.
//!
//! The cursor is `(x, y)` in content coordinates plus `rx`, the render
//! column derived from `x` on the current row. `y` may equal the document's
//! row count: that is the empty line past the end of the file, where typing
//! creates a new row.
//!
//! Every movement keeps the invariants `y <= row_count` and
//! `x <= row_len(y)`.

use crate::document::Document;

/// A position in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Content column (byte offset into the row).
    pub x: usize,
    /// Row index.
    pub y: usize,
    /// Render column matching `x`.
    pub rx: usize,
}

impl Cursor {
    /// A cursor at the top-left.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, y: 0, rx: 0 }
    }

    /// A cursor at `(x, y)` with `rx` not yet computed.
    #[must_use]
    pub const fn at(x: usize, y: usize) -> Self {
        Self { x, y, rx: 0 }
    }

    // -- Movement -----------------------------------------------------------

    /// One column left, wrapping to the end of the previous row.
    pub fn left(&mut self, doc: &Document) {
        if self.x > 0 {
            self.x -= 1;
        } else if self.y > 0 {
            self.y -= 1;
            self.x = doc.row_len(self.y);
        }
    }

    /// One column right, wrapping to the start of the next row.
    ///
    /// Does nothing on the past-the-end line.
    pub fn right(&mut self, doc: &Document) {
        let Some(row) = doc.row(self.y) else {
            return;
        };
        if self.x < row.len() {
            self.x += 1;
        } else {
            self.y += 1;
            self.x = 0;
        }
    }

    /// One row up.
    pub fn up(&mut self, doc: &Document) {
        if self.y > 0 {
            self.y -= 1;
        }
        self.clamp_x(doc);
    }

    /// One row down, stopping at the past-the-end line.
    pub fn down(&mut self, doc: &Document) {
        if self.y < doc.row_count() {
            self.y += 1;
        }
        self.clamp_x(doc);
    }

    /// Start of the row.
    pub const fn home(&mut self) {
        self.x = 0;
    }

    /// End of the row.
    pub fn end(&mut self, doc: &Document) {
        self.x = doc.row_len(self.y);
    }

    /// Pull `x` back inside the current row.
    pub fn clamp_x(&mut self, doc: &Document) {
        self.x = self.x.min(doc.row_len(self.y));
    }

    /// Recompute `rx` from `x` on the current row.
    pub fn update_rx(&mut self, doc: &Document) {
        self.rx = doc.row(self.y).map_or(0, |row| row.cx_to_rx(self.x));
    }
}
