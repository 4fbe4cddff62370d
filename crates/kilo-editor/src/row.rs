//! One line of text and its on-screen form.
//!
//! A [`Row`] keeps two byte vectors:
//!
//! - `content` — the authoritative text, exactly as it will be saved, with
//!   no trailing newline
//! - `rendered` — `content` with every tab expanded to spaces up to the next
//!   multiple of [`TAB_STOP`]
//!
//! `rendered` is private and every mutator rebuilds it before returning, so
//! no caller can ever see a render form that disagrees with the content.
//!
//! Positions are byte offsets. Out-of-range positions make a mutator a
//! no-op (it returns `false`), never a panic.

use crate::config::TAB_STOP;
use crate::viewport;

/// A line of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    content: Vec<u8>,
    rendered: Vec<u8>,
}

impl Row {
    /// Create a row holding `content`.
    #[must_use]
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        let mut row = Self {
            content: content.into(),
            rendered: Vec::new(),
        };
        row.update();
        row
    }

    // -- Access -------------------------------------------------------------

    /// The raw text.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The tab-expanded text shown on screen.
    #[inline]
    #[must_use]
    pub fn rendered(&self) -> &[u8] {
        &self.rendered
    }

    /// Length of the raw text in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// True for an empty line.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Render column of content column `x`.
    #[inline]
    #[must_use]
    pub fn cx_to_rx(&self, x: usize) -> usize {
        viewport::column_to_render(&self.content, x)
    }

    /// Content column whose render span covers render column `rx`.
    #[inline]
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        viewport::render_to_column(&self.content, rx)
    }

    // -- Mutation -----------------------------------------------------------

    /// Insert `byte` before column `at` (`at == len` appends).
    pub fn insert_byte(&mut self, at: usize, byte: u8) -> bool {
        if at > self.content.len() {
            return false;
        }
        self.content.insert(at, byte);
        self.update();
        true
    }

    /// Remove the byte at column `at`.
    pub fn delete_byte(&mut self, at: usize) -> bool {
        if at >= self.content.len() {
            return false;
        }
        self.content.remove(at);
        self.update();
        true
    }

    /// Append `text` to the end of the line.
    pub fn append(&mut self, text: &[u8]) {
        self.content.extend_from_slice(text);
        self.update();
    }

    /// Cut the line at column `at`, returning everything from `at` onward.
    ///
    /// Returns `None` (and leaves the row alone) if `at` is past the end.
    pub fn split_off(&mut self, at: usize) -> Option<Vec<u8>> {
        if at > self.content.len() {
            return None;
        }
        let tail = self.content.split_off(at);
        self.update();
        Some(tail)
    }

    /// Rebuild `rendered` from `content`.
    fn update(&mut self) {
        let tabs = self.content.iter().filter(|&&b| b == b'\t').count();
        self.rendered.clear();
        self.rendered.reserve(self.content.len() + tabs * (TAB_STOP - 1));

        for &b in &self.content {
            if b == b'\t' {
                self.rendered.push(b' ');
                while self.rendered.len() % TAB_STOP != 0 {
                    self.rendered.push(b' ');
                }
            } else {
                self.rendered.push(b);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
