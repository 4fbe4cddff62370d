//! Screen composition.
//!
//! A [`Frame`] is a read-only view of everything that appears on screen.
//! [`Frame::render`] lays it out into an [`OutputBuffer`] in one pass:
//!
//! ```text
//! hide cursor, home
//! text rows          rendered slice or filler, erase to EOL, \r\n
//! status bar         inverse video, exactly `cols` wide, \r\n
//! message bar        erase line, message (if fresh)
//! place cursor, show cursor
//! ```
//!
//! Nothing here touches the terminal; the caller flushes the buffer with a
//! single write.

use std::io::{self, Write};
use std::path::Path;

use kilo_term::ansi;
use kilo_term::output::OutputBuffer;

use crate::config::STATUS_FILENAME_WIDTH;
use crate::cursor::Cursor;
use crate::document::Document;
use crate::viewport::Viewport;

/// Shown in the status bar for a document without a file.
pub const NO_NAME: &str = "[No Name]";

/// The banner shown on an empty, unnamed document.
#[must_use]
pub fn welcome_text() -> String {
    format!("Kilo editor -- version {}", env!("CARGO_PKG_VERSION"))
}

/// Everything one screen frame is built from.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub doc: &'a Document,
    pub cursor: &'a Cursor,
    pub viewport: &'a Viewport,
    /// The status message, already filtered for freshness.
    pub message: Option<&'a str>,
}

impl Frame<'_> {
    /// Lay out the full frame into `out`.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out` (an in-memory buffer never fails).
    pub fn render(&self, out: &mut OutputBuffer) -> io::Result<()> {
        ansi::cursor_hide(out)?;
        ansi::cursor_home(out)?;

        self.draw_rows(out)?;
        self.draw_status_bar(out)?;
        self.draw_message_bar(out)?;

        let vp = self.viewport;
        ansi::cursor_to(
            out,
            self.cursor.y.saturating_sub(vp.row_offset),
            self.cursor.rx.saturating_sub(vp.col_offset),
        )?;
        ansi::cursor_show(out)
    }

    // -- Text area ----------------------------------------------------------

    fn draw_rows(&self, out: &mut OutputBuffer) -> io::Result<()> {
        let vp = self.viewport;
        for screen_row in 0..vp.rows {
            let file_row = screen_row + vp.row_offset;
            match self.doc.row(file_row) {
                Some(row) => {
                    let rendered = row.rendered();
                    let start = vp.col_offset.min(rendered.len());
                    let end = (vp.col_offset + vp.cols).min(rendered.len());
                    out.push_bytes(&rendered[start..end]);
                }
                None if self.doc.is_empty() && screen_row == vp.rows / 3 => {
                    draw_welcome(out, vp.cols);
                }
                None => out.push_bytes(b"~"),
            }
            ansi::clear_line(out)?;
            out.push_bytes(b"\r\n");
        }
        Ok(())
    }

    // -- Status and message bars --------------------------------------------

    fn draw_status_bar(&self, out: &mut OutputBuffer) -> io::Result<()> {
        let cols = self.viewport.cols;
        let left = status_left(self.doc);
        let right = status_right(self.doc, self.cursor);

        ansi::inverse(out)?;
        let shown = left.len().min(cols);
        out.push_bytes(&left[..shown]);

        // Pad until the right-hand text fits flush against the edge. If it
        // never fits exactly, the bar is all padding.
        let mut len = shown;
        while len < cols {
            if cols - len == right.len() {
                out.push_bytes(right.as_bytes());
                break;
            }
            out.push_bytes(b" ");
            len += 1;
        }

        ansi::reset(out)?;
        out.push_bytes(b"\r\n");
        Ok(())
    }

    fn draw_message_bar(&self, out: &mut OutputBuffer) -> io::Result<()> {
        ansi::clear_line(out)?;
        if let Some(msg) = self.message {
            let bytes = msg.as_bytes();
            out.write_all(&bytes[..bytes.len().min(self.viewport.cols)])?;
        }
        Ok(())
    }
}

/// A `~`, then the welcome banner centered in `cols`.
fn draw_welcome(out: &mut OutputBuffer, cols: usize) {
    let text = welcome_text();
    let len = text.len().min(cols);
    let mut padding = (cols - len) / 2;
    if padding > 0 {
        out.push_bytes(b"~");
        padding -= 1;
    }
    out.push_repeat(b' ', padding);
    out.push_bytes(&text.as_bytes()[..len]);
}

/// `"name - N lines"` plus `" (modified)"` when dirty.
fn status_left(doc: &Document) -> Vec<u8> {
    let mut left = doc
        .filename()
        .map_or_else(|| NO_NAME.as_bytes().to_vec(), truncated_name);
    left.extend_from_slice(format!(" - {} lines", doc.row_count()).as_bytes());
    if doc.is_dirty() {
        left.extend_from_slice(b" (modified)");
    }
    left
}

/// `"current/total"`, 1-based.
fn status_right(doc: &Document, cursor: &Cursor) -> String {
    format!("{}/{}", cursor.y + 1, doc.row_count())
}

fn truncated_name(path: &Path) -> Vec<u8> {
    let bytes = path.as_os_str().as_encoded_bytes();
    bytes[..bytes.len().min(STATUS_FILENAME_WIDTH)].to_vec()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn frame_bytes(doc: &Document, cursor: &Cursor, vp: &Viewport, msg: Option<&str>) -> Vec<u8> {
        let mut out = OutputBuffer::new();
        Frame {
            doc,
            cursor,
            viewport: vp,
            message: msg,
        }
        .render(&mut out)
        .unwrap();
        out.as_bytes().to_vec()
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// The segment of the frame for screen line `n` (split on `\r\n`).
    fn screen_line(frame: &[u8], n: usize) -> String {
        let s = text(frame);
        s.split("\r\n").nth(n).unwrap_or_default().to_owned()
    }

    #[test]
    fn frame_starts_hidden_and_ends_shown() {
        let doc = Document::from_bytes(b"hi\n");
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(3, 10), None);
        assert!(f.starts_with(b"\x1b[?25l\x1b[H"));
        assert!(f.ends_with(b"\x1b[1;1H\x1b[?25h"));
    }

    #[test]
    fn rows_then_filler() {
        let doc = Document::from_bytes(b"one\ntwo\n");
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(4, 10), None);
        assert!(screen_line(&f, 0).ends_with("one\x1b[K"));
        assert_eq!(screen_line(&f, 1), "two\x1b[K");
        assert_eq!(screen_line(&f, 2), "~\x1b[K");
        assert_eq!(screen_line(&f, 3), "~\x1b[K");
    }

    #[test]
    fn rows_are_sliced_by_col_offset() {
        let doc = Document::from_bytes(b"0123456789abcdef\nxy\n");
        let mut vp = Viewport::new(2, 4);
        vp.col_offset = 6;
        let f = frame_bytes(&doc, &Cursor::at(6, 0), &vp, None);
        assert!(screen_line(&f, 0).ends_with("6789\x1b[K"));
        assert_eq!(screen_line(&f, 1), "\x1b[K");
    }

    #[test]
    fn tabs_are_drawn_expanded() {
        let doc = Document::from_bytes(b"\tx\n");
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(1, 20), None);
        assert!(screen_line(&f, 0).ends_with("        x\x1b[K"));
    }

    #[test]
    fn welcome_banner_on_empty_document() {
        let doc = Document::new();
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(9, 80), None);
        let banner = screen_line(&f, 3);
        assert!(banner.starts_with('~'));
        assert!(banner.contains(&welcome_text()));

        let pad = (80 - welcome_text().len()) / 2;
        assert_eq!(banner.find("Kilo"), Some(pad));
    }

    #[test]
    fn welcome_banner_truncated_on_narrow_screen() {
        let doc = Document::new();
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(3, 5), None);
        assert_eq!(screen_line(&f, 1), "Kilo \x1b[K");
    }

    #[test]
    fn no_banner_when_document_has_rows() {
        let doc = Document::from_bytes(b"x\n");
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(9, 80), None);
        assert!(!text(&f).contains("Kilo editor"));
    }

    #[test]
    fn status_bar_is_exactly_cols_wide() {
        let mut doc = Document::from_bytes(b"a\nb\n");
        doc.set_filename(PathBuf::from("notes.txt"));
        let f = frame_bytes(&doc, &Cursor::at(0, 1), &Viewport::new(2, 40), None);
        let bar = screen_line(&f, 2);
        let inner = bar
            .strip_prefix("\x1b[7m")
            .and_then(|s| s.strip_suffix("\x1b[m"))
            .unwrap();
        assert_eq!(inner.len(), 40);
        assert!(inner.starts_with("notes.txt - 2 lines"));
        assert!(inner.ends_with("2/2"));
    }

    #[test]
    fn status_bar_unnamed_and_modified() {
        let mut doc = Document::new();
        doc.insert_row(0, b"x");
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(1, 60), None);
        let bar = screen_line(&f, 1);
        assert!(bar.contains("[No Name] - 1 lines (modified)"));
        assert!(bar.ends_with("1/1\x1b[m"));
    }

    #[test]
    fn status_bar_truncates_long_filename() {
        let mut doc = Document::from_bytes(b"x\n");
        doc.set_filename(PathBuf::from("a_really_long_file_name_indeed.txt"));
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(1, 80), None);
        let bar = screen_line(&f, 1);
        assert!(bar.contains("a_really_long_file_n - 1 lines"));
    }

    #[test]
    fn status_bar_narrower_than_left_text() {
        let doc = Document::from_bytes(b"x\n");
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(1, 6), None);
        assert_eq!(screen_line(&f, 1), "\x1b[7m[No Na\x1b[m");
    }

    #[test]
    fn message_bar_shows_and_truncates() {
        let doc = Document::from_bytes(b"x\n");
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(1, 8), Some("hello world"));
        let bar = screen_line(&f, 2);
        assert!(bar.starts_with("\x1b[Khello wo"));
    }

    #[test]
    fn message_bar_empty_without_message() {
        let doc = Document::from_bytes(b"x\n");
        let f = frame_bytes(&doc, &Cursor::new(), &Viewport::new(1, 8), None);
        assert!(screen_line(&f, 2).starts_with("\x1b[K\x1b["));
    }

    #[test]
    fn cursor_placed_relative_to_offsets() {
        let doc = Document::from_bytes(b"a\nb\nc\nd\ne\n");
        let mut vp = Viewport::new(2, 10);
        vp.row_offset = 3;
        let cursor = Cursor { x: 1, y: 4, rx: 1 };
        let f = frame_bytes(&doc, &cursor, &vp, None);
        assert!(f.ends_with(b"\x1b[2;2H\x1b[?25h"));
    }
}
