//! Incremental search.
//!
//! Ctrl-F opens a prompt; after every key the query is looked up in the
//! rendered rows and the cursor jumps to the hit. Arrow keys step to the
//! next (Right, Down) or previous (Left, Up) hit, wrapping around the
//! document. Any edit to the query starts over from the top. Escape puts the
//! cursor and scroll position back where they were.

use std::io::Write;

use kilo_term::input::Key;
use kilo_term::reader::ByteSource;
use tracing::debug;

use crate::error::Result;
use crate::session::Editor;

/// Where the next search step starts and which way it goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Row of the previous hit.
    pub last_match: Option<usize>,
    /// Step towards the top of the document.
    pub backward: bool,
}

impl SearchState {
    /// The row after `from` in the current direction, wrapping around `n`
    /// rows. With no previous hit the search starts at row 0.
    #[must_use]
    pub const fn step(&self, from: Option<usize>, n: usize) -> usize {
        match from {
            None => 0,
            Some(i) if self.backward => {
                if i == 0 {
                    n - 1
                } else {
                    i - 1
                }
            }
            Some(i) => (i + 1) % n,
        }
    }
}

/// Offset of the first occurrence of `needle` in `haystack`.
#[must_use]
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

impl<S: ByteSource, W: Write> Editor<S, W> {
    /// Run an incremental search.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt fails to read input or draw.
    pub fn find(&mut self) -> Result<()> {
        let saved_cursor = self.cursor;
        let saved_viewport = self.viewport;
        self.search = SearchState::default();

        let query = self.prompt("Search: {} (Use ESC/Arrows/Enter)", Some(Self::find_step))?;
        if query.is_none() {
            self.cursor = saved_cursor;
            self.viewport = saved_viewport;
        }
        Ok(())
    }

    fn find_step(&mut self, query: &[u8], key: Key) {
        match key {
            Key::ENTER | Key::Escape => {
                self.search = SearchState::default();
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.search.backward = false,
            Key::ArrowLeft | Key::ArrowUp => self.search.backward = true,
            _ => self.search = SearchState::default(),
        }
        if self.search.last_match.is_none() {
            self.search.backward = false;
        }

        let n = self.doc.row_count();
        if query.is_empty() || n == 0 {
            return;
        }

        let mut current = self.search.last_match;
        for _ in 0..n {
            let at = self.search.step(current, n);
            current = Some(at);
            let Some(row) = self.doc.row(at) else {
                continue;
            };
            if let Some(offset) = find_bytes(row.rendered(), query) {
                self.search.last_match = Some(at);
                self.cursor.y = at;
                self.cursor.x = row.rx_to_cx(offset);
                // Past the end, so the next scroll lands the hit on the top row.
                self.viewport.row_offset = n;
                debug!(row = at, col = self.cursor.x, "search hit");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{TestEditor, editor_with, press};
    use kilo_term::reader::ScriptedSource;
    use pretty_assertions::assert_eq;

    const CTRL_F: Key = Key::ctrl(b'f');
    const DOWN: &[u8] = b"\x1b[B";
    const UP: &[u8] = b"\x1b[A";

    fn search(ed: &mut TestEditor, script: &[&[u8]]) {
        let mut source = ScriptedSource::default();
        for part in script {
            source.push_bytes(part);
        }
        ed.input = source;
        press(ed, &[CTRL_F]);
    }

    fn pos(ed: &TestEditor) -> (usize, usize) {
        (ed.cursor().x, ed.cursor().y)
    }

    const TEXT: &str = "alpha\nbeta\ngamma\nthe beta two\n";

    #[test]
    fn find_bytes_basics() {
        assert_eq!(find_bytes(b"hello", b"ll"), Some(2));
        assert_eq!(find_bytes(b"hello", b"z"), None);
        assert_eq!(find_bytes(b"ab", b"abc"), None);
        assert_eq!(find_bytes(b"ab", b""), Some(0));
    }

    #[test]
    fn step_wraps_both_ways() {
        let fwd = SearchState::default();
        assert_eq!(fwd.step(None, 4), 0);
        assert_eq!(fwd.step(Some(3), 4), 0);
        let back = SearchState {
            last_match: None,
            backward: true,
        };
        assert_eq!(back.step(Some(0), 4), 3);
        assert_eq!(back.step(Some(2), 4), 1);
    }

    #[test]
    fn enter_keeps_first_hit() {
        let mut ed = editor_with(TEXT);
        search(&mut ed, &[b"beta\r"]);
        assert_eq!(pos(&ed), (0, 1));
        assert_eq!(ed.status_text(), Some(""));
    }

    #[test]
    fn down_finds_next_hit() {
        let mut ed = editor_with(TEXT);
        search(&mut ed, &[b"beta", DOWN, b"\r"]);
        assert_eq!(pos(&ed), (4, 3));
    }

    #[test]
    fn down_wraps_to_top() {
        let mut ed = editor_with(TEXT);
        search(&mut ed, &[b"beta", DOWN, DOWN, b"\r"]);
        assert_eq!(pos(&ed), (0, 1));
    }

    #[test]
    fn up_searches_backward_and_wraps() {
        let mut ed = editor_with(TEXT);
        search(&mut ed, &[b"beta", UP, b"\r"]);
        assert_eq!(pos(&ed), (4, 3));
    }

    #[test]
    fn editing_query_restarts_from_top() {
        let mut ed = editor_with(TEXT);
        search(&mut ed, &[b"beta", DOWN, b"\x7fa", b"\r"]);
        assert_eq!(pos(&ed), (0, 1));
    }

    #[test]
    fn escape_restores_cursor_and_scroll() {
        let text: String = (0..60).map(|i| format!("row {i}\n")).collect();
        let mut ed = editor_with(&text);
        press(&mut ed, &[Key::ArrowDown, Key::ArrowRight, Key::ArrowRight]);
        let before_cursor = *ed.cursor();
        let before_vp = *ed.viewport();

        let mut source = ScriptedSource::new(b"row 55\x1b");
        source.push_timeout();
        ed.input = source;
        press(&mut ed, &[CTRL_F]);

        assert_eq!(*ed.cursor(), before_cursor);
        assert_eq!(*ed.viewport(), before_vp);
    }

    #[test]
    fn hit_scrolls_match_to_top() {
        let text: String = (0..60).map(|i| format!("row {i}\n")).collect();
        let mut ed = editor_with(&text);
        search(&mut ed, &[b"row 45\r"]);
        assert_eq!(pos(&ed), (0, 45));
        assert_eq!(ed.viewport().row_offset, 45);
    }

    #[test]
    fn match_after_tab_maps_back_to_content_column() {
        let mut ed = editor_with("\tneedle\n");
        search(&mut ed, &[b"needle\r"]);
        assert_eq!(pos(&ed), (1, 0));
    }

    #[test]
    fn no_hit_leaves_cursor() {
        let mut ed = editor_with(TEXT);
        press(&mut ed, &[Key::ArrowDown, Key::ArrowDown]);
        search(&mut ed, &[b"zzz\r"]);
        assert_eq!(pos(&ed), (0, 2));
    }

    #[test]
    fn search_does_not_edit() {
        let mut ed = editor_with(TEXT);
        search(&mut ed, &[b"gamma\r"]);
        assert!(!ed.document().is_dirty());
    }
}
