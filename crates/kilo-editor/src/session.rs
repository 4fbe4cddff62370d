//! Editing session — the `Editor` and its main loop.
//!
//! One `Editor` value owns everything a session needs: the byte source keys
//! come from, the writer frames go to, the document, the cursor, the
//! viewport and the timed status message. The loop is
//!
//! ```text
//! refresh_screen → read_key → process_key → repeat
//! ```
//!
//! until [`Editor::process_key`] returns [`Action::Quit`] or reading fails.
//! The modal prompt ([`crate::prompt`]) and incremental search
//! ([`crate::search`]) extend `Editor` with further `impl` blocks.

use std::io::Write;
use std::time::Instant;

use kilo_term::input::{Key, read_key};
use kilo_term::output::OutputBuffer;
use kilo_term::reader::ByteSource;
use kilo_term::terminal::Size;
use tracing::{debug, info, trace, warn};

use crate::compose::Frame;
use crate::config::Config;
use crate::cursor::Cursor;
use crate::document::Document;
use crate::error::Result;
use crate::search::SearchState;
use crate::status::StatusMessage;
use crate::viewport::Viewport;

/// The message shown when the editor starts.
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

const CTRL_F: Key = Key::ctrl(b'f');
const CTRL_H: Key = Key::ctrl(b'h');
const CTRL_L: Key = Key::ctrl(b'l');
const CTRL_Q: Key = Key::ctrl(b'q');
const CTRL_S: Key = Key::ctrl(b's');

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// A single editing session.
pub struct Editor<S, W> {
    pub(crate) input: S,
    output: W,
    pub(crate) doc: Document,
    pub(crate) cursor: Cursor,
    pub(crate) viewport: Viewport,
    config: Config,
    quit_times: u32,
    status: Option<StatusMessage>,
    pub(crate) search: SearchState,
    frame: OutputBuffer,
}

impl<S: ByteSource, W: Write> Editor<S, W> {
    /// A session editing `doc` on a screen of `size`.
    pub fn new(input: S, output: W, doc: Document, size: Size, config: Config) -> Self {
        let mut editor = Self {
            input,
            output,
            doc,
            cursor: Cursor::new(),
            viewport: Viewport::for_screen(usize::from(size.rows), usize::from(size.cols)),
            quit_times: config.quit_times,
            config,
            status: None,
            search: SearchState::default(),
            frame: OutputBuffer::new(),
        };
        editor.set_status(HELP_MESSAGE);
        editor
    }

    // -- Accessors ----------------------------------------------------------

    /// The document being edited.
    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// The cursor.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The viewport.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The current status message text, fresh or not.
    #[must_use]
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(StatusMessage::text)
    }

    /// Quit presses left before unsaved changes are discarded.
    #[inline]
    #[must_use]
    pub const fn quit_times_left(&self) -> u32 {
        self.quit_times
    }

    /// The frame writer.
    #[inline]
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }

    /// Replace the status message, stamping it with the current time.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::new(text, Instant::now()));
    }

    // -- Main loop ----------------------------------------------------------

    /// Render, read, dispatch until a quit is confirmed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing a frame fails.
    pub fn run(&mut self) -> Result<()> {
        info!(
            rows = self.viewport.rows,
            cols = self.viewport.cols,
            "editor loop started"
        );
        loop {
            self.refresh_screen()?;
            let key = read_key(&mut self.input)?;
            if self.process_key(key)? == Action::Quit {
                info!("quit");
                return Ok(());
            }
        }
    }

    /// Bring the cursor into view and write one complete frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    pub fn refresh_screen(&mut self) -> Result<()> {
        self.scroll();

        let now = Instant::now();
        let timeout = self.config.message_timeout;
        let message = self
            .status
            .as_ref()
            .filter(|msg| msg.is_visible(now, timeout))
            .map(StatusMessage::text);

        self.frame.clear();
        Frame {
            doc: &self.doc,
            cursor: &self.cursor,
            viewport: &self.viewport,
            message,
        }
        .render(&mut self.frame)?;
        self.frame.flush_to(&mut self.output)?;
        Ok(())
    }

    /// Recompute the render column and scroll the viewport to the cursor.
    pub(crate) fn scroll(&mut self) {
        self.cursor.update_rx(&self.doc);
        self.viewport.scroll_to(self.cursor.y, self.cursor.rx);
    }

    // -- Dispatch -----------------------------------------------------------

    /// Apply one key.
    ///
    /// # Errors
    ///
    /// Returns an error only if a prompt (save-as, search) fails to read
    /// input or draw. Save failures are reported on the message bar.
    pub fn process_key(&mut self, key: Key) -> Result<Action> {
        trace!(?key, "key");

        match key {
            CTRL_Q => return Ok(self.request_quit()),
            Key::ENTER => self.insert_newline(),
            CTRL_S => self.save()?,
            CTRL_F => self.find()?,
            Key::Backspace | CTRL_H => self.delete_backward(),
            Key::Delete => {
                self.cursor.right(&self.doc);
                self.delete_backward();
            }
            Key::ArrowLeft => self.cursor.left(&self.doc),
            Key::ArrowRight => self.cursor.right(&self.doc),
            Key::ArrowUp => self.cursor.up(&self.doc),
            Key::ArrowDown => self.cursor.down(&self.doc),
            Key::PageUp | Key::PageDown => self.page(key == Key::PageUp),
            Key::Home => self.cursor.home(),
            Key::End => self.cursor.end(&self.doc),
            CTRL_L | Key::Escape => {}
            Key::Byte(b) if key.is_printable() || key == Key::TAB => self.insert_char(b),
            Key::Byte(_) => {}
        }

        self.quit_times = self.config.quit_times;
        self.cursor.update_rx(&self.doc);
        Ok(Action::Continue)
    }

    // -- Editing ------------------------------------------------------------

    fn insert_char(&mut self, ch: u8) {
        if self.cursor.y == self.doc.row_count() {
            self.doc.insert_row(self.cursor.y, b"");
        }
        if self.doc.insert_char(self.cursor.y, self.cursor.x, ch) {
            self.cursor.x += 1;
        }
    }

    fn insert_newline(&mut self) {
        let Cursor { x, y, .. } = self.cursor;
        let done = if x == 0 {
            self.doc.insert_row(y, b"")
        } else {
            self.doc.split_row(y, x)
        };
        if done {
            self.cursor.y += 1;
            self.cursor.x = 0;
        }
    }

    fn delete_backward(&mut self) {
        let Cursor { x, y, .. } = self.cursor;
        if y == self.doc.row_count() || (x == 0 && y == 0) {
            return;
        }
        if x > 0 {
            if self.doc.delete_char(y, x - 1) {
                self.cursor.x -= 1;
            }
        } else {
            let joined_at = self.doc.row_len(y - 1);
            if self.doc.join_row(y) {
                self.cursor.y -= 1;
                self.cursor.x = joined_at;
            }
        }
    }

    // -- Motion -------------------------------------------------------------

    fn page(&mut self, up: bool) {
        let vp = self.viewport;
        if up {
            self.cursor.y = vp.row_offset;
        } else {
            self.cursor.y = (vp.row_offset + vp.rows)
                .saturating_sub(1)
                .min(self.doc.row_count());
        }
        self.cursor.clamp_x(&self.doc);

        for _ in 0..vp.rows {
            if up {
                self.cursor.up(&self.doc);
            } else {
                self.cursor.down(&self.doc);
            }
        }
    }

    // -- Save and quit ------------------------------------------------------

    fn save(&mut self) -> Result<()> {
        if self.doc.filename().is_none() {
            let Some(name) = self.prompt("Save as: {} (ESC to cancel)", None)? else {
                self.set_status("Save aborted");
                return Ok(());
            };
            let name = String::from_utf8_lossy(&name).into_owned();
            debug!(%name, "save-as name entered");
            self.doc.set_filename(name.into());
        }

        match self.doc.save(self.config.save_mode) {
            Ok(bytes) => self.set_status(format!("{bytes} bytes written to disk")),
            Err(e) => {
                warn!(error = %e, "save failed");
                self.set_status(e.to_string());
            }
        }
        Ok(())
    }

    fn request_quit(&mut self) -> Action {
        if self.doc.is_dirty() {
            self.quit_times = self.quit_times.saturating_sub(1);
            if self.quit_times > 0 {
                self.set_status(format!(
                    "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                    self.quit_times
                ));
                return Action::Continue;
            }
            warn!("quitting with unsaved changes");
        }
        Action::Quit
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
