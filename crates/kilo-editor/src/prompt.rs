//! The modal line prompt.
//!
//! While a prompt is open the normal key dispatch is suspended: each key
//! either edits the input line, confirms it, or cancels. The prompt text is
//! shown on the message bar with `{}` replaced by the input so far.

use std::io::Write;

use kilo_term::input::{Key, read_key};
use kilo_term::reader::ByteSource;
use tracing::debug;

use crate::error::Result;
use crate::session::Editor;

/// Observes every key the prompt reads, together with the input so far.
pub type PromptCallback<S, W> = fn(&mut Editor<S, W>, &[u8], Key);

const CTRL_H: Key = Key::ctrl(b'h');

/// `template` with its `{}` replaced by `input`.
#[must_use]
pub fn render_prompt(template: &str, input: &[u8]) -> String {
    template.replacen("{}", &String::from_utf8_lossy(input), 1)
}

impl<S: ByteSource, W: Write> Editor<S, W> {
    /// Read a line on the message bar.
    ///
    /// Returns `Some(input)` when Enter is pressed on a non-empty line and
    /// `None` when Escape cancels. The callback, if any, sees every key
    /// after the input has been updated, including the final Enter or
    /// Escape.
    ///
    /// # Errors
    ///
    /// Returns an error if reading a key or drawing a frame fails.
    pub fn prompt(
        &mut self,
        template: &str,
        callback: Option<PromptCallback<S, W>>,
    ) -> Result<Option<Vec<u8>>> {
        debug!(template, "prompt opened");
        let mut input = Vec::new();

        loop {
            self.set_status(render_prompt(template, &input));
            self.refresh_screen()?;

            let key = read_key(&mut self.input)?;
            let done = match key {
                Key::Backspace | Key::Delete | CTRL_H => {
                    input.pop();
                    None
                }
                Key::Escape => Some(None),
                Key::ENTER if !input.is_empty() => Some(Some(input.clone())),
                Key::Byte(b) if key.is_printable() => {
                    input.push(b);
                    None
                }
                _ => None,
            };

            if let Some(result) = done {
                self.set_status("");
                if let Some(cb) = callback {
                    cb(self, &input, key);
                }
                debug!(confirmed = result.is_some(), "prompt closed");
                return Ok(result);
            }
            if let Some(cb) = callback {
                cb(self, &input, key);
            }
        }
    }
}
