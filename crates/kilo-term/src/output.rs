// SPDX-License-Identifier: MIT
//
// Frame output.
//
// The editor never writes to the terminal piecemeal. Each refresh lays the
// whole screen (hide cursor, rows, bars, cursor placement) into an
// `OutputBuffer`, then hands it to the terminal in one `write_all`. A screen
// that arrives in several writes can be seen half-painted.

use std::io::{self, Write};

/// Starting capacity; an 80×24 frame with escapes fits several times over.
const FRAME_CAPACITY: usize = 8 * 1024;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// One frame's worth of terminal bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBuffer(Vec<u8>);

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::with_capacity(FRAME_CAPACITY))
    }

    /// Bytes queued so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The queued frame.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    /// Queue `byte` `n` times.
    #[inline]
    pub fn push_repeat(&mut self, byte: u8, n: usize) {
        self.0.extend(std::iter::repeat_n(byte, n));
    }

    /// Drop the queued bytes, keeping the allocation for the next frame.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Send the queued frame to `w` as a single `write_all` plus `flush`,
    /// then empty the buffer.
    ///
    /// On failure the frame stays queued.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub fn flush_to<W: Write + ?Sized>(&mut self, w: &mut W) -> io::Result<()> {
        if self.0.is_empty() {
            return Ok(());
        }
        w.write_all(&self.0)?;
        w.flush()?;
        self.0.clear();
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.push_bytes(bytes);
        Ok(bytes.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records every `write` call separately, and can be told to fail.
    #[derive(Default)]
    struct Terminal {
        writes: Vec<Vec<u8>>,
        flushes: usize,
        broken: bool,
    }

    impl Write for Terminal {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            if self.broken {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            self.writes.push(bytes.to_vec());
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn starts_empty() {
        let out = OutputBuffer::default();
        assert!(out.is_empty());
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn formatted_writes_queue_up() {
        let mut out = OutputBuffer::new();
        write!(out, "\x1b[{};{}H", 3, 7).unwrap();
        out.push_bytes(b"x");
        assert_eq!(out.as_bytes(), b"\x1b[3;7Hx");
    }

    #[test]
    fn repeat_pads() {
        let mut out = OutputBuffer::new();
        out.push_bytes(b"~");
        out.push_repeat(b' ', 4);
        out.push_repeat(b'-', 0);
        out.push_bytes(b"|");
        assert_eq!(out.as_bytes(), b"~    |");
    }

    #[test]
    fn whole_frame_goes_out_in_one_write() {
        let mut out = OutputBuffer::new();
        out.push_bytes(b"\x1b[?25l\x1b[H");
        for _ in 0..3 {
            out.push_bytes(b"~\x1b[K\r\n");
        }
        out.push_bytes(b"\x1b[?25h");

        let mut term = Terminal::default();
        out.flush_to(&mut term).unwrap();

        assert_eq!(term.writes.len(), 1);
        assert_eq!(term.flushes, 1);
        assert_eq!(
            term.writes[0],
            b"\x1b[?25l\x1b[H~\x1b[K\r\n~\x1b[K\r\n~\x1b[K\r\n\x1b[?25h"
        );
        assert!(out.is_empty());
    }

    #[test]
    fn nothing_queued_nothing_written() {
        let mut out = OutputBuffer::new();
        let mut term = Terminal::default();
        out.flush_to(&mut term).unwrap();
        assert!(term.writes.is_empty());
        assert_eq!(term.flushes, 0);
    }

    #[test]
    fn failed_flush_keeps_frame() {
        let mut out = OutputBuffer::new();
        out.push_bytes(b"frame");
        let mut term = Terminal {
            broken: true,
            ..Terminal::default()
        };
        assert!(out.flush_to(&mut term).is_err());
        assert_eq!(out.as_bytes(), b"frame");
    }

    #[test]
    fn clear_between_frames() {
        let mut out = OutputBuffer::new();
        out.push_bytes(b"first");
        out.clear();
        out.push_bytes(b"second");
        assert_eq!(out.as_bytes(), b"second");
    }
}
