// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources — where key bytes come from.
//
// The key decoder pulls one byte at a time through the `ByteSource` trait.
// The contract is bounded-time: a read either yields a byte, yields nothing
// because the timeout expired, or fails. It never blocks forever. That is
// what lets the decoder tell a lone Escape keypress apart from the start of
// an escape sequence: if the follow-up byte doesn't arrive in time, the
// ESC stands alone.
//
// `StdinSource` implements the contract on a raw-mode terminal with
// `poll(2)` on stdin's file descriptor. `ScriptedSource` replays a fixed
// byte script and is what the editor tests drive sessions with.

use std::collections::VecDeque;
use std::io;

/// How long a single read waits for input (milliseconds).
///
/// Long enough that the bytes of one escape sequence (which the terminal
/// sends back-to-back) are never split by a timeout, short enough that a
/// bare Escape feels immediate.
pub const READ_TIMEOUT_MS: i32 = 100;

// ─── ByteSource ──────────────────────────────────────────────────────────────

/// A bounded-time source of input bytes.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(None)` when no byte arrived within the source's timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the source is exhausted (EOF) or the
    /// underlying read fails.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── StdinSource ─────────────────────────────────────────────────────────────

/// Reads stdin one byte at a time with a [`READ_TIMEOUT_MS`] poll timeout.
#[derive(Debug, Default)]
pub struct StdinSource {
    _private: (),
}

impl StdinSource {
    /// Create a source reading the process's stdin.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl ByteSource for StdinSource {
    #[cfg(unix)]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let fd = libc::STDIN_FILENO;

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, READ_TIMEOUT_MS)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            // A signal (e.g. SIGWINCH) interrupted the wait: report a timeout.
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if ready == 0 {
            return Ok(None);
        }

        let mut byte = 0u8;
        let n = unsafe { libc::read(fd, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            _ => {
                let err = io::Error::last_os_error();
                if matches!(
                    err.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                ) {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Non-unix fallback: a plain blocking read. The timeout contract is
    /// not honored here, so a lone Escape waits for the next key.
    #[cfg(not(unix))]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            _ => Ok(Some(byte[0])),
        }
    }
}

// ─── ScriptedSource ──────────────────────────────────────────────────────────

/// Replays a fixed byte script.
///
/// Each byte of the script is returned in order. A `None` entry in the
/// script models a read timeout. Once the script is exhausted every read
/// fails with `UnexpectedEof`, which makes a runaway loop in a test end
/// with an error instead of hanging.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: VecDeque<Option<u8>>,
}

impl ScriptedSource {
    /// Create a source that yields `bytes` and then reports EOF.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            script: bytes.iter().copied().map(Some).collect(),
        }
    }

    /// Append more bytes to the end of the script.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.script.extend(bytes.iter().copied().map(Some));
    }

    /// Append one read timeout to the end of the script.
    pub fn push_timeout(&mut self) {
        self.script.push_back(None);
    }

    /// Number of scripted reads not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.script.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted")
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
