// SPDX-License-Identifier: MIT
//
// Raw mode, screen size, and getting the terminal back.
//
// `unsafe` here is confined to the libc calls: tcgetattr/tcsetattr, the
// TIOCGWINSZ ioctl, isatty, and one raw write(2) in the panic hook.
#![allow(unsafe_code)]
//
// `Terminal` is a guard. `enter` saves the cooked termios, switches to raw
// mode and the alternate screen; `leave` (also run on drop) undoes both.
// Every exit from the editor unwinds through that guard: a confirmed quit,
// an error returned from the main loop, or a panic. For the panic case a
// copy of the saved termios also lives in a static, and a hook restores it
// before the default panic message is printed.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::reader::ByteSource;

/// Switch to the alternate screen.
const ALT_SCREEN_ON: &[u8] = b"\x1b[?1049h";

/// Reset attributes, show the cursor, then leave the alternate screen.
const RESTORE_SCREEN: &[u8] = b"\x1b[m\x1b[?25h\x1b[?1049l";

// ─── Size ───────────────────────────────────────────────────────────────────

/// Window size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

/// Window size from `ioctl(TIOCGWINSZ)` on stdout. `None` when the ioctl
/// fails or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    // SAFETY: winsize is plain old data; the ioctl fills it in.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col != 0 && ws.ws_row != 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Cursor-report fallback ─────────────────────────────────────────────────

/// Longest cursor position report we are willing to read.
const MAX_REPORT_LEN: usize = 32;

/// Measure the window by pushing the cursor into the bottom-right corner
/// and asking the terminal where it ended up.
///
/// Needs raw mode, since the reply (`ESC [ rows ; cols R`) arrives on
/// `input` like any other key bytes.
///
/// # Errors
///
/// Returns an error if the probe can't be written or the reply is missing
/// or malformed.
pub fn query_size_via_cursor(
    input: &mut impl ByteSource,
    output: &mut impl Write,
) -> io::Result<Size> {
    ansi::cursor_to_far_corner(output)?;
    ansi::request_cursor_position(output)?;
    output.flush()?;

    let mut reply = Vec::with_capacity(MAX_REPORT_LEN);
    while reply.len() < MAX_REPORT_LEN {
        match input.read_byte()? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }

    parse_cursor_report(&reply).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "bad cursor position report")
    })
}

/// Parse `ESC [ rows ; cols` (the trailing `R` already stripped).
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let (rows, cols) = std::str::from_utf8(body).ok()?.split_once(';')?;
    let rows: u16 = rows.parse().ok()?;
    let cols: u16 = cols.parse().ok()?;
    (rows > 0 && cols > 0).then_some(Size { cols, rows })
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// Turn a cooked `termios` into the raw one the editor runs under.
///
/// - input: no break-to-SIGINT, no CR→NL, no parity check, no stripping of
///   the 8th bit, no Ctrl-S/Ctrl-Q flow control
/// - output: no post-processing (`\n` is not turned into `\r\n`)
/// - local: no echo, no line buffering, no Ctrl-V, no Ctrl-C/Ctrl-Z signals
/// - `read` returns as soon as one byte is there; timeouts come from poll(2)
#[cfg(unix)]
pub fn make_raw(t: &mut libc::termios) {
    t.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    t.c_oflag &= !libc::OPOST;
    t.c_cflag |= libc::CS8;
    t.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    t.c_cc[libc::VMIN] = 1;
    t.c_cc[libc::VTIME] = 0;
}

#[cfg(unix)]
fn get_termios() -> io::Result<libc::termios> {
    // SAFETY: termios is plain old data; tcgetattr fills it in.
    let mut t: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut t) } == 0 {
        Ok(t)
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(unix)]
fn set_termios(t: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, t) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

// ─── Panic restore ──────────────────────────────────────────────────────────

/// Cooked termios for the panic hook, set while raw mode is on.
#[cfg(unix)]
static COOKED: Mutex<Option<libc::termios>> = Mutex::new(None);

static HOOK: Once = Once::new();

/// Chain a panic hook that puts the terminal back before the default hook
/// prints the panic message.
fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

/// Undo raw mode from a panic. Writes straight to fd 1 because the
/// panicking thread may be holding the stdout lock mid-frame.
fn restore_after_panic() {
    #[cfg(unix)]
    {
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                RESTORE_SCREEN.as_ptr().cast(),
                RESTORE_SCREEN.len(),
            );
        }
        if let Ok(saved) = COOKED.lock() {
            if let Some(t) = saved.as_ref() {
                let _ = set_termios(t);
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(RESTORE_SCREEN);
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Raw-mode guard.
///
/// ```no_run
/// use kilo_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // draw, read keys ...
/// // dropping `term` restores the terminal
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Default)]
pub struct Terminal {
    #[cfg(unix)]
    cooked: Option<libc::termios>,
    active: bool,
}

impl Terminal {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(unix)]
            cooked: None,
            active: false,
        }
    }

    /// Whether raw mode is on.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter raw mode and the alternate screen, cleared, cursor home.
    /// Does nothing if already active.
    ///
    /// # Errors
    ///
    /// Fails with `Unsupported` when stdin is not a terminal, or with the
    /// OS error from termios or the first write.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw_on()?;
        self.active = true;

        let mut out = io::stdout().lock();
        out.write_all(ALT_SCREEN_ON)?;
        ansi::clear_screen(&mut out)?;
        ansi::cursor_home(&mut out)?;
        out.flush()
    }

    /// Clear the screen, leave the alternate screen and restore cooked
    /// mode. Does nothing if not active.
    ///
    /// # Errors
    ///
    /// Returns the write or termios error. Cooked mode is restored even if
    /// the screen writes fail.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let screen = {
            let mut out = io::stdout().lock();
            ansi::clear_screen(&mut out)
                .and_then(|()| ansi::cursor_home(&mut out))
                .and_then(|()| out.write_all(RESTORE_SCREEN))
                .and_then(|()| out.flush())
        };
        self.raw_off()?;
        screen
    }

    /// The window size: `TIOCGWINSZ` first, then the cursor-report probe.
    ///
    /// # Errors
    ///
    /// Returns the probe's error if the ioctl gives nothing.
    pub fn window_size(&self, input: &mut impl ByteSource) -> io::Result<Size> {
        match get_size() {
            Some(size) => Ok(size),
            None => query_size_via_cursor(input, &mut io::stdout().lock()),
        }
    }

    #[cfg(unix)]
    fn raw_on(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdin is not a terminal",
            ));
        }
        let cooked = get_termios()?;
        let mut raw = cooked;
        make_raw(&mut raw);
        set_termios(&raw)?;

        self.cooked = Some(cooked);
        if let Ok(mut saved) = COOKED.lock() {
            *saved = Some(cooked);
        }
        Ok(())
    }

    #[cfg(unix)]
    fn raw_off(&mut self) -> io::Result<()> {
        let Some(cooked) = self.cooked.take() else {
            return Ok(());
        };
        if let Ok(mut saved) = COOKED.lock() {
            *saved = None;
        }
        set_termios(&cooked)
    }

    #[cfg(not(unix))]
    fn raw_on(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw mode needs a unix terminal",
        ))
    }

    #[cfg(not(unix))]
    fn raw_off(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
