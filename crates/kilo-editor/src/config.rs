//! Editor tunables.
//!
//! The few knobs that vary between runs live in [`Config`]; the binary
//! fills it from the command line. Values that are part of the display
//! format (the tab stop, the status bar filename width) are constants.

use std::time::Duration;

/// Render-column interval a tab advances to.
pub const TAB_STOP: usize = 8;

/// How many bytes of the filename the status bar shows.
pub const STATUS_FILENAME_WIDTH: usize = 20;

/// Quit presses needed to discard unsaved changes.
pub const DEFAULT_QUIT_TIMES: u32 = 3;

/// How long a status message stays on the message bar.
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// How a save reaches the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Write a temporary file next to the target, then rename it over the
    /// target. A failed save leaves the old file intact.
    #[default]
    Atomic,
    /// Open the target, truncate it to the new length, then write in place.
    ///
    /// This is the classic ordering: if the write fails after the truncate,
    /// the file on disk can end up shorter than both the old and the new
    /// content. Kept for byte-for-byte behavioral parity.
    Truncate,
}

/// Runtime configuration for an [`Editor`](crate::session::Editor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Quit presses needed to discard unsaved changes.
    pub quit_times: u32,
    /// How long a status message stays visible.
    pub message_timeout: Duration,
    /// Save strategy.
    pub save_mode: SaveMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quit_times: DEFAULT_QUIT_TIMES,
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            save_mode: SaveMode::default(),
        }
    }
}
