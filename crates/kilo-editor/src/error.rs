//! Error type for the editor core.
//!
//! Fatal conditions (the file named on the command line can't be read, the
//! terminal can't be measured, input or output fails) travel up to `main`
//! as [`Error`]. A failed save is also an [`Error`] at the [`Document`]
//! level, but the session turns it into a status message instead of
//! propagating it: losing a save is recoverable, losing the terminal isn't.
//!
//! [`Document`]: crate::document::Document

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in the editor core.
#[derive(Debug, Error)]
pub enum Error {
    /// The file given at startup could not be opened or read.
    #[error("{}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the document to disk failed.
    #[error("Can't save! I/O error: {0}")]
    Save(#[source] io::Error),

    /// Neither the ioctl nor the cursor-report probe produced a window size.
    #[error("unable to determine the terminal window size")]
    WindowSize(#[source] io::Error),

    /// Terminal input or output failed.
    #[error("terminal I/O: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
