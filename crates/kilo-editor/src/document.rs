//! Document — the row store.
//!
//! A `Document` is an ordered `Vec<Row>` (index = line number), the optional
//! file it came from, and a dirty counter. Every row mutation bumps the
//! counter; loading and saving reset it.
//!
//! # Addressing
//!
//! Rows are addressed `0..row_count()` and columns `0..=row.len()`. The
//! session clamps its cursor before calling in, so an out-of-range position
//! here means the user pushed against an edge of the buffer. Such calls are
//! no-ops that return `false`, not errors.
//!
//! # Saving
//!
//! The on-disk format is each row's content followed by a single `\n`,
//! written in full every time. How the bytes reach the disk depends on
//! [`SaveMode`]; see [`write_atomic`] and [`write_truncating`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::SaveMode;
use crate::error::{Error, Result};
use crate::row::Row;

/// Mode for files the editor creates.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// An in-memory text document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rows: Vec<Row>,
    filename: Option<PathBuf>,
    dirty: u64,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// An empty, unnamed, clean document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clean, unnamed document holding `text` split into lines.
    ///
    /// Lines end at `\n`; trailing `\r` bytes are stripped from each line.
    /// A final line without a newline still becomes a row; the empty string
    /// after a final newline does not.
    #[must_use]
    pub fn from_bytes(text: &[u8]) -> Self {
        let mut pieces: Vec<&[u8]> = text.split(|&b| b == b'\n').collect();
        if pieces.last().is_some_and(|last| last.is_empty()) {
            pieces.pop();
        }

        let rows = pieces
            .into_iter()
            .map(|line| {
                let end = line
                    .iter()
                    .rposition(|&b| b != b'\r')
                    .map_or(0, |i| i + 1);
                Row::new(&line[..end])
            })
            .collect();

        Self {
            rows,
            filename: None,
            dirty: 0,
        }
    }

    /// Load `path` into a clean document named after it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc = Self::from_bytes(&bytes);
        doc.filename = Some(path.to_path_buf());
        info!(path = %path.display(), rows = doc.row_count(), "opened file");
        Ok(doc)
    }

    // -- Access -------------------------------------------------------------

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row `at`, if it exists.
    #[inline]
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Length of row `at`, or 0 if it doesn't exist (the past-the-end line).
    #[inline]
    #[must_use]
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    /// The file this document saves to.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Name (or rename) the document.
    pub fn set_filename(&mut self, path: PathBuf) {
        self.filename = Some(path);
    }

    /// True if anything changed since the last load or save.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    // -- Row store operations -----------------------------------------------

    /// Insert a new row holding `text` at index `at` (`at == row_count`
    /// appends).
    pub fn insert_row(&mut self, at: usize, text: &[u8]) -> bool {
        if at > self.rows.len() {
            return false;
        }
        self.rows.insert(at, Row::new(text));
        self.dirty += 1;
        true
    }

    /// Remove row `at`.
    pub fn delete_row(&mut self, at: usize) -> bool {
        if at >= self.rows.len() {
            return false;
        }
        self.rows.remove(at);
        self.dirty += 1;
        true
    }

    /// Insert `ch` into row `row` before column `at`.
    pub fn insert_char(&mut self, row: usize, at: usize, ch: u8) -> bool {
        let done = self
            .rows
            .get_mut(row)
            .is_some_and(|r| r.insert_byte(at, ch));
        self.touch(done)
    }

    /// Delete the byte at column `at` of row `row`.
    pub fn delete_char(&mut self, row: usize, at: usize) -> bool {
        let done = self.rows.get_mut(row).is_some_and(|r| r.delete_byte(at));
        self.touch(done)
    }

    /// Append `text` to the end of row `row`.
    pub fn append_text(&mut self, row: usize, text: &[u8]) -> bool {
        let done = self.rows.get_mut(row).is_some_and(|r| {
            r.append(text);
            true
        });
        self.touch(done)
    }

    /// Cut row `row` at column `at`; the tail becomes a new row right after it.
    pub fn split_row(&mut self, row: usize, at: usize) -> bool {
        let Some(tail) = self.rows.get_mut(row).and_then(|r| r.split_off(at)) else {
            return false;
        };
        self.rows.insert(row + 1, Row::new(tail));
        self.dirty += 1;
        true
    }

    /// Append row `row` to the row above it and remove it.
    pub fn join_row(&mut self, row: usize) -> bool {
        if row == 0 || row >= self.rows.len() {
            return false;
        }
        let moved = self.rows.remove(row);
        self.rows[row - 1].append(moved.content());
        self.dirty += 1;
        true
    }

    /// Bump the dirty counter if an operation took effect.
    const fn touch(&mut self, done: bool) -> bool {
        if done {
            self.dirty += 1;
        }
        done
    }

    // -- Serialization and saving -------------------------------------------

    /// The document in save format: each row followed by `\n`.
    #[must_use]
    pub fn rows_to_text(&self) -> Vec<u8> {
        let len = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut text = Vec::with_capacity(len);
        for row in &self.rows {
            text.extend_from_slice(row.content());
            text.push(b'\n');
        }
        text
    }

    /// Write the document to its filename and mark it clean.
    ///
    /// Returns the number of bytes written. On failure the document (rows
    /// and dirty state) is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Save`] if the document has no filename or the write
    /// fails.
    pub fn save(&mut self, mode: SaveMode) -> Result<usize> {
        let path = self.filename.clone().ok_or_else(|| {
            Error::Save(io::Error::new(io::ErrorKind::NotFound, "no file name"))
        })?;
        let text = self.rows_to_text();

        let written = match mode {
            SaveMode::Atomic => write_atomic(&path, &text),
            SaveMode::Truncate => write_truncating(&path, &text),
        };
        written.map_err(Error::Save)?;

        self.dirty = 0;
        info!(path = %path.display(), bytes = text.len(), ?mode, "saved file");
        Ok(text.len())
    }
}

// ---------------------------------------------------------------------------
// Write strategies
// ---------------------------------------------------------------------------

/// Write `data` to a temporary file beside the target, then rename it into
/// place.
///
/// The rename is the commit point: until it happens the old file is
/// untouched. A symlinked `path` is resolved first, so the link survives and
/// its target gets the new contents. An existing target's permissions carry
/// over; a new file gets [`NEW_FILE_MODE`] less the umask, as
/// [`write_truncating`] does. A target with more than one hard link is
/// written in place instead, since a rename would split it from its other
/// names.
///
/// # Errors
///
/// Returns any error from resolving the target, or from creating, writing,
/// syncing, or renaming the temporary file.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let existing = fs::metadata(path).ok();

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        if existing.as_ref().is_some_and(|meta| meta.nlink() > 1) {
            debug!(path = %path.display(), "target is hard-linked, writing in place");
            return write_truncating(path, data);
        }
    }

    let target = match existing {
        Some(_) => fs::canonicalize(path)?,
        None => path.to_path_buf(),
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".kilo-save");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(NEW_FILE_MODE));
    }

    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    if let Some(meta) = &existing {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    debug!(
        tmp = %tmp.path().display(),
        target = %target.display(),
        "renaming temporary save file into place"
    );
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Open `path`, truncate it to the new length, and write `data` over it.
///
/// If the write fails after the truncate the file is left holding a mix of
/// new bytes and stale (or zero) bytes, shorter than or equal to the new
/// length.
///
/// # Errors
///
/// Returns any error from opening, truncating, or writing the file.
pub fn write_truncating(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.read(true).write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(NEW_FILE_MODE);
    }
    let mut file = opts.open(path)?;
    truncate_then_write(&mut file, data)
}

/// A writable file-like target that can be resized.
pub trait Truncate: Write {
    /// Resize the target to exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be resized.
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl Truncate for File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

/// The in-place save ordering: resize first, then write from the start.
///
/// # Errors
///
/// Returns any error from resizing or writing `target`.
pub fn truncate_then_write(target: &mut impl Truncate, data: &[u8]) -> io::Result<()> {
    target.set_len(data.len() as u64)?;
    target.write_all(data)?;
    target.flush()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
