//! # kilo-editor — Editor core for kilo
//!
//! The editing engine, independent of any real terminal:
//!
//! - **[`row`]** — `Row`: one line of raw bytes plus its tab-expanded render form
//! - **[`document`]** — `Document`: the row store, dirty tracking, load and save
//! - **[`cursor`]** — cursor position and movement over a `Document`
//! - **[`viewport`]** — scroll offsets and buffer-column ↔ render-column mapping
//! - **[`status`]** — the timed status message
//! - **[`compose`]** — builds one complete screen frame in memory
//! - **[`session`]** — `Editor`: cursor, key dispatch, quit guard, the main loop
//! - **[`prompt`]** — the modal line-input sub-loop used by save-as and search
//! - **[`search`]** — incremental find
//! - **[`config`]** / **[`error`]** — tunables and the crate error type
//!
//! Input arrives through [`kilo_term::reader::ByteSource`] and frames leave
//! through any [`std::io::Write`], so a whole session can be driven from a
//! byte script in tests.

pub mod compose;
pub mod config;
pub mod cursor;
pub mod document;
pub mod error;
pub mod prompt;
pub mod row;
pub mod search;
pub mod session;
pub mod status;
pub mod viewport;
