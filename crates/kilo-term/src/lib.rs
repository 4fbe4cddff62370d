// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal layer for kilo.
//
// Everything that touches the terminal directly lives here: raw mode via
// termios, window size queries, a bounded-time byte source on stdin, the
// key decoder that turns those bytes into keys, and a frame buffer that
// lets the editor emit a whole screen in a single write.
//
// The editor core never talks to file descriptors. It pulls bytes through
// the `ByteSource` trait and pushes frames through `std::io::Write`, which
// is what makes the core testable with scripted input and a `Vec<u8>`.

pub mod ansi;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
