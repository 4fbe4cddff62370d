// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns raw stdin bytes into keys. A key is either a literal byte (printable
// characters, Enter, Tab, Ctrl-letter combinations) or one of a small fixed
// set of named keys that terminals encode as escape sequences:
//
// - `ESC [ <digit> ~`  — Home (1, 7), Delete (3), End (4, 8), PageUp (5),
//                        PageDown (6)
// - `ESC [ <letter>`   — arrows (A B C D), End (F), Home (H)
// - `ESC O <letter>`   — Home (H), End (F) in application cursor mode
//
// # Escape vs escape-sequence ambiguity
//
// A lone ESC (0x1B) is either the Escape key or the first byte of a
// sequence. After ESC the decoder asks the byte source for the follow-up
// bytes; the source returns within its timeout, and an absent (or failed)
// follow-up means the ESC stood alone. Anything the table doesn't know
// also decodes as Escape, so a garbled sequence never wedges the editor.
//
// Only the wait for the *first* byte of a key is unbounded: the decoder
// keeps polling through timeouts until something arrives.

use std::io;

use crate::reader::ByteSource;

/// The ESC byte that introduces every escape sequence.
const ESC: u8 = 0x1B;

/// The byte a terminal sends for the Backspace key in raw mode.
const DEL: u8 = 0x7F;

// ─── Key ─────────────────────────────────────────────────────────────────────

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal byte: printable ASCII, Enter (`\r`), Tab, or a control byte.
    Byte(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Backspace,
    Escape,
}

impl Key {
    /// Enter, as sent by a raw-mode terminal.
    pub const ENTER: Self = Self::Byte(b'\r');

    /// Tab.
    pub const TAB: Self = Self::Byte(b'\t');

    /// The key produced by holding Ctrl and pressing `letter`.
    #[inline]
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self::Byte(ctrl_byte(letter))
    }

    /// Whether this is a printable ASCII byte (space through tilde).
    #[inline]
    #[must_use]
    pub const fn is_printable(self) -> bool {
        matches!(self, Self::Byte(b) if b.is_ascii() && !b.is_ascii_control())
    }
}

/// Map a letter to the control byte Ctrl+letter produces (strip bits 5–7).
#[inline]
#[must_use]
pub const fn ctrl_byte(letter: u8) -> u8 {
    letter & 0x1F
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Read the next key from `source`.
///
/// Waits (through any number of read timeouts) for the first byte, then
/// decodes. Escape sequences consume at most three follow-up bytes.
///
/// # Errors
///
/// Returns an error if reading the first byte of the key fails. Failures
/// while reading the follow-up bytes of an escape sequence are not errors:
/// they resolve the key to [`Key::Escape`].
pub fn read_key(source: &mut impl ByteSource) -> io::Result<Key> {
    let byte = loop {
        if let Some(b) = source.read_byte()? {
            break b;
        }
    };

    Ok(match byte {
        ESC => decode_escape(source),
        DEL => Key::Backspace,
        b => Key::Byte(b),
    })
}

/// Decode what follows an ESC byte that was already consumed.
fn decode_escape(source: &mut impl ByteSource) -> Key {
    let Some(first) = follow_up(source) else {
        return Key::Escape;
    };
    let Some(second) = follow_up(source) else {
        return Key::Escape;
    };

    match (first, second) {
        (b'[', digit @ b'0'..=b'9') => {
            if follow_up(source) != Some(b'~') {
                return Key::Escape;
            }
            match digit {
                b'1' | b'7' => Key::Home,
                b'3' => Key::Delete,
                b'4' | b'8' => Key::End,
                b'5' => Key::PageUp,
                b'6' => Key::PageDown,
                _ => Key::Escape,
            }
        }
        (b'[', letter) => match letter {
            b'A' => Key::ArrowUp,
            b'B' => Key::ArrowDown,
            b'C' => Key::ArrowRight,
            b'D' => Key::ArrowLeft,
            b'F' => Key::End,
            b'H' => Key::Home,
            _ => Key::Escape,
        },
        (b'O', b'H') => Key::Home,
        (b'O', b'F') => Key::End,
        _ => Key::Escape,
    }
}

/// One follow-up byte of an escape sequence. Timeouts and read errors
/// both mean "nothing followed".
fn follow_up(source: &mut impl ByteSource) -> Option<u8> {
    source.read_byte().ok().flatten()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
