#![forbid(unsafe_code)]

//! Escape sequence writers.
//!
//! Stateless; the [`Presenter`](crate::presenter::Presenter) decides when to
//! call them.
//!
//! | Sequence | Meaning |
//! |----------|---------|
//! | `CSI n ; ... m` | SGR attributes |
//! | `CSI row ; col H` | Cursor position, 1-indexed |
//! | `CSI 2 J` | Erase display |
//! | `CSI ? 25 h/l` | Show/hide cursor |
//! | `CSI ? 2026 h/l` | Synchronized output |

use std::io::{self, Write};

use crate::cell::StyleFlags;

/// SGR codes for each style flag, in emission order.
const SGR_CODES: [(StyleFlags, u8); 4] = [
    (StyleFlags::BOLD, 1),
    (StyleFlags::DIM, 2),
    (StyleFlags::UNDERLINE, 4),
    (StyleFlags::REVERSE, 7),
];

/// `CSI 0 m`
#[inline]
pub fn sgr_reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// One SGR sequence switching on every flag in `flags`. Writes nothing for
/// an empty set and never resets first.
pub fn sgr_flags(w: &mut impl Write, flags: StyleFlags) -> io::Result<()> {
    let codes: Vec<String> = SGR_CODES
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, code)| code.to_string())
        .collect();
    if codes.is_empty() {
        return Ok(());
    }
    write!(w, "\x1b[{}m", codes.join(";"))
}

/// Move the cursor to 0-indexed `(col, row)`.
#[inline]
pub fn cup(w: &mut impl Write, row: u16, col: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(row) + 1, u32::from(col) + 1)
}

/// `CSI 2 J`
#[inline]
pub fn erase_display(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Show (`true`) or hide the cursor.
#[inline]
pub fn cursor_visible(w: &mut impl Write, visible: bool) -> io::Result<()> {
    w.write_all(if visible { b"\x1b[?25h" } else { b"\x1b[?25l" })
}

/// Open (`true`) or close a synchronized-output frame.
#[inline]
pub fn sync_output(w: &mut impl Write, begin: bool) -> io::Result<()> {
    w.write_all(if begin { b"\x1b[?2026h" } else { b"\x1b[?2026l" })
}
