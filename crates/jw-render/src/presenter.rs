#![forbid(unsafe_code)]

//! Turns buffer diffs into terminal output.
//!
//! The presenter remembers the cursor position and the active attributes
//! so each run of changed cells costs one cursor move and attribute
//! changes are only written when they change. A frame is buffered whole
//! and flushed once, optionally inside synchronized-output brackets so the
//! terminal never shows half a frame.
//!
//! ```
//! use jw_render::buffer::Buffer;
//! use jw_render::cell::Cell;
//! use jw_render::diff::BufferDiff;
//! use jw_render::presenter::Presenter;
//!
//! let mut presenter = Presenter::new(Vec::new(), false);
//! let before = Buffer::new(10, 2);
//! let mut after = Buffer::new(10, 2);
//! after.set(0, 0, Cell::from_char('a'));
//!
//! presenter.present(&after, &BufferDiff::compute(&before, &after))?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, BufWriter, Write};

use crate::ansi;
use crate::buffer::Buffer;
use crate::cell::{Cell, StyleFlags};
use crate::diff::BufferDiff;

const WRITE_BUFFER: usize = 16 * 1024;

/// Stateful ANSI writer.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// Attributes in effect; `None` after a reset or before the first cell.
    attrs: Option<StyleFlags>,
    /// Where the terminal cursor is, if known.
    cursor: Option<(u16, u16)>,
    sync_output: bool,
}

impl<W: Write> Presenter<W> {
    /// Wrap `writer`. With `sync_output`, frames are bracketed in
    /// `CSI ? 2026 h/l`.
    pub fn new(writer: W, sync_output: bool) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITE_BUFFER, writer),
            attrs: None,
            cursor: None,
            sync_output,
        }
    }

    /// Write the cells of `buffer` that `diff` marks as changed, then reset
    /// attributes and flush.
    pub fn present(&mut self, buffer: &Buffer, diff: &BufferDiff) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "present",
            width = buffer.width(),
            height = buffer.height(),
            changes = diff.len()
        )
        .entered();

        if self.sync_output {
            ansi::sync_output(&mut self.writer, true)?;
        }
        for run in diff.runs() {
            self.move_to(run.x0, run.y)?;
            for x in run.x0..=run.x1 {
                self.write_cell(buffer.get_unchecked(x, run.y))?;
            }
        }
        ansi::sgr_reset(&mut self.writer)?;
        self.attrs = None;
        if self.sync_output {
            ansi::sync_output(&mut self.writer, false)?;
        }
        self.writer.flush()
    }

    fn write_cell(&mut self, cell: &Cell) -> io::Result<()> {
        // Drawn by the head cell to the left.
        if cell.is_continuation() {
            return Ok(());
        }
        if self.attrs != Some(cell.attrs) {
            ansi::sgr_reset(&mut self.writer)?;
            ansi::sgr_flags(&mut self.writer, cell.attrs)?;
            self.attrs = Some(cell.attrs);
        }

        let ch = cell.content.as_char().unwrap_or(' ');
        let mut utf8 = [0u8; 4];
        self.writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;

        if let Some((x, y)) = self.cursor {
            self.cursor = Some((x.saturating_add(cell.content.width() as u16), y));
        }
        Ok(())
    }

    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if self.cursor != Some((x, y)) {
            ansi::cup(&mut self.writer, y, x)?;
            self.cursor = Some((x, y));
        }
        Ok(())
    }

    /// Erase the screen and home the cursor.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        ansi::erase_display(&mut self.writer)?;
        ansi::cup(&mut self.writer, 0, 0)?;
        self.cursor = Some((0, 0));
        self.writer.flush()
    }

    /// Hide the terminal cursor.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        ansi::cursor_visible(&mut self.writer, false)?;
        self.writer.flush()
    }

    /// Show the terminal cursor.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        ansi::cursor_visible(&mut self.writer, true)?;
        self.writer.flush()
    }

    /// Forget the tracked cursor and attributes, e.g. after a resize.
    pub fn reset(&mut self) {
        self.attrs = None;
        self.cursor = None;
    }

    /// Flush and return the writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}
