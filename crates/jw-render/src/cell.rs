#![forbid(unsafe_code)]

//! Grid cells.
//!
//! A [`Cell`] holds one character and its style flags. The editor draws in
//! the terminal's default colors, so cells carry no color; emphasis is
//! bold for the title and reverse video for the caret and the focused
//! control. A character wider than one column is stored in a head cell
//! followed by [`CellContent::Continuation`] cells.

use crate::char_width;

/// What a cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellContent {
    /// Nothing; presented as a space.
    #[default]
    Empty,
    /// One character.
    Char(char),
    /// Covered by the wide character to its left.
    Continuation,
}

impl CellContent {
    /// The character, if this cell holds one.
    #[inline]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            Self::Empty | Self::Continuation => None,
        }
    }

    /// Columns the content occupies. Empty cells take one column and
    /// continuations none.
    #[inline]
    pub fn width(self) -> usize {
        match self {
            Self::Empty => 1,
            Self::Char(c) => char_width(c),
            Self::Continuation => 0,
        }
    }
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    /// Character content.
    pub content: CellContent,
    /// Style flags.
    pub attrs: StyleFlags,
}

impl Cell {
    /// The tail of a wide character.
    pub const CONTINUATION: Self = Self {
        content: CellContent::Continuation,
        attrs: StyleFlags::empty(),
    };

    /// An unstyled cell showing `c`.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self {
            content: CellContent::Char(c),
            attrs: StyleFlags::empty(),
        }
    }

    /// `true` for the tail of a wide character.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        matches!(self.content, CellContent::Continuation)
    }

    /// `true` when nothing is drawn here.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    /// This cell's style showing `c` instead.
    #[inline]
    pub const fn with_char(mut self, c: char) -> Self {
        self.content = CellContent::Char(c);
        self
    }

    /// Replace the style flags.
    #[inline]
    pub const fn with_attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = attrs;
        self
    }
}

bitflags::bitflags! {
    /// Text attributes, each mapping to one SGR code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold (SGR 1).
        const BOLD      = 1;
        /// Dim (SGR 2).
        const DIM       = 1 << 1;
        /// Underline (SGR 4).
        const UNDERLINE = 1 << 2;
        /// Reverse video (SGR 7).
        const REVERSE   = 1 << 3;
    }
}
