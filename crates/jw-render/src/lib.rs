#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, diffs, and ANSI presentation.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod frame;
pub mod presenter;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a single character in terminal cells.
///
/// Control characters report zero width.
#[inline]
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Display width of a string in terminal cells.
#[inline]
pub fn display_width(text: &str) -> usize {
    text.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_single_width() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn cjk_is_double_width() {
        assert_eq!(char_width('中'), 2);
        assert_eq!(display_width("中文"), 4);
    }

    #[test]
    fn control_chars_have_no_width() {
        assert_eq!(char_width('\u{7}'), 0);
    }
}
