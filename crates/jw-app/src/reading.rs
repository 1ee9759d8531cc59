#![forbid(unsafe_code)]

//! The reading view: the log flattened to plain text.

use jw_core::event::{KeyCode, KeyEvent, KeyEventKind};
use jw_core::geometry::Rect;
use jw_render::cell::Cell;
use jw_render::char_width;
use jw_render::frame::Frame;

use crate::timeline::LetterLog;

/// Scroll state of the reading view.
#[derive(Debug, Clone, Default)]
pub struct ReadingView {
    scroll: usize,
    width: u16,
    height: u16,
}

impl ReadingView {
    /// A view sized to the given container.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            scroll: 0,
            width,
            height,
        }
    }

    /// First visible line.
    #[inline]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Re-measure the container, keeping the scroll in range.
    pub fn resize(&mut self, width: u16, height: u16, log: &LetterLog) {
        self.width = width;
        self.height = height;
        self.scroll = self.scroll.min(self.max_scroll(log));
    }

    /// Scroll keys. Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent, log: &LetterLog) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let page = usize::from(self.height.max(1));
        let max = self.max_scroll(log);
        self.scroll = match key.code {
            KeyCode::Up => self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll + 1,
            KeyCode::PageUp => self.scroll.saturating_sub(page),
            KeyCode::PageDown => self.scroll + page,
            KeyCode::Home => 0,
            KeyCode::End => max,
            _ => return false,
        }
        .min(max);
        true
    }

    /// Wrapped lines of the flattened log at the current width.
    pub fn lines(&self, log: &LetterLog) -> Vec<String> {
        wrap(&log.text(), self.width)
    }

    /// Draw the visible lines into `area`.
    pub fn render(&self, log: &LetterLog, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let lines = wrap(&log.text(), area.width);
        let start = self.scroll.min(lines.len().saturating_sub(usize::from(area.height)));

        frame.buffer.push_scissor(area);
        for (row, line) in lines.iter().skip(start).take(usize::from(area.height)).enumerate() {
            frame
                .buffer
                .set_string(area.x, area.y + row as u16, line, Cell::default());
        }
        frame.buffer.pop_scissor();
    }

    fn max_scroll(&self, log: &LetterLog) -> usize {
        self.lines(log)
            .len()
            .saturating_sub(usize::from(self.height))
    }
}

/// Break `text` into lines at most `width` cells wide, by character.
///
/// A character wider than the whole line gets a line of its own.
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width);
    if width == 0 || text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if used + w > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            used = 0;
        }
        line.push(ch);
        used += w;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
