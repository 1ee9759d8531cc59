#![forbid(unsafe_code)]

//! The writing view: caret state, keystroke ingestion, and timeline drawing.
//!
//! The caret is a time cursor. Keystrokes stamp letters with its current
//! value; the animation tick advances it by `time_speed` per frame while
//! the view is [`Motion::Moving`]. Both run on the UI thread, so the caret
//! is a plain field.
//!
//! # State machine
//!
//! ```text
//!          letter / backspace (log > 1)
//!   Idle ────────────────────────────▶ Moving ──┐
//!    ▲                                    │     │ letter / backspace
//!    └──────── backspace (log <= 1) ──────┘ ◀───┘
//! ```
//!
//! Whenever the log becomes empty the caret returns to 0, whichever path
//! emptied it ([`WritingView::sync_with_log`]).

use jw_core::geometry::Rect;
use jw_render::cell::{Cell, StyleFlags};
use jw_render::frame::Frame;
use tracing::{debug, trace};

use crate::config::TimelineConfig;
use crate::input::Keystroke;
use crate::timeline::{Letter, LetterLog, Position, position};

/// Whether the caret advances on each animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    /// Nothing typed yet, or the log was backspaced to empty.
    #[default]
    Idle,
    /// The caret glides forward every frame.
    Moving,
}

/// State of the active writing view.
#[derive(Debug, Clone)]
pub struct WritingView {
    caret: f64,
    motion: Motion,
    container_width: u16,
    config: TimelineConfig,
}

impl WritingView {
    /// Mount the view over an existing log.
    ///
    /// A non-empty log seeds the caret a resume gap past the last letter so
    /// new typing does not collide with it.
    pub fn mount(log: &LetterLog, container_width: u16, config: TimelineConfig) -> Self {
        let caret = log
            .last()
            .map_or(0.0, |last| last.time() + config.resume_gap());
        debug!(caret, container_width, letters = log.len(), "writing view mounted");
        Self {
            caret,
            motion: Motion::Idle,
            container_width,
            config,
        }
    }

    /// Current caret time.
    #[inline]
    pub fn caret(&self) -> f64 {
        self.caret
    }

    /// Current motion state.
    #[inline]
    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Measured container width, in columns.
    #[inline]
    pub fn container_width(&self) -> u16 {
        self.container_width
    }

    /// Stamp `letter` at the caret. A space first advances the caret by the
    /// word gap.
    pub fn type_letter(&mut self, log: &mut LetterLog, letter: impl Into<String>) {
        let letter = letter.into();
        self.motion = Motion::Moving;
        if letter == " " {
            self.caret += self.config.word_gap();
        }
        trace!(caret = self.caret, letter = %letter, "letter stamped");
        log.push(self.caret, letter);
    }

    /// Remove the last letter and rewind the caret to the new last letter.
    ///
    /// With one letter or none, the log is cleared and the caret stops.
    pub fn backspace(&mut self, log: &mut LetterLog) {
        self.motion = Motion::Moving;
        if log.len() <= 1 {
            log.clear();
            self.motion = Motion::Idle;
            debug!("log backspaced to empty");
        } else {
            log.pop_last();
            if let Some(last) = log.last() {
                self.caret = last.time();
            }
        }
        self.sync_with_log(log);
    }

    /// Apply a classified keystroke.
    pub fn handle_keystroke(&mut self, log: &mut LetterLog, keystroke: Keystroke) {
        match keystroke {
            Keystroke::Letter(letter) => self.type_letter(log, letter),
            Keystroke::Backspace => self.backspace(log),
        }
    }

    /// Reset the caret to 0 if the log is empty. Run after any log mutation.
    pub fn sync_with_log(&mut self, log: &LetterLog) {
        if log.is_empty() {
            self.caret = 0.0;
        }
    }

    /// Advance one animation frame. The caret only glides while moving.
    pub fn frame_tick(&mut self) {
        if self.motion == Motion::Moving {
            self.caret += self.config.time_speed;
        }
    }

    /// Re-measure the container.
    pub fn resize(&mut self, container_width: u16) {
        if container_width != self.container_width {
            debug!(
                from = self.container_width,
                to = container_width,
                "writing view resized"
            );
            self.container_width = container_width;
        }
    }

    /// Where the caret is drawn, or `None` before the container is measured.
    pub fn caret_position(&self) -> Option<Position> {
        self.map(self.caret)
    }

    /// Every letter paired with its position at the current width.
    ///
    /// Empty while the container has no width.
    pub fn letter_positions<'a>(
        &self,
        log: &'a LetterLog,
    ) -> impl Iterator<Item = (&'a Letter, Position)> + 'a {
        let width = f64::from(self.container_width);
        let line_height = f64::from(self.config.line_height);
        log.iter().filter_map(move |letter| {
            position(letter.time(), width, line_height).map(|pos| (letter, pos))
        })
    }

    /// Draw the letters and the caret into `area`.
    ///
    /// Rows scroll so the caret's row stays visible. The caret is the
    /// reverse-video cell at its position.
    pub fn render(&self, log: &LetterLog, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let Some(caret) = self.caret_position() else {
            return;
        };
        let top = (caret.y as i64 - i64::from(area.height) + 1).max(0);

        frame.buffer.push_scissor(area);
        for (letter, pos) in self.letter_positions(log) {
            if let Some((x, y)) = cell_in(area, pos, top) {
                frame.buffer.set_string(x, y, letter.letter(), Cell::default());
            }
        }
        if let Some((x, y)) = cell_in(area, caret, top)
            && let Some(cell) = frame.buffer.get_mut(x, y)
        {
            cell.attrs |= StyleFlags::REVERSE;
        }
        frame.buffer.pop_scissor();
    }

    fn map(&self, time: f64) -> Option<Position> {
        position(
            time,
            f64::from(self.container_width),
            f64::from(self.config.line_height),
        )
    }
}

/// Screen cell for `pos`, with rows above `top` scrolled away.
fn cell_in(area: Rect, pos: Position, top: i64) -> Option<(u16, u16)> {
    let row = pos.y as i64 - top;
    let col = pos.x.floor() as i64;
    if !(0..i64::from(area.height)).contains(&row) || !(0..i64::from(area.width)).contains(&col) {
        return None;
    }
    Some((area.x + col as u16, area.y + row as u16))
}
