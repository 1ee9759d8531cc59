#![forbid(unsafe_code)]

//! Timeline model: the letter log and the time-to-position mapping.
//!
//! Every keystroke is stamped with an abstract `time` scalar. Where a letter
//! appears is derived from that stamp at render time by [`position`], which
//! wraps the timeline into rows like a typewriter carriage:
//!
//! ```text
//! x = time mod W
//! y = floor(time / W) * H
//! ```
//!
//! Nothing positional is cached per letter, so a new container width
//! re-maps the whole log on the next frame.
//!
//! ```
//! use just_write::timeline::{position, LetterLog};
//!
//! let mut log = LetterLog::new();
//! log.push(0.0, "h");
//! log.push(0.5, "i");
//! assert_eq!(log.text(), "hi");
//!
//! let p = position(12.5, 10.0, 2.0).unwrap();
//! assert_eq!((p.x, p.y), (2.5, 2.0));
//! assert!(position(3.0, 0.0, 2.0).is_none());
//! ```

/// One logged keystroke. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    time: f64,
    letter: String,
}

impl Letter {
    /// Create a letter stamped at `time`.
    pub fn new(time: f64, letter: impl Into<String>) -> Self {
        Self {
            time,
            letter: letter.into(),
        }
    }

    /// The timeline stamp.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The captured character, or key name for named keys.
    #[inline]
    pub fn letter(&self) -> &str {
        &self.letter
    }
}

/// Ordered log of letters. Only appends and truncation from the end.
///
/// Times are nondecreasing in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LetterLog {
    entries: Vec<Letter>,
}

impl LetterLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a letter stamped at `time`.
    pub fn push(&mut self, time: f64, letter: impl Into<String>) {
        debug_assert!(
            self.last().is_none_or(|last| time >= last.time),
            "letter times must be nondecreasing"
        );
        self.entries.push(Letter::new(time, letter));
    }

    /// Remove and return the last letter.
    pub fn pop_last(&mut self) -> Option<Letter> {
        self.entries.pop()
    }

    /// Drop every letter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The most recent letter.
    #[inline]
    pub fn last(&self) -> Option<&Letter> {
        self.entries.last()
    }

    /// Number of letters.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been typed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Letters in typing order.
    pub fn iter(&self) -> std::slice::Iter<'_, Letter> {
        self.entries.iter()
    }

    /// All letters concatenated in order, without separators.
    pub fn text(&self) -> String {
        self.entries.iter().map(Letter::letter).collect()
    }
}

impl<'a> IntoIterator for &'a LetterLog {
    type Item = &'a Letter;
    type IntoIter = std::slice::Iter<'a, Letter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A mapped point on the timeline: `x` in columns, `y` in rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Offset within the row, in `[0, W)`.
    pub x: f64,
    /// Row offset; always a multiple of the line height.
    pub y: f64,
}

/// Map a timeline value to a position inside a container `container_width`
/// wide, with rows `line_height` apart.
///
/// Returns `None` while the container has no width (not measured yet) or
/// when `time` is not finite.
pub fn position(time: f64, container_width: f64, line_height: f64) -> Option<Position> {
    if container_width.is_nan() || container_width <= 0.0 || !time.is_finite() {
        return None;
    }
    Some(Position {
        x: time.rem_euclid(container_width),
        y: (time / container_width).floor() * line_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_tracks_order_and_text() {
        let mut log = LetterLog::new();
        assert!(log.is_empty());
        log.push(0.0, "h");
        log.push(0.25, "i");
        log.push(1.0, " ");
        log.push(1.25, "Enter");
        assert_eq!(log.len(), 4);
        assert_eq!(log.text(), "hi Enter");
        assert_eq!(log.last().map(Letter::time), Some(1.25));
        let times: Vec<f64> = log.iter().map(Letter::time).collect();
        assert_eq!(times, vec![0.0, 0.25, 1.0, 1.25]);
    }

    #[test]
    fn pop_last_and_clear() {
        let mut log = LetterLog::new();
        log.push(0.0, "a");
        log.push(1.0, "b");
        assert_eq!(log.pop_last(), Some(Letter::new(1.0, "b")));
        assert_eq!(log.text(), "a");
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.pop_last(), None);
    }

    #[test]
    fn equal_times_are_allowed() {
        let mut log = LetterLog::new();
        log.push(2.0, "a");
        log.push(2.0, "b");
        assert_eq!(log.len(), 2);
    }

    #[test]
    #[should_panic(expected = "nondecreasing")]
    #[cfg(debug_assertions)]
    fn decreasing_time_is_rejected_in_debug() {
        let mut log = LetterLog::new();
        log.push(2.0, "a");
        log.push(1.0, "b");
    }

    #[test]
    fn position_wraps_rows() {
        assert_eq!(position(0.0, 10.0, 2.0), Some(Position { x: 0.0, y: 0.0 }));
        assert_eq!(position(9.5, 10.0, 2.0), Some(Position { x: 9.5, y: 0.0 }));
        assert_eq!(position(10.0, 10.0, 2.0), Some(Position { x: 0.0, y: 2.0 }));
        assert_eq!(position(25.0, 10.0, 2.0), Some(Position { x: 5.0, y: 4.0 }));
    }

    #[test]
    fn position_guards_zero_width() {
        assert_eq!(position(5.0, 0.0, 2.0), None);
        assert_eq!(position(5.0, -3.0, 2.0), None);
        assert_eq!(position(5.0, f64::NAN, 2.0), None);
    }

    #[test]
    fn position_rejects_non_finite_time() {
        assert_eq!(position(f64::INFINITY, 10.0, 2.0), None);
        assert_eq!(position(f64::NAN, 10.0, 2.0), None);
    }

    #[test]
    fn negative_time_stays_in_row_bounds() {
        let p = position(-2.5, 10.0, 2.0).unwrap();
        assert_eq!(p, Position { x: 7.5, y: -2.0 });
    }
}
