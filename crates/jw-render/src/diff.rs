#![forbid(unsafe_code)]

//! Which cells changed between two frames.
//!
//! The scan is row-major and groups neighbouring changed columns as it
//! goes, so the presenter gets one [`ChangeRun`] per stretch of changes and
//! moves the cursor once for each.
//!
//! ```
//! use jw_render::buffer::Buffer;
//! use jw_render::cell::Cell;
//! use jw_render::diff::BufferDiff;
//!
//! let old = Buffer::new(20, 4);
//! let mut new = Buffer::new(20, 4);
//! new.set_string(5, 1, "hi", Cell::default());
//!
//! let diff = BufferDiff::compute(&old, &new);
//! assert_eq!(diff.len(), 2);
//! assert_eq!(diff.runs().len(), 1);
//! ```

use crate::buffer::Buffer;

/// Changed columns `x0..=x1` of row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    pub y: u16,
    pub x0: u16,
    pub x1: u16,
}

impl ChangeRun {
    #[inline]
    pub const fn new(y: u16, x0: u16, x1: u16) -> Self {
        Self { y, x0, x1 }
    }

    /// Cells covered.
    #[inline]
    pub const fn len(&self) -> usize {
        (self.x1 - self.x0) as usize + 1
    }
}

/// Runs of changed cells, top to bottom and left to right.
#[derive(Debug, Clone, Default)]
pub struct BufferDiff {
    runs: Vec<ChangeRun>,
}

impl BufferDiff {
    /// No changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every cell of `buffer`, one run per row. For the first frame and
    /// after a resize, when the screen contents are unknown.
    pub fn full(buffer: &Buffer) -> Self {
        let last = buffer.width() - 1;
        Self {
            runs: (0..buffer.height())
                .map(|y| ChangeRun::new(y, 0, last))
                .collect(),
        }
    }

    /// Cells where `new` differs from `old`. The buffers must be the same
    /// size.
    pub fn compute(old: &Buffer, new: &Buffer) -> Self {
        debug_assert_eq!(
            (old.width(), old.height()),
            (new.width(), new.height()),
            "diffed buffers differ in size"
        );
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("diff", width = new.width(), height = new.height()).entered();

        let mut runs: Vec<ChangeRun> = Vec::new();
        for y in 0..new.height() {
            let changed = old
                .row_cells(y)
                .iter()
                .zip(new.row_cells(y))
                .zip(0u16..)
                .filter(|((before, after), _)| before != after)
                .map(|(_, x)| x);
            for x in changed {
                match runs.last_mut() {
                    Some(run) if run.y == y && run.x1 + 1 == x => run.x1 = x,
                    _ => runs.push(ChangeRun::new(y, x, x)),
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(runs = runs.len(), "diff computed");
        Self { runs }
    }

    /// Changed cells in total.
    pub fn len(&self) -> usize {
        self.runs.iter().map(ChangeRun::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    #[inline]
    pub fn runs(&self) -> &[ChangeRun] {
        &self.runs
    }
}
