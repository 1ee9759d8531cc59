#![forbid(unsafe_code)]

//! What a view draws into.
//!
//! A [`Frame`] is a [`Buffer`] plus, when the caller wants mouse targets,
//! a [`HitGrid`] recording which clickable region owns each cell. The
//! terminal cursor is never positioned by a frame; views paint their own
//! caret.
//!
//! ```
//! use jw_core::geometry::Rect;
//! use jw_render::frame::{Frame, HitId};
//!
//! let mut frame = Frame::with_hit_grid(20, 4);
//! frame.register_hit_region(Rect::new(0, 3, 5, 1), HitId::new(2));
//! assert_eq!(frame.hit_test(1, 3), Some(HitId::new(2)));
//! assert_eq!(frame.hit_test(5, 3), None);
//! ```

use crate::buffer::Buffer;
use jw_core::geometry::Rect;

/// Names a clickable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HitId(u32);

impl HitId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Owner of each cell, row-major.
#[derive(Debug, Clone)]
pub struct HitGrid {
    bounds: Rect,
    owners: Vec<Option<HitId>>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            bounds: Rect::from_size(width, height),
            owners: vec![None; usize::from(width) * usize::from(height)],
        }
    }

    fn row_span(&self, y: u16, x0: u16, x1: u16) -> std::ops::Range<usize> {
        let row = usize::from(y) * usize::from(self.bounds.width);
        row + usize::from(x0)..row + usize::from(x1)
    }

    /// Claim the cells of `rect` for `id`, over anything claimed earlier.
    pub fn register(&mut self, rect: Rect, id: HitId) {
        let area = rect.intersection(&self.bounds);
        for y in area.y..area.bottom() {
            let span = self.row_span(y, area.x, area.right());
            self.owners[span].fill(Some(id));
        }
    }

    /// Owner of `(x, y)`.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<HitId> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        self.owners[self.row_span(y, x, x + 1)][0]
    }
}

/// A buffer being drawn, with optional hit testing.
#[derive(Debug)]
pub struct Frame {
    pub buffer: Buffer,
    /// Present only when the caller asked for mouse targets.
    pub hit_grid: Option<HitGrid>,
}

impl Frame {
    /// A frame that ignores hit regions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: None,
        }
    }

    /// A frame that records hit regions.
    pub fn with_hit_grid(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: Some(HitGrid::new(width, height)),
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }

    /// Make `rect` clickable as `id`, limited to the buffer's current
    /// scissor. `false` when this frame keeps no hit grid.
    pub fn register_hit_region(&mut self, rect: Rect, id: HitId) -> bool {
        let visible = rect.intersection(&self.buffer.current_scissor());
        match self.hit_grid.as_mut() {
            Some(grid) => {
                grid.register(visible, id);
                true
            }
            None => false,
        }
    }

    /// Owner of `(x, y)`, when hit testing is on.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<HitId> {
        self.hit_grid.as_ref()?.hit_test(x, y)
    }
}
