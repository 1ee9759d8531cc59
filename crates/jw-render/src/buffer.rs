#![forbid(unsafe_code)]

//! The cell grid a frame is drawn into.
//!
//! Cells are stored row-major. Writes are clipped against a stack of
//! scissor rectangles: a view pushes its area, draws freely, and pops.
//! The base scissor is the whole buffer and is never popped.

use crate::cell::Cell;
use jw_core::geometry::Rect;

/// A fixed-size grid of [`Cell`]s.
///
/// ```
/// use jw_render::buffer::Buffer;
/// use jw_render::cell::Cell;
///
/// let mut buffer = Buffer::new(20, 4);
/// buffer.set_string(2, 0, "Just write", Cell::default());
/// assert_eq!(buffer.get(2, 0).and_then(|c| c.content.as_char()), Some('J'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    scissors: Vec<Rect>,
}

impl Buffer {
    /// A blank grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            scissors: vec![Rect::from_size(width, height)],
        }
    }

    /// Columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a buffer has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The whole grid as a rectangle at the origin.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// The cell at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// The cell at `(x, y)`, mutably. Not clipped by the scissor.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// The cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    #[inline]
    pub fn get_unchecked(&self, x: u16, y: u16) -> &Cell {
        &self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Blank out any wide character that covers `(x, y)`.
    fn erase_wide_at(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else { return };

        // Walk left from a continuation to the head that owns it.
        let mut head_x = x;
        while self.cells[idx - usize::from(x - head_x)].is_continuation() && head_x > 0 {
            head_x -= 1;
        }
        let head_idx = idx - usize::from(x - head_x);
        let width = self.cells[head_idx].content.width();
        if width < 2 || usize::from(head_x) + width <= usize::from(x) {
            return;
        }
        let row_end = (usize::from(y) + 1) * usize::from(self.width);
        for cell in &mut self.cells[head_idx..(head_idx + width).min(row_end)] {
            *cell = Cell::default();
        }
    }

    /// Write `cell` at `(x, y)`.
    ///
    /// Nothing is written unless every column the cell covers is inside
    /// the current scissor. A wide character also fills the following
    /// columns with continuations, and any wide character it overlaps is
    /// erased first.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.content.width().max(1);
        let scissor = self.current_scissor();
        let fits = (0..width).all(|i| {
            u16::try_from(usize::from(x) + i).is_ok_and(|cx| scissor.contains(cx, y))
        });
        if !fits || self.index(x, y).is_none() {
            return;
        }

        for i in 0..width {
            self.erase_wide_at(x + i as u16, y);
        }
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.cells[idx] = cell;
        for tail in &mut self.cells[idx + 1..idx + width] {
            *tail = Cell::CONTINUATION;
        }
    }

    /// Write `text` from `(x, y)` in the attributes of `style`.
    ///
    /// Zero-width characters are dropped. Stops before the first character
    /// that would cross the scissor's right edge. Returns the column after
    /// the last character written.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Cell) -> u16 {
        let right = usize::from(self.current_scissor().right());
        let mut cx = x;
        for ch in text.chars() {
            let w = crate::char_width(ch);
            if w == 0 {
                continue;
            }
            if usize::from(cx) + w > right {
                break;
            }
            self.set(cx, y, style.with_char(ch));
            cx += w as u16;
        }
        cx
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        let start = usize::from(y) * usize::from(self.width);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// Narrow clipping to `rect` within the current scissor.
    pub fn push_scissor(&mut self, rect: Rect) {
        let next = self.current_scissor().intersection(&rect);
        self.scissors.push(next);
    }

    /// Undo the last [`push_scissor`](Self::push_scissor).
    pub fn pop_scissor(&mut self) {
        if self.scissors.len() > 1 {
            self.scissors.pop();
        }
    }

    /// The rectangle writes are clipped to.
    #[inline]
    pub fn current_scissor(&self) -> Rect {
        self.scissors.last().copied().unwrap_or_else(|| self.bounds())
    }
}
