#![forbid(unsafe_code)]

//! Cell-space rectangles.

/// A rectangle of terminal cells, origin top-left, edges half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `width` x `height` at the origin.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// First column past the rectangle.
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// First row past the rectangle.
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// `true` when the rectangle covers no cell.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.area() == 0
    }

    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        self.x <= x && x < self.right() && self.y <= y && y < self.bottom()
    }

    /// The overlap of two rectangles; [`Rect::default`] when they are
    /// disjoint.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let (x, y) = (self.x.max(other.x), self.y.max(other.y));
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::default();
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Drop `margin` columns from both sides. Collapses to zero width when
    /// the rectangle is narrower than both margins.
    pub fn shrink_x(&self, margin: u16) -> Rect {
        Rect {
            x: self.x.saturating_add(margin),
            width: self.width.saturating_sub(margin.saturating_mul(2)),
            ..*self
        }
    }

    /// Cut at `rows` from the top, returning `(top, rest)`.
    pub fn split_top(&self, rows: u16) -> (Rect, Rect) {
        let cut = rows.min(self.height);
        (
            Rect { height: cut, ..*self },
            Rect {
                y: self.y + cut,
                height: self.height - cut,
                ..*self
            },
        )
    }

    /// Cut at `rows` from the bottom, returning `(rest, bottom)`.
    pub fn split_bottom(&self, rows: u16) -> (Rect, Rect) {
        self.split_top(self.height - rows.min(self.height))
    }
}
