#![forbid(unsafe_code)]

//! Shared UI chrome: layout, header, and the footer controls.
//!
//! ```text
//! row 0       Just write            header
//! row 1                             spacer
//! rows 2..    ··letters·· / text    body (container inset 2 columns each side)
//! last row    [ read ] [ clear ]    footer
//! ```

use jw_core::geometry::Rect;
use jw_render::cell::{Cell, StyleFlags};
use jw_render::display_width;
use jw_render::frame::{Frame, HitId};

/// Title shown in the header.
pub const TITLE: &str = "Just write";

/// Horizontal inset of the container inside the body, per side.
pub const HORIZONTAL_MARGIN: u16 = 2;

/// Base hit ID for footer controls. Control i has HitId(CONTROL_HIT_BASE + i).
pub const CONTROL_HIT_BASE: u32 = 100;

/// A footer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Switch between writing and reading.
    ReadWrite,
    /// Empty the log.
    Clear,
}

impl Control {
    /// Controls in focus order.
    pub const ALL: [Control; 2] = [Control::ReadWrite, Control::Clear];

    fn index(self) -> usize {
        match self {
            Self::ReadWrite => 0,
            Self::Clear => 1,
        }
    }

    /// Hit ID registered for this control.
    pub fn hit_id(self) -> HitId {
        HitId::new(CONTROL_HIT_BASE + self.index() as u32)
    }

    /// The control a hit ID belongs to.
    pub fn from_hit_id(id: HitId) -> Option<Self> {
        let idx = id.id().checked_sub(CONTROL_HIT_BASE)?;
        Self::ALL.get(idx as usize).copied()
    }

    /// Button label. The mode control names the mode it switches to.
    pub fn label(self, writing: bool) -> &'static str {
        match self {
            Self::ReadWrite if writing => "read",
            Self::ReadWrite => "write",
            Self::Clear => "clear",
        }
    }

    /// Focus after Tab.
    pub fn next(focus: Option<Self>) -> Self {
        match focus {
            Some(c) => Self::ALL[(c.index() + 1) % Self::ALL.len()],
            None => Self::ALL[0],
        }
    }

    /// Focus after Shift+Tab.
    pub fn prev(focus: Option<Self>) -> Self {
        match focus {
            Some(c) => Self::ALL[(c.index() + Self::ALL.len() - 1) % Self::ALL.len()],
            None => Self::ALL[Self::ALL.len() - 1],
        }
    }
}

fn button_text(control: Control, writing: bool) -> String {
    format!("[ {} ]", control.label(writing))
}

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeLayout {
    /// Title row.
    pub header: Rect,
    /// Everything between the spacer and the footer.
    pub body: Rect,
    /// The body minus its horizontal margins: where letters are laid out.
    pub container: Rect,
    /// Bottom row holding the controls.
    pub footer: Rect,
    /// The read/write button.
    pub read_write: Rect,
    /// The clear button.
    pub clear: Rect,
}

impl ChromeLayout {
    /// Lay out `area`. Button widths depend on the current mode's labels.
    pub fn compute(area: Rect, writing: bool) -> Self {
        let (header, rest) = area.split_top(1);
        let (_spacer, rest) = rest.split_top(1);
        let (body, footer) = rest.split_bottom(1);
        let container = body.shrink_x(HORIZONTAL_MARGIN);

        let inner_footer = footer.shrink_x(HORIZONTAL_MARGIN);
        let mut x = inner_footer.x;
        let mut place = |control: Control| {
            let width = display_width(&button_text(control, writing)) as u16;
            let rect = Rect::new(x, footer.y, width, footer.height).intersection(&inner_footer);
            x = x.saturating_add(width + 1);
            rect
        };
        let read_write = place(Control::ReadWrite);
        let clear = place(Control::Clear);

        Self {
            header,
            body,
            container,
            footer,
            read_write,
            clear,
        }
    }

    /// Rectangle of a control's button.
    pub fn control_rect(&self, control: Control) -> Rect {
        match control {
            Control::ReadWrite => self.read_write,
            Control::Clear => self.clear,
        }
    }
}

/// Draw the title.
pub fn render_header(frame: &mut Frame, area: Rect) {
    if area.is_empty() {
        return;
    }
    frame.buffer.push_scissor(area);
    frame.buffer.set_string(
        area.x.saturating_add(HORIZONTAL_MARGIN),
        area.y,
        TITLE,
        Cell::default().with_attrs(StyleFlags::BOLD),
    );
    frame.buffer.pop_scissor();
}

/// Draw the footer buttons and register their hit regions. The focused
/// button is drawn in reverse video.
pub fn render_footer(frame: &mut Frame, layout: &ChromeLayout, writing: bool, focus: Option<Control>) {
    for control in Control::ALL {
        let rect = layout.control_rect(control);
        if rect.is_empty() {
            continue;
        }
        let attrs = if focus == Some(control) {
            StyleFlags::REVERSE
        } else {
            StyleFlags::empty()
        };
        frame.buffer.push_scissor(rect);
        frame.buffer.set_string(
            rect.x,
            rect.y,
            &button_text(control, writing),
            Cell::default().with_attrs(attrs),
        );
        frame.buffer.pop_scissor();
        frame.register_hit_region(rect, control.hit_id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ids_round_trip() {
        for c in Control::ALL {
            assert_eq!(Control::from_hit_id(c.hit_id()), Some(c));
        }
        assert_eq!(Control::from_hit_id(HitId::new(0)), None);
        assert_eq!(Control::from_hit_id(HitId::new(CONTROL_HIT_BASE + 2)), None);
    }

    #[test]
    fn labels_follow_mode() {
        assert_eq!(Control::ReadWrite.label(true), "read");
        assert_eq!(Control::ReadWrite.label(false), "write");
        assert_eq!(Control::Clear.label(true), "clear");
    }

    #[test]
    fn focus_cycles() {
        assert_eq!(Control::next(None), Control::ReadWrite);
        assert_eq!(Control::next(Some(Control::ReadWrite)), Control::Clear);
        assert_eq!(Control::next(Some(Control::Clear)), Control::ReadWrite);
        assert_eq!(Control::prev(None), Control::Clear);
        assert_eq!(Control::prev(Some(Control::Clear)), Control::ReadWrite);
    }

    #[test]
    fn layout_regions() {
        let layout = ChromeLayout::compute(Rect::from_size(30, 8), true);
        assert_eq!(layout.header, Rect::new(0, 0, 30, 1));
        assert_eq!(layout.body, Rect::new(0, 2, 30, 5));
        assert_eq!(layout.container, Rect::new(2, 2, 26, 5));
        assert_eq!(layout.footer, Rect::new(0, 7, 30, 1));
        assert_eq!(layout.read_write, Rect::new(2, 7, 8, 1));
        assert_eq!(layout.clear, Rect::new(11, 7, 9, 1));
    }

    #[test]
    fn write_label_widens_button() {
        let layout = ChromeLayout::compute(Rect::from_size(30, 8), false);
        assert_eq!(layout.read_write, Rect::new(2, 7, 9, 1));
        assert_eq!(layout.clear, Rect::new(12, 7, 9, 1));
    }

    #[test]
    fn footer_hits_stop_at_button_edges() {
        let layout = ChromeLayout::compute(Rect::from_size(30, 8), true);
        let mut frame = Frame::with_hit_grid(30, 8);
        render_footer(&mut frame, &layout, true, None);
        let control = |x, y| frame.hit_test(x, y).and_then(Control::from_hit_id);
        assert_eq!(control(2, 7), Some(Control::ReadWrite));
        assert_eq!(control(9, 7), Some(Control::ReadWrite));
        assert_eq!(control(10, 7), None);
        assert_eq!(control(11, 7), Some(Control::Clear));
        assert_eq!(control(19, 7), Some(Control::Clear));
        assert_eq!(control(20, 7), None);
        assert_eq!(control(2, 6), None);
    }

    #[test]
    fn narrow_terminal_clips_container_to_zero() {
        let layout = ChromeLayout::compute(Rect::from_size(4, 6), true);
        assert_eq!(layout.container.width, 0);
        assert!(layout.read_write.is_empty());
    }

    #[test]
    fn render_footer_registers_hits() {
        let layout = ChromeLayout::compute(Rect::from_size(30, 8), true);
        let mut frame = Frame::with_hit_grid(30, 8);
        render_footer(&mut frame, &layout, true, Some(Control::Clear));
        assert_eq!(frame.hit_test(3, 7), Some(Control::ReadWrite.hit_id()));
        assert_eq!(frame.hit_test(12, 7), Some(Control::Clear.hit_id()));
        let clear_cell = frame.buffer.get(11, 7).unwrap();
        assert_eq!(clear_cell.content.as_char(), Some('['));
        assert!(clear_cell.attrs.contains(StyleFlags::REVERSE));
    }

    #[test]
    fn header_shows_title() {
        let mut frame = Frame::new(20, 1);
        render_header(&mut frame, Rect::new(0, 0, 20, 1));
        assert_eq!(frame.buffer.get(2, 0).and_then(|c| c.content.as_char()), Some('J'));
        assert!(frame.buffer.get(2, 0).unwrap().attrs.contains(StyleFlags::BOLD));
    }
}
