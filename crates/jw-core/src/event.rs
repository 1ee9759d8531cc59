#![forbid(unsafe_code)]

//! Input events as the application sees them.
//!
//! Crossterm events are narrowed to what the editor reacts to: keys that
//! type or navigate, clicks on the footer, resizes, focus changes, and
//! runtime ticks. Anything else is dropped at the boundary by
//! [`Event::from_crossterm`].

use bitflags::bitflags;
use crossterm::event as cte;

/// One input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// Mouse input.
    Mouse(MouseEvent),
    /// The terminal changed size.
    Resize {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// The terminal gained (`true`) or lost (`false`) focus.
    Focus(bool),
    /// Runtime tick.
    Tick,
}

impl Event {
    /// Narrow a Crossterm event. Pastes and keys with no [`KeyCode`] give
    /// `None`.
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        Some(match event {
            cte::Event::Key(key) => Event::Key(KeyEvent {
                code: key_code(key.code)?,
                modifiers: modifiers(key.modifiers),
                kind: match key.kind {
                    cte::KeyEventKind::Press => KeyEventKind::Press,
                    cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
                    cte::KeyEventKind::Release => KeyEventKind::Release,
                },
            }),
            cte::Event::Mouse(mouse) => Event::Mouse(MouseEvent {
                kind: mouse_kind(mouse.kind),
                x: mouse.column,
                y: mouse.row,
                modifiers: modifiers(mouse.modifiers),
            }),
            cte::Event::Resize(width, height) => Event::Resize { width, height },
            cte::Event::FocusGained => Event::Focus(true),
            cte::Event::FocusLost => Event::Focus(false),
            cte::Event::Paste(_) => return None,
        })
    }
}

/// A key press, repeat or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key.
    pub code: KeyCode,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Press, repeat or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// An unmodified press of `code`.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Replace the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// `true` for the character key `c`, whatever the modifiers.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    /// Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Alt is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Super, Meta or Hyper is held.
    #[must_use]
    pub const fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }
}

/// Keys the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character, including space.
    Char(char),
    /// Enter.
    Enter,
    /// Esc.
    Escape,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Shift+Tab.
    BackTab,
    /// Delete.
    Delete,
    /// Home.
    Home,
    /// End.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Function key `F(n)`.
    F(u8),
}

/// Press, auto-repeat, or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Terminals without the kitty protocol report only presses.
    #[default]
    Press,
    /// Held key.
    Repeat,
    /// Key let go.
    Release,
}

bitflags! {
    /// Modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// None held.
        const NONE  = 0;
        /// Shift.
        const SHIFT = 1;
        /// Alt / Option.
        const ALT   = 1 << 1;
        /// Control.
        const CTRL  = 1 << 2;
        /// Super, Meta or Hyper.
        const SUPER = 1 << 3;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse event at a 0-indexed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// What happened.
    pub kind: MouseEventKind,
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// An unmodified mouse event at `(x, y)`.
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Button pressed.
    Down(MouseButton),
    /// Button released.
    Up(MouseButton),
    /// Movement, with or without a button held.
    Moved,
    /// Any wheel motion.
    Scroll,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary.
    Left,
    /// Secondary.
    Right,
    /// Wheel click.
    Middle,
}

fn key_code(code: cte::KeyCode) -> Option<KeyCode> {
    Some(match code {
        cte::KeyCode::Char(c) => KeyCode::Char(c),
        cte::KeyCode::Enter => KeyCode::Enter,
        cte::KeyCode::Esc => KeyCode::Escape,
        cte::KeyCode::Backspace => KeyCode::Backspace,
        cte::KeyCode::Tab => KeyCode::Tab,
        cte::KeyCode::BackTab => KeyCode::BackTab,
        cte::KeyCode::Delete => KeyCode::Delete,
        cte::KeyCode::Home => KeyCode::Home,
        cte::KeyCode::End => KeyCode::End,
        cte::KeyCode::PageUp => KeyCode::PageUp,
        cte::KeyCode::PageDown => KeyCode::PageDown,
        cte::KeyCode::Up => KeyCode::Up,
        cte::KeyCode::Down => KeyCode::Down,
        cte::KeyCode::Left => KeyCode::Left,
        cte::KeyCode::Right => KeyCode::Right,
        cte::KeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    })
}

fn modifiers(m: cte::KeyModifiers) -> Modifiers {
    let pairs = [
        (cte::KeyModifiers::SHIFT, Modifiers::SHIFT),
        (cte::KeyModifiers::ALT, Modifiers::ALT),
        (cte::KeyModifiers::CONTROL, Modifiers::CTRL),
        (cte::KeyModifiers::SUPER, Modifiers::SUPER),
        (cte::KeyModifiers::HYPER, Modifiers::SUPER),
        (cte::KeyModifiers::META, Modifiers::SUPER),
    ];
    pairs
        .into_iter()
        .filter(|(from, _)| m.contains(*from))
        .fold(Modifiers::NONE, |acc, (_, to)| acc | to)
}

fn mouse_kind(kind: cte::MouseEventKind) -> MouseEventKind {
    let button = |b: cte::MouseButton| match b {
        cte::MouseButton::Left => MouseButton::Left,
        cte::MouseButton::Right => MouseButton::Right,
        cte::MouseButton::Middle => MouseButton::Middle,
    };
    match kind {
        cte::MouseEventKind::Down(b) => MouseEventKind::Down(button(b)),
        cte::MouseEventKind::Up(b) => MouseEventKind::Up(button(b)),
        cte::MouseEventKind::Drag(_) | cte::MouseEventKind::Moved => MouseEventKind::Moved,
        cte::MouseEventKind::ScrollUp
        | cte::MouseEventKind::ScrollDown
        | cte::MouseEventKind::ScrollLeft
        | cte::MouseEventKind::ScrollRight => MouseEventKind::Scroll,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct(code: cte::KeyCode, mods: cte::KeyModifiers) -> Option<Event> {
        Event::from_crossterm(cte::Event::Key(cte::KeyEvent::new(code, mods)))
    }

    #[test]
    fn builders() {
        let key = KeyEvent::new(KeyCode::Char('r'))
            .with_modifiers(Modifiers::CTRL)
            .with_kind(KeyEventKind::Repeat);
        assert!(key.is_char('r'));
        assert!(key.ctrl());
        assert!(!key.alt());
        assert!(!key.super_key());
        assert_eq!(key.kind, KeyEventKind::Repeat);
        assert_eq!(KeyEvent::new(KeyCode::Enter).kind, KeyEventKind::Press);
    }

    #[test]
    fn ctrl_chord_keeps_its_char() {
        assert_eq!(
            ct(cte::KeyCode::Char('l'), cte::KeyModifiers::CONTROL),
            Some(Event::Key(
                KeyEvent::new(KeyCode::Char('l')).with_modifiers(Modifiers::CTRL)
            ))
        );
    }

    #[test]
    fn space_esc_and_backspace() {
        let none = cte::KeyModifiers::NONE;
        assert_eq!(
            ct(cte::KeyCode::Char(' '), none),
            Some(Event::Key(KeyEvent::new(KeyCode::Char(' '))))
        );
        assert_eq!(
            ct(cte::KeyCode::Esc, none),
            Some(Event::Key(KeyEvent::new(KeyCode::Escape)))
        );
        assert_eq!(
            ct(cte::KeyCode::Backspace, none),
            Some(Event::Key(KeyEvent::new(KeyCode::Backspace)))
        );
    }

    #[test]
    fn meta_and_hyper_count_as_super() {
        for m in [
            cte::KeyModifiers::SUPER,
            cte::KeyModifiers::HYPER,
            cte::KeyModifiers::META,
        ] {
            assert_eq!(modifiers(m), Modifiers::SUPER);
        }
        assert_eq!(
            modifiers(cte::KeyModifiers::SHIFT | cte::KeyModifiers::CONTROL),
            Modifiers::SHIFT | Modifiers::CTRL
        );
    }

    #[test]
    fn release_kind_survives() {
        let mut key = cte::KeyEvent::new(cte::KeyCode::Char('a'), cte::KeyModifiers::NONE);
        key.kind = cte::KeyEventKind::Release;
        match Event::from_crossterm(cte::Event::Key(key)) {
            Some(Event::Key(k)) => assert_eq!(k.kind, KeyEventKind::Release),
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_and_pastes_are_dropped() {
        assert_eq!(ct(cte::KeyCode::CapsLock, cte::KeyModifiers::NONE), None);
        assert_eq!(Event::from_crossterm(cte::Event::Paste("hi".into())), None);
    }

    #[test]
    fn mouse_click_and_wheel() {
        let click = Event::from_crossterm(cte::Event::Mouse(cte::MouseEvent {
            kind: cte::MouseEventKind::Down(cte::MouseButton::Left),
            column: 10,
            row: 5,
            modifiers: cte::KeyModifiers::NONE,
        }));
        assert_eq!(
            click,
            Some(Event::Mouse(MouseEvent::new(
                MouseEventKind::Down(MouseButton::Left),
                10,
                5
            )))
        );
        assert_eq!(mouse_kind(cte::MouseEventKind::ScrollLeft), MouseEventKind::Scroll);
        assert_eq!(
            mouse_kind(cte::MouseEventKind::Drag(cte::MouseButton::Left)),
            MouseEventKind::Moved
        );
    }

    #[test]
    fn resize_and_focus() {
        assert_eq!(
            Event::from_crossterm(cte::Event::Resize(80, 24)),
            Some(Event::Resize {
                width: 80,
                height: 24
            })
        );
        assert_eq!(
            Event::from_crossterm(cte::Event::FocusGained),
            Some(Event::Focus(true))
        );
        assert_eq!(
            Event::from_crossterm(cte::Event::FocusLost),
            Some(Event::Focus(false))
        );
    }
}
