#![forbid(unsafe_code)]

//! Keystroke classification for the timeline.

use jw_core::event::{KeyCode, KeyEvent, KeyEventKind};

/// A key press that edits the letter log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    /// Append this text. Usually one character; named keys store their name.
    Letter(String),
    /// Remove the last letter.
    Backspace,
}

impl Keystroke {
    /// Classify a key event.
    ///
    /// Press and auto-repeat count; releases and chords with Ctrl, Alt or
    /// Super do not. Navigation and control keys are not keystrokes.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Char(c) if !(key.ctrl() || key.alt() || key.super_key()) => {
                Some(Self::Letter(c.to_string()))
            }
            KeyCode::Enter => Some(Self::Letter("Enter".to_string())),
            KeyCode::Backspace => Some(Self::Backspace),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jw_core::event::Modifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    #[test]
    fn plain_and_shifted_chars_are_letters() {
        assert_eq!(
            Keystroke::from_key(&key(KeyCode::Char('a'))),
            Some(Keystroke::Letter("a".into()))
        );
        assert_eq!(
            Keystroke::from_key(&key(KeyCode::Char('A')).with_modifiers(Modifiers::SHIFT)),
            Some(Keystroke::Letter("A".into()))
        );
        assert_eq!(
            Keystroke::from_key(&key(KeyCode::Char(' '))),
            Some(Keystroke::Letter(" ".into()))
        );
    }

    #[test]
    fn enter_stores_key_name() {
        assert_eq!(
            Keystroke::from_key(&key(KeyCode::Enter)),
            Some(Keystroke::Letter("Enter".into()))
        );
    }

    #[test]
    fn backspace() {
        assert_eq!(
            Keystroke::from_key(&key(KeyCode::Backspace)),
            Some(Keystroke::Backspace)
        );
    }

    #[test]
    fn chords_are_not_letters() {
        for m in [Modifiers::CTRL, Modifiers::ALT, Modifiers::SUPER] {
            assert_eq!(
                Keystroke::from_key(&key(KeyCode::Char('r')).with_modifiers(m)),
                None
            );
        }
    }

    #[test]
    fn release_is_ignored_repeat_is_not() {
        let release = key(KeyCode::Char('a')).with_kind(KeyEventKind::Release);
        assert_eq!(Keystroke::from_key(&release), None);

        let repeat = key(KeyCode::Char('a')).with_kind(KeyEventKind::Repeat);
        assert_eq!(
            Keystroke::from_key(&repeat),
            Some(Keystroke::Letter("a".into()))
        );
    }

    #[test]
    fn navigation_keys_are_ignored() {
        for code in [
            KeyCode::Tab,
            KeyCode::Escape,
            KeyCode::Up,
            KeyCode::Left,
            KeyCode::F(1),
            KeyCode::Delete,
        ] {
            assert_eq!(Keystroke::from_key(&key(code)), None);
        }
    }
}
