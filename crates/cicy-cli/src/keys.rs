//! Terminal key decoding.

use cicy_session::KeyInput;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a crossterm key event to session input.
#[must_use]
pub fn key_input(key: &KeyEvent) -> Option<KeyInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyInput::Interrupt)
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(KeyInput::Char(c))
        }
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Esc => Some(KeyInput::Esc),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        assert_eq!(
            key_input(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyInput::Interrupt)
        );
    }

    #[test]
    fn test_plain_and_shifted_chars() {
        assert_eq!(
            key_input(&press(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(KeyInput::Char('c'))
        );
        assert_eq!(
            key_input(&press(KeyCode::Char('C'), KeyModifiers::SHIFT)),
            Some(KeyInput::Char('C'))
        );
        assert_eq!(key_input(&press(KeyCode::Char('x'), KeyModifiers::ALT)), None);
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(key_input(&press(KeyCode::Esc, KeyModifiers::NONE)), Some(KeyInput::Esc));
        assert_eq!(key_input(&press(KeyCode::Up, KeyModifiers::NONE)), Some(KeyInput::Up));
        assert_eq!(key_input(&press(KeyCode::F(1), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = press(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(key_input(&key), None);
    }
}
