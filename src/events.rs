use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::actions::Action;
use crate::state::{Screen, State};

/// Map a terminal event to an action. `None` means quit.
pub fn handle_event(event: &Event, state: &State) -> Option<Action> {
    match event {
        Event::Key(key) => {
            if key.kind == KeyEventKind::Release {
                return Some(Action::None);
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            // Global Ctrl shortcuts (always handled first)
            if ctrl {
                match key.code {
                    KeyCode::Char('q') => return None,
                    KeyCode::Char('l') => return Some(Action::OpenLogin),
                    KeyCode::Char('o') => return Some(Action::Logout),
                    KeyCode::Char('r') => return Some(Action::RefreshHistory),
                    KeyCode::Char('t') => return Some(Action::ToggleTheme),
                    KeyCode::Char('n') => return Some(Action::RegisterSubmit),
                    KeyCode::Char('u') => return Some(Action::InputClear),
                    _ => return Some(Action::None),
                }
            }

            let action = match key.code {
                // Esc backs out of the login form, quits from the calculator
                KeyCode::Esc if state.screen == Screen::Login => Action::CloseLogin,
                KeyCode::Esc => return None,
                KeyCode::Enter => Action::InputSubmit,
                KeyCode::Tab | KeyCode::BackTab => Action::LoginFocusNext,
                KeyCode::Backspace => Action::InputBackspace,
                KeyCode::Delete => Action::InputDelete,
                KeyCode::Left => Action::CursorLeft,
                KeyCode::Right => Action::CursorRight,
                KeyCode::Home => Action::CursorHome,
                KeyCode::End => Action::CursorEnd,
                KeyCode::Char(c) => Action::InputChar(c),
                _ => Action::None,
            };
            Some(action)
        }
        Event::Paste(text) => Some(Action::InsertText(text.replace("\r\n", "\n").replace('\r', "\n"))),
        _ => Some(Action::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn ctrl_shortcuts() {
        let state = State::new("dark");
        assert_eq!(handle_event(&key(KeyCode::Char('q'), KeyModifiers::CONTROL), &state), None);
        assert_eq!(handle_event(&key(KeyCode::Char('t'), KeyModifiers::CONTROL), &state), Some(Action::ToggleTheme));
        assert_eq!(handle_event(&key(KeyCode::Char('r'), KeyModifiers::CONTROL), &state), Some(Action::RefreshHistory));
        assert_eq!(handle_event(&key(KeyCode::Char('l'), KeyModifiers::CONTROL), &state), Some(Action::OpenLogin));
        assert_eq!(handle_event(&key(KeyCode::Char('o'), KeyModifiers::CONTROL), &state), Some(Action::Logout));
    }

    #[test]
    fn esc_depends_on_screen() {
        let mut state = State::new("dark");
        assert_eq!(handle_event(&key(KeyCode::Esc, KeyModifiers::NONE), &state), None);
        state.screen = Screen::Login;
        assert_eq!(handle_event(&key(KeyCode::Esc, KeyModifiers::NONE), &state), Some(Action::CloseLogin));
    }

    #[test]
    fn plain_keys_edit_and_submit() {
        let state = State::new("dark");
        assert_eq!(handle_event(&key(KeyCode::Char('7'), KeyModifiers::NONE), &state), Some(Action::InputChar('7')));
        assert_eq!(handle_event(&key(KeyCode::Enter, KeyModifiers::NONE), &state), Some(Action::InputSubmit));
        assert_eq!(
            handle_event(&Event::Paste("1+\r\n2".into()), &state),
            Some(Action::InsertText("1+\n2".into()))
        );
    }
}
