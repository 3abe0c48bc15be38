use calc_base::api::Credentials;
use calc_base::config::next_theme;

use crate::state::{LoginForm, Screen, State};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InputChar(char),
    InsertText(String),
    InputBackspace,
    InputDelete,
    InputClear,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    InputSubmit,
    RegisterSubmit,
    LoginFocusNext,
    OpenLogin,
    CloseLogin,
    Logout,
    RefreshHistory,
    ToggleTheme,
    None,
}

/// Side effect the app must perform after an action was applied.
#[derive(Debug, PartialEq)]
pub enum ActionResult {
    Nothing,
    Evaluate,
    Login(Credentials),
    Register(Credentials),
    Logout,
    RefreshHistory,
    SaveSettings,
}

fn prev_boundary(text: &str, cursor: usize) -> usize {
    text[..cursor].char_indices().last().map(|(i, _)| i).unwrap_or(0)
}

fn next_boundary(text: &str, cursor: usize) -> usize {
    text[cursor..].chars().next().map(|c| cursor + c.len_utf8()).unwrap_or(cursor)
}

fn credentials(form: &LoginForm) -> Credentials {
    Credentials::new(form.username.trim(), form.password.clone())
}

pub fn apply_action(state: &mut State, action: Action) -> ActionResult {
    state.dirty = true;

    if state.screen == Screen::Login {
        return apply_login_action(state, action);
    }

    match action {
        Action::InputChar(c) => {
            state.input.insert(state.input_cursor, c);
            state.input_cursor += c.len_utf8();
            ActionResult::Nothing
        }
        Action::InsertText(text) => {
            // Expressions are single-line
            let text: String = text.chars().filter(|c| *c != '\n').collect();
            state.input.insert_str(state.input_cursor, &text);
            state.input_cursor += text.len();
            ActionResult::Nothing
        }
        Action::InputBackspace => {
            if state.input_cursor > 0 {
                let prev = prev_boundary(&state.input, state.input_cursor);
                state.input.remove(prev);
                state.input_cursor = prev;
            }
            ActionResult::Nothing
        }
        Action::InputDelete => {
            if state.input_cursor < state.input.len() {
                state.input.remove(state.input_cursor);
            }
            ActionResult::Nothing
        }
        Action::InputClear => {
            state.input.clear();
            state.input_cursor = 0;
            ActionResult::Nothing
        }
        Action::CursorLeft => {
            state.input_cursor = prev_boundary(&state.input, state.input_cursor);
            ActionResult::Nothing
        }
        Action::CursorRight => {
            state.input_cursor = next_boundary(&state.input, state.input_cursor);
            ActionResult::Nothing
        }
        Action::CursorHome => {
            state.input_cursor = 0;
            ActionResult::Nothing
        }
        Action::CursorEnd => {
            state.input_cursor = state.input.len();
            ActionResult::Nothing
        }
        Action::InputSubmit => {
            if state.input.trim().is_empty() {
                ActionResult::Nothing
            } else {
                state.notice = None;
                ActionResult::Evaluate
            }
        }
        Action::OpenLogin => {
            state.screen = Screen::Login;
            state.notice = None;
            ActionResult::Nothing
        }
        Action::Logout => {
            state.notice = Some("logged out".to_string());
            ActionResult::Logout
        }
        Action::RefreshHistory => ActionResult::RefreshHistory,
        Action::ToggleTheme => toggle_theme(state),
        Action::RegisterSubmit | Action::LoginFocusNext | Action::CloseLogin | Action::None => {
            ActionResult::Nothing
        }
    }
}

fn apply_login_action(state: &mut State, action: Action) -> ActionResult {
    let form = &mut state.login;
    match action {
        Action::InputChar(c) => {
            form.focused_mut().push(c);
            ActionResult::Nothing
        }
        Action::InsertText(text) => {
            form.focused_mut().push_str(text.trim_end_matches(['\n', '\r']));
            ActionResult::Nothing
        }
        Action::InputBackspace => {
            form.focused_mut().pop();
            ActionResult::Nothing
        }
        Action::InputClear => {
            form.focused_mut().clear();
            ActionResult::Nothing
        }
        Action::LoginFocusNext => {
            form.focus = form.focus.next();
            ActionResult::Nothing
        }
        Action::InputSubmit => submit_login(state, ActionResult::Login),
        Action::RegisterSubmit => submit_login(state, ActionResult::Register),
        Action::CloseLogin => {
            state.screen = Screen::Calculator;
            form.password.clear();
            ActionResult::Nothing
        }
        Action::ToggleTheme => toggle_theme(state),
        _ => ActionResult::Nothing,
    }
}

fn submit_login(state: &mut State, result: fn(Credentials) -> ActionResult) -> ActionResult {
    if !state.login.is_complete() {
        state.notice = Some("username and password are required".to_string());
        return ActionResult::Nothing;
    }
    state.notice = None;
    result(credentials(&state.login))
}

fn toggle_theme(state: &mut State) -> ActionResult {
    state.theme = next_theme(&state.theme).to_string();
    calc_base::config::set_active_theme(&state.theme);
    ActionResult::SaveSettings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LoginField;

    fn typed(text: &str) -> State {
        let mut state = State::new("dark");
        for c in text.chars() {
            apply_action(&mut state, Action::InputChar(c));
        }
        state
    }

    #[test]
    fn typing_and_editing_expression() {
        let mut state = typed("2+22");
        apply_action(&mut state, Action::InputBackspace);
        assert_eq!(state.input, "2+2");

        apply_action(&mut state, Action::CursorHome);
        apply_action(&mut state, Action::InputChar('('));
        apply_action(&mut state, Action::CursorEnd);
        apply_action(&mut state, Action::InputChar(')'));
        assert_eq!(state.input, "(2+2)");

        apply_action(&mut state, Action::CursorLeft);
        apply_action(&mut state, Action::InputDelete);
        assert_eq!(state.input, "(2+2");
    }

    #[test]
    fn cursor_respects_multibyte_chars() {
        let mut state = typed("2×3");
        apply_action(&mut state, Action::CursorLeft);
        apply_action(&mut state, Action::CursorLeft);
        assert_eq!(state.input_cursor, 1);
        apply_action(&mut state, Action::CursorRight);
        assert_eq!(state.input_cursor, 1 + '×'.len_utf8());
        apply_action(&mut state, Action::InputBackspace);
        assert_eq!(state.input, "23");
    }

    #[test]
    fn pasted_newlines_are_dropped() {
        let mut state = State::new("dark");
        apply_action(&mut state, Action::InsertText("1+\n2".into()));
        assert_eq!(state.input, "1+2");
        assert_eq!(state.input_cursor, 3);
    }

    #[test]
    fn submit_requires_expression() {
        let mut state = typed("   ");
        assert_eq!(apply_action(&mut state, Action::InputSubmit), ActionResult::Nothing);

        let mut state = typed("1/0");
        assert_eq!(apply_action(&mut state, Action::InputSubmit), ActionResult::Evaluate);
    }

    #[test]
    fn login_form_collects_credentials() {
        let mut state = State::new("dark");
        apply_action(&mut state, Action::OpenLogin);
        assert_eq!(state.screen, Screen::Login);

        for c in "ann".chars() {
            apply_action(&mut state, Action::InputChar(c));
        }
        assert_eq!(apply_action(&mut state, Action::InputSubmit), ActionResult::Nothing);
        assert!(state.notice.is_some());

        apply_action(&mut state, Action::LoginFocusNext);
        assert_eq!(state.login.focus, LoginField::Password);
        for c in "pw".chars() {
            apply_action(&mut state, Action::InputChar(c));
        }

        assert_eq!(apply_action(&mut state, Action::InputSubmit), ActionResult::Login(Credentials::new("ann", "pw")));
        assert_eq!(
            apply_action(&mut state, Action::RegisterSubmit),
            ActionResult::Register(Credentials::new("ann", "pw"))
        );
        assert!(state.input.is_empty());
    }

    #[test]
    fn closing_login_forgets_password() {
        let mut state = State::new("dark");
        apply_action(&mut state, Action::OpenLogin);
        apply_action(&mut state, Action::LoginFocusNext);
        apply_action(&mut state, Action::InputChar('x'));
        apply_action(&mut state, Action::CloseLogin);
        assert_eq!(state.screen, Screen::Calculator);
        assert!(state.login.password.is_empty());
    }

    #[test]
    fn toggle_theme_requests_save() {
        let mut state = State::new("dark");
        assert_eq!(apply_action(&mut state, Action::ToggleTheme), ActionResult::SaveSettings);
        assert_eq!(state.theme, "light");
        apply_action(&mut state, Action::ToggleTheme);
        assert_eq!(state.theme, "dark");
    }
}
