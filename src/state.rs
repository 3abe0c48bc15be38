/// Which screen is in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Calculator,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

/// UI-only state. Remote state (evaluation, auth, history) lives in the app context.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub screen: Screen,
    /// Expression being typed
    pub input: String,
    /// Byte offset of the cursor in `input`
    pub input_cursor: usize,
    pub login: LoginForm,
    /// One-line message shown in the status bar
    pub notice: Option<String>,
    /// A login or register request is in flight
    pub auth_pending: bool,
    pub theme: String,
    pub dirty: bool,
}

impl State {
    pub fn new(theme: &str) -> Self {
        Self { theme: theme.to_string(), dirty: true, ..Self::default() }
    }
}
