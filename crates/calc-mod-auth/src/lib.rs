//! Authentication: login / register / logout over a shared session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use calc_base::api::{ApiResult, AuthPayload, Credentials, Transport, User};
use calc_base::session::SessionCell;

/// Last error of each auth operation, None once it succeeds again
#[derive(Debug, Default, Clone)]
struct AuthErrors {
    login: Option<String>,
    register: Option<String>,
    profile: Option<String>,
}

#[derive(Clone, Copy)]
enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    fn name(self) -> &'static str {
        match self {
            AuthAction::Login => "login",
            AuthAction::Register => "register",
        }
    }
}

/// Authentication state shared by the whole client. Clones share state.
#[derive(Clone)]
pub struct AuthState {
    transport: Arc<dyn Transport>,
    session: SessionCell,
    errors: Arc<Mutex<AuthErrors>>,
}

impl AuthState {
    pub fn new(transport: Arc<dyn Transport>, session: SessionCell) -> Self {
        Self { transport, session, errors: Arc::new(Mutex::new(AuthErrors::default())) }
    }

    fn errors(&self) -> MutexGuard<'_, AuthErrors> {
        self.errors.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Empty when logged out, otherwise `{"Authorization": "Bearer <token>"}`.
    pub fn auth_header(&self) -> HashMap<String, String> {
        let mut header = HashMap::new();
        if let Some(bearer) = self.session.bearer() {
            header.insert("Authorization".to_string(), bearer);
        }
        header
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn login_error(&self) -> Option<String> {
        self.errors().login.clone()
    }

    pub fn register_error(&self) -> Option<String> {
        self.errors().register.clone()
    }

    pub fn profile_error(&self) -> Option<String> {
        self.errors().profile.clone()
    }

    /// Log in; on failure the existing session is left alone.
    pub fn login(&self, credentials: &Credentials) -> bool {
        self.authenticate(AuthAction::Login, credentials)
    }

    /// Create an account and log into it.
    pub fn register(&self, credentials: &Credentials) -> bool {
        self.authenticate(AuthAction::Register, credentials)
    }

    fn authenticate(&self, action: AuthAction, credentials: &Credentials) -> bool {
        self.set_error(action, None);

        let outcome: ApiResult<AuthPayload> = match action {
            AuthAction::Login => self.transport.login(credentials),
            AuthAction::Register => self.transport.register(credentials),
        };

        match outcome {
            Ok(payload) => {
                tracing::info!(action = action.name(), username = %credentials.username, "authenticated");
                self.session.establish(payload.access_token, payload.user);
                true
            }
            Err(e) => {
                tracing::warn!(action = action.name(), username = %credentials.username, error = %e, "authentication failed");
                self.set_error(action, Some(e));
                false
            }
        }
    }

    fn set_error(&self, action: AuthAction, error: Option<String>) {
        let mut errors = self.errors();
        match action {
            AuthAction::Login => errors.login = error,
            AuthAction::Register => errors.register = error,
        }
    }

    /// Forget token and user. Safe to call when already logged out.
    pub fn logout(&self) {
        if self.session.is_authenticated() {
            tracing::info!("logged out");
        }
        self.session.clear();
    }

    /// Replace the local user with the server's profile.
    /// A failed fetch clears the user and records the error.
    pub fn fetch_current_user(&self) -> bool {
        match self.transport.current_user() {
            Ok(user) => {
                self.errors().profile = None;
                self.session.set_user(Some(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch failed");
                self.session.set_user(None);
                self.errors().profile = Some(e);
                false
            }
        }
    }
}
