use std::io;
use std::sync::Arc;

use calc_base::api::{HttpTransport, Transport};
use calc_base::config::ClientConfig;
use calc_base::session::{SessionCell, SessionStore};
use calc_mod_auth::AuthState;
use calc_mod_eval::{Evaluation, PollPolicy};
use calc_mod_history::History;

/// Everything the UI talks to, built once at startup and passed down.
#[derive(Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub transport: Arc<dyn Transport>,
    pub auth: AuthState,
    pub history: History,
}

impl AppContext {
    /// Restore the persisted session and build the HTTP transport around it.
    pub fn from_config(config: ClientConfig) -> io::Result<Self> {
        let session = SessionCell::restore(SessionStore::in_dir(&config.store_dir));
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(&config, session.clone()).map_err(io::Error::other)?);
        Ok(Self::with_transport(config, transport, session))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>, session: SessionCell) -> Self {
        let auth = AuthState::new(Arc::clone(&transport), session);
        Self { config, transport, auth, history: History::new() }
    }

    pub fn evaluation(&self) -> Evaluation {
        Evaluation::new(Arc::clone(&self.transport), self.history.clone(), PollPolicy::from_config(&self.config))
    }
}
