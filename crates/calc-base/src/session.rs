//! Authenticated session: access token + current user, persisted token slot.
//!
//! The token lives in `{store}/session.json` as `{"accessToken": "..."}` and
//! survives restarts. The user profile is runtime-only and re-fetched.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};

use crate::api::User;
use crate::constants::SESSION_FILE;

/// On-disk shape of the session slot
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

/// File-backed key-value slot for the access token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Slot inside the given store directory
    pub fn in_dir(store_dir: impl Into<PathBuf>) -> Self {
        Self { path: store_dir.into().join(SESSION_FILE) }
    }

    /// Read the persisted token, if any.
    pub fn load(&self) -> Option<String> {
        let json = fs::read_to_string(&self.path).ok()?;
        let file: SessionFile = serde_json::from_str(&json).ok()?;
        file.access_token.filter(|t| !t.is_empty())
    }

    /// Overwrite the slot (None clears it).
    pub fn save(&self, token: Option<&str>) {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).ok();
        }
        let file = SessionFile { access_token: token.map(str::to_string) };
        match serde_json::to_string_pretty(&file) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode session"),
        }
    }
}

#[derive(Default)]
struct SessionData {
    token: Option<Arc<SecretBox<String>>>,
    user: Option<User>,
}

/// Shared session state. Clones share the same cell.
///
/// Token and user are always changed under one lock, so a user is never
/// visible without a token.
#[derive(Clone)]
pub struct SessionCell {
    inner: Arc<Mutex<SessionData>>,
    store: Option<SessionStore>,
}

impl SessionCell {
    /// Session that is never persisted.
    pub fn in_memory() -> Self {
        Self { inner: Arc::new(Mutex::new(SessionData::default())), store: None }
    }

    /// Session restored from (and written back to) `store`.
    pub fn restore(store: SessionStore) -> Self {
        let token = store.load().map(|t| Arc::new(SecretBox::new(Box::new(t))));
        if token.is_some() {
            tracing::info!("restored persisted session");
        }
        Self { inner: Arc::new(Mutex::new(SessionData { token, user: None })), store: Some(store) }
    }

    fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn token(&self) -> Option<Arc<SecretBox<String>>> {
        self.lock().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().token.is_some()
    }

    /// `Bearer <token>` value for the Authorization header.
    pub fn bearer(&self) -> Option<String> {
        self.lock().token.as_ref().map(|t| format!("Bearer {}", t.expose_secret()))
    }

    /// Install a new token and user together and persist the token.
    pub fn establish(&self, token: String, user: Option<User>) {
        let mut data = self.lock();
        if let Some(store) = &self.store {
            store.save(Some(&token));
        }
        data.token = Some(Arc::new(SecretBox::new(Box::new(token))));
        data.user = user;
    }

    /// Replace the current user. Refused (returns false) when there is no
    /// token and `user` is Some.
    pub fn set_user(&self, user: Option<User>) -> bool {
        let mut data = self.lock();
        if user.is_some() && data.token.is_none() {
            return false;
        }
        data.user = user;
        true
    }

    /// Clear the session only if it still holds `token` (same allocation).
    /// Returns whether it was cleared.
    pub fn clear_if_current(&self, token: &Arc<SecretBox<String>>) -> bool {
        let mut data = self.lock();
        if !data.token.as_ref().is_some_and(|t| Arc::ptr_eq(t, token)) {
            return false;
        }
        data.token = None;
        data.user = None;
        if let Some(store) = &self.store {
            store.save(None);
        }
        true
    }

    /// Drop token and user and clear the persisted slot. Idempotent.
    pub fn clear(&self) {
        let mut data = self.lock();
        let had_token = data.token.take().is_some();
        data.user = None;
        if had_token && let Some(store) = &self.store {
            store.save(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user(name: &str) -> User {
        User { id: 1, username: name.to_string() }
    }

    #[test]
    fn store_round_trip_and_clear() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::in_dir(tmp.path());
        assert_eq!(store.load(), None);

        store.save(Some("tok"));
        assert_eq!(store.load(), Some("tok".to_string()));
        let raw = fs::read_to_string(tmp.path().join(SESSION_FILE)).unwrap();
        assert!(raw.contains("\"accessToken\""));

        store.save(None);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn corrupt_slot_reads_as_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SESSION_FILE), "{not json").unwrap();
        assert_eq!(SessionStore::in_dir(tmp.path()).load(), None);
    }

    #[test]
    fn restore_reads_persisted_token() {
        let tmp = TempDir::new().unwrap();
        SessionStore::in_dir(tmp.path()).save(Some("persisted"));

        let session = SessionCell::restore(SessionStore::in_dir(tmp.path()));
        assert!(session.is_authenticated());
        assert_eq!(session.bearer(), Some("Bearer persisted".to_string()));
        assert!(session.user().is_none());
    }

    #[test]
    fn establish_persists_and_clear_wipes() {
        let tmp = TempDir::new().unwrap();
        let session = SessionCell::restore(SessionStore::in_dir(tmp.path()));
        session.establish("abc".into(), Some(user("ann")));
        assert_eq!(SessionStore::in_dir(tmp.path()).load(), Some("abc".to_string()));
        assert_eq!(session.user().map(|u| u.username), Some("ann".to_string()));

        session.clear();
        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(SessionStore::in_dir(tmp.path()).load(), None);
    }

    #[test]
    fn clear_if_current_spares_replaced_token() {
        let tmp = TempDir::new().unwrap();
        let session = SessionCell::restore(SessionStore::in_dir(tmp.path()));
        session.establish("old".into(), None);
        let old = session.token().unwrap();
        session.establish("fresh".into(), Some(user("ann")));

        assert!(!session.clear_if_current(&old));
        assert_eq!(session.bearer(), Some("Bearer fresh".to_string()));
        assert_eq!(session.user().map(|u| u.username), Some("ann".to_string()));
        assert_eq!(SessionStore::in_dir(tmp.path()).load(), Some("fresh".to_string()));

        let fresh = session.token().unwrap();
        assert!(session.clear_if_current(&fresh));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(SessionStore::in_dir(tmp.path()).load(), None);
        assert!(!session.clear_if_current(&fresh));
    }

    #[test]
    fn user_requires_token() {
        let session = SessionCell::in_memory();
        assert!(!session.set_user(Some(user("ghost"))));
        assert!(session.user().is_none());
        assert!(session.set_user(None));

        session.establish("t".into(), None);
        assert!(session.set_user(Some(user("ann"))));
        assert_eq!(session.user().map(|u| u.username), Some("ann".to_string()));
    }

    #[test]
    fn clones_share_state() {
        let a = SessionCell::in_memory();
        let b = a.clone();
        a.establish("shared".into(), None);
        assert!(b.is_authenticated());
        b.clear();
        assert!(!a.is_authenticated());
    }
}
