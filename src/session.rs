//! Session Context
//!
//! The bearer token and display identity of the signed-in user. A [`Session`]
//! is created by `login`/`register`, cleared by `logout`, and passed
//! explicitly to the API client and router. [`SessionStore`] persists it
//! together with the last shown view and the tickets created from this
//! client (the backend has no ticket list).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Ticket;

/// Role assigned by the console on register/login; the backend has no `/me`
pub const DEFAULT_ROLE: &str = "admin";

/// Who is signed in, as shown in the user chip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub full_name: String,
    pub role: String,
}

impl UserIdentity {
    /// Identity for a freshly registered admin
    pub fn registered(full_name: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            role: DEFAULT_ROLE.to_string(),
        }
    }

    /// Identity derived from the login e-mail's local part
    pub fn from_login_email(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email);
        Self {
            full_name: if name.is_empty() { "User".to_string() } else { name.to_string() },
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} · {}", self.full_name, self.role)
    }
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserIdentity,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserIdentity) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Everything the console keeps between invocations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleState {
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub last_route: Option<String>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

/// File-backed store for [`ConsoleState`]
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored state; a missing file is an empty state
    pub fn load(&self) -> SessionResult<ConsoleState> {
        if !self.path.exists() {
            return Ok(ConsoleState::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, state: &ConsoleState) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }

    /// Start a session, replacing any previous one
    pub fn login(&self, session: Session) -> SessionResult<()> {
        let mut state = self.load()?;
        tracing::info!(user = %session.user, "Session started");
        state.session = Some(session);
        self.save(&state)
    }

    /// Clear the session. Returns whether one was active.
    pub fn logout(&self) -> SessionResult<bool> {
        let mut state = self.load()?;
        let was_active = state.session.take().is_some();
        self.save(&state)?;
        if was_active {
            tracing::info!("Session cleared");
        }
        Ok(was_active)
    }

    pub fn current(&self) -> SessionResult<Option<Session>> {
        Ok(self.load()?.session)
    }

    pub fn remember_route(&self, route: &str) -> SessionResult<()> {
        let mut state = self.load()?;
        state.last_route = Some(route.to_string());
        self.save(&state)
    }

    pub fn cache_ticket(&self, ticket: Ticket) -> SessionResult<()> {
        let mut state = self.load()?;
        match state.tickets.iter_mut().find(|t| t.id == ticket.id) {
            Some(existing) => *existing = ticket,
            None => state.tickets.push(ticket),
        }
        self.save(&state)
    }
}

/// Default location of the state file
pub fn default_state_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("estate-console").join("state.json"))
        .unwrap_or_else(|| PathBuf::from("./estate_state.json"))
}

/// Session store errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt state file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ticket(id: i64, status: &str) -> Ticket {
        Ticket {
            id,
            unit_id: 1,
            title: "Leaking tap".to_string(),
            description: String::new(),
            priority: "medium".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("state.json"));

        let state = store.load().unwrap();
        assert!(state.session.is_none());
        assert!(state.last_route.is_none());
        assert!(state.tickets.is_empty());
    }

    #[test]
    fn test_login_then_logout() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("state.json"));

        let session = Session::new("tok", UserIdentity::from_login_email("jane@example.com"));
        store.login(session.clone()).unwrap();
        assert_eq!(store.current().unwrap(), Some(session));

        assert!(store.logout().unwrap());
        assert!(store.current().unwrap().is_none());
        assert!(!store.logout().unwrap());
    }

    #[test]
    fn test_logout_keeps_route_and_tickets() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("state.json"));

        store.login(Session::new("tok", UserIdentity::registered("Jane Doe"))).unwrap();
        store.remember_route("billing").unwrap();
        store.cache_ticket(ticket(7, "open")).unwrap();
        store.logout().unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.last_route.as_deref(), Some("billing"));
        assert_eq!(state.tickets.len(), 1);
    }

    #[test]
    fn test_cache_ticket_replaces_same_id() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("state.json"));

        store.cache_ticket(ticket(1, "open")).unwrap();
        store.cache_ticket(ticket(2, "open")).unwrap();
        store.cache_ticket(ticket(1, "closed")).unwrap();

        let tickets = store.load().unwrap().tickets;
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].status, "closed");
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let err = SessionStore::new(path).load().unwrap_err();
        assert!(matches!(err, SessionError::Corrupt(_)));
    }

    #[test]
    fn test_identity_from_email() {
        let user = UserIdentity::from_login_email("jane.doe@example.com");
        assert_eq!(user.full_name, "jane.doe");
        assert_eq!(user.to_string(), "jane.doe · admin");
    }
}
