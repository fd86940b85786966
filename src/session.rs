/// Session lifecycle: login, persisted restore, logout
///
/// The store owns the single current-session value for the process and
/// persists it as one JSON blob on disk. Dependents read the session through
/// the store or subscribe to the watch channel; no network calls originate
/// here.
use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{info, warn};

/// Closed set of account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated identity and token held for the duration of a login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
}

/// Response from the backend authentication endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// User payload in a login response; the backend sends either `id` or `_id`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "_id", default)]
    pub record_id: Option<String>,
    pub username: String,
    pub name: String,
    pub role: Role,
}

/// Flat on-disk form of a session: one blob under one storage key
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    username: String,
    name: String,
    role: Role,
    id: String,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Session {
            token: stored.token,
            user: SessionUser {
                id: stored.id,
                username: stored.username,
                name: stored.name,
                role: stored.role,
            },
        }
    }
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        StoredSession {
            token: session.token.clone(),
            username: session.user.username.clone(),
            name: session.user.name.clone(),
            role: session.user.role,
            id: session.user.id.clone(),
        }
    }
}

/// Holds and persists the current authenticated session
pub struct SessionStore {
    path: PathBuf,
    current: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            path: path.into(),
            current,
        }
    }

    /// Adopt the persisted session if present and well formed.
    ///
    /// A corrupt or malformed blob is discarded and the process starts
    /// unauthenticated; calling restore again afterwards also yields no
    /// session. Performs at most one storage read and no network calls.
    pub fn restore(&self) -> Option<Session> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("Failed to read persisted session: {}", err);
                return None;
            }
        };

        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(stored) if !stored.token.is_empty() => {
                let session = Session::from(stored);
                self.current.send_replace(Some(session.clone()));
                Some(session)
            }
            Ok(_) => {
                warn!("Persisted session has an empty token, discarding");
                self.discard_persisted();
                None
            }
            Err(err) => {
                warn!("Invalid persisted session, discarding: {}", err);
                self.discard_persisted();
                None
            }
        }
    }

    /// Adopt a successful login response: normalize the user id, persist the
    /// session, then publish it. Nothing is published if persistence fails,
    /// so callers never observe a half-applied login.
    pub fn login(&self, response: LoginResponse) -> ClientResult<Session> {
        let LoginResponse { token, user } = response;
        if token.is_empty() {
            return Err(ClientError::Internal(
                "Login response carried an empty token".to_string(),
            ));
        }
        let id = user.id.or(user.record_id).ok_or_else(|| {
            ClientError::Internal("Login response carried no user id".to_string())
        })?;

        let session = Session {
            token,
            user: SessionUser {
                id,
                username: user.username,
                name: user.name,
                role: user.role,
            },
        };
        self.persist(&session)?;
        self.current.send_replace(Some(session.clone()));
        info!(username = %session.user.username, "Logged in");
        Ok(session)
    }

    /// Clear storage and the in-memory session; a no-op when already out
    pub fn logout(&self) {
        self.discard_persisted();
        if self.current.send_replace(None).is_some() {
            info!("Logged out");
        }
    }

    /// The current session, if any
    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Bearer token of the current session, read at call time
    pub fn token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.token.clone())
    }

    /// Watch the current session; receivers see every login and logout
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    fn persist(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(&StoredSession::from(session))
            .map_err(|e| ClientError::Internal(format!("Failed to serialize session: {}", e)))?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn discard_persisted(&self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to clear persisted session: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_response(token: &str) -> LoginResponse {
        LoginResponse {
            token: token.to_string(),
            user: LoginUser {
                id: Some("u1".to_string()),
                record_id: None,
                username: "asha".to_string(),
                name: "Asha Patel".to_string(),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn test_restore_reproduces_logged_in_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::new(&path);
        let session = store.login(login_response("tok-123")).unwrap();

        // Simulated process restart: a fresh store over the same file
        let restarted = SessionStore::new(&path);
        let restored = restarted.restore().unwrap();
        assert_eq!(restored, session);
        assert_eq!(restarted.current(), Some(session));
    }

    #[test]
    fn test_restore_discards_corrupt_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let store = SessionStore::new(&path);
        assert!(store.restore().is_none());
        assert!(!path.exists());
        // Idempotent: a second attempt also yields no session
        assert!(store.restore().is_none());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_restore_discards_empty_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"token":"","username":"asha","name":"Asha","role":"user","id":"u1"}"#,
        )
        .unwrap();

        let store = SessionStore::new(&path);
        assert!(store.restore().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_restore_missing_file_starts_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.restore().is_none());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_login_normalizes_record_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let response: LoginResponse = serde_json::from_str(
            r#"{
                "token": "tok-456",
                "user": {"_id": "abc123", "username": "ravi", "name": "Ravi", "role": "user"}
            }"#,
        )
        .unwrap();

        let session = store.login(response).unwrap();
        assert_eq!(session.user.id, "abc123");
        assert_eq!(session.user.role, Role::User);
    }

    #[test]
    fn test_login_rejects_missing_user_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let mut response = login_response("tok-789");
        response.user.id = None;
        assert!(store.login(response).is_err());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::new(&path);

        store.login(login_response("tok-123")).unwrap();
        store.logout();
        assert!(store.current().is_none());
        assert!(!path.exists());

        // Already logged out; must not fail
        store.logout();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_subscribe_sees_login_and_logout() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let rx = store.subscribe();

        store.login(login_response("tok-123")).unwrap();
        assert!(rx.borrow().is_some());

        store.logout();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn test_role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        let role: Role = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(role, Role::User);
        assert!(serde_json::from_str::<Role>(r#""superuser""#).is_err());
    }
}
