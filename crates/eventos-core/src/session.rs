// ── Session store ──
//
// Holds the bearer token and signed-in user for the whole process.
// Reads happen on every outbound request, so the state sits in an
// `ArcSwap` and is replaced wholesale on login/logout/restore.
// Persistence is best-effort: storage failures are logged, never returned.

use std::sync::Arc;

use arc_swap::ArcSwap;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use eventos_api::{ApiClient, BearerSource, User};

use crate::error::CONNECTION_FAILED;
use crate::storage::{DurableStorage, TOKEN_KEY, USER_KEY};

/// Message when the server rejected a login without explaining why.
pub const LOGIN_FAILED: &str = "Login failed";

/// Current authentication state.
///
/// `user` is only expected alongside a `token`; the store does not
/// enforce it beyond always writing them together.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<SecretString>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub struct SessionStore {
    state: ArcSwap<Session>,
    storage: Arc<dyn DurableStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.load_full())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// An empty store over `storage`. Call [`initialize`](Self::initialize)
    /// once at startup to restore a persisted session.
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            state: ArcSwap::from_pointee(Session::default()),
            storage,
        }
    }

    /// Restore token and user from durable storage.
    ///
    /// A stored user that no longer parses is removed from storage and
    /// ignored; the token is still restored.
    pub fn initialize(&self) {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                None
            }
        };

        let user = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable stored user");
                    self.forget(USER_KEY);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not read stored user");
                None
            }
        };

        debug!(
            authenticated = token.is_some(),
            has_user = user.is_some(),
            "session restored"
        );
        self.state.store(Arc::new(Session { token, user }));
    }

    /// Authenticate against `POST /auth/login` and persist the result.
    ///
    /// On failure the error is the server's message, [`LOGIN_FAILED`] when
    /// the server sent none, or [`CONNECTION_FAILED`] when no response
    /// arrived. The stored session is left untouched on failure.
    pub async fn login(
        &self,
        api: &ApiClient,
        email: &str,
        password: &SecretString,
    ) -> Result<(), String> {
        let resp = match api.login(email, password).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "login failed");
                return Err(login_failure_message(&e));
            }
        };

        self.persist(TOKEN_KEY, &resp.token);
        match &resp.user {
            Some(user) => match serde_json::to_string(user) {
                Ok(json) => self.persist(USER_KEY, &json),
                Err(e) => warn!(error = %e, "could not serialize user"),
            },
            None => self.forget(USER_KEY),
        }

        self.state.store(Arc::new(Session {
            token: Some(SecretString::from(resp.token)),
            user: resp.user,
        }));
        info!(email, "signed in");
        Ok(())
    }

    /// Clear the session in memory and in storage.
    pub fn logout(&self) {
        self.state.store(Arc::new(Session::default()));
        self.forget(TOKEN_KEY);
        self.forget(USER_KEY);
        info!("signed out");
    }

    /// True iff a token is held in memory.
    pub fn is_authenticated(&self) -> bool {
        self.state.load().is_authenticated()
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Arc<Session> {
        self.state.load_full()
    }

    pub fn user(&self) -> Option<User> {
        self.state.load().user.clone()
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "could not persist session entry");
        }
    }

    fn forget(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "could not remove session entry");
        }
    }
}

impl BearerSource for SessionStore {
    /// In-memory token first; otherwise one look at durable storage, and a
    /// token found there is adopted into memory.
    fn bearer_token(&self) -> Option<SecretString> {
        if let Some(token) = self.state.load().token.clone() {
            return Some(token);
        }

        let stored = match self.storage.get(TOKEN_KEY) {
            Ok(stored) => stored.filter(|t| !t.is_empty())?,
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                return None;
            }
        };

        debug!("adopting token from durable storage");
        let token = SecretString::from(stored);
        self.state.rcu(|current| Session {
            token: Some(token.clone()),
            user: current.user.clone(),
        });
        Some(token)
    }
}

fn login_failure_message(err: &eventos_api::Error) -> String {
    if let Some(message) = err.server_message() {
        return message.to_owned();
    }
    if let Some(errors) = err.field_errors() {
        if let Some(first) = errors.values().flatten().next() {
            return first.clone();
        }
    }
    if err.is_transport() && err.status().is_none() {
        return CONNECTION_FAILED.to_owned();
    }
    LOGIN_FAILED.to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::storage::MemoryStorage;

    fn store_with(entries: &[(&str, &str)]) -> (Arc<MemoryStorage>, SessionStore) {
        let storage = Arc::new(MemoryStorage::new());
        for (key, value) in entries {
            storage.set(key, value).unwrap();
        }
        let store = SessionStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn starts_empty() {
        let (_, store) = store_with(&[]);
        store.initialize();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn restores_token_and_user() {
        let (_, store) = store_with(&[
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id":1,"email":"test@example.com"}"#),
        ]);
        store.initialize();

        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().email, "test@example.com");
    }

    #[test]
    fn corrupt_user_is_discarded_but_token_kept() {
        let (storage, store) = store_with(&[(TOKEN_KEY, "abc"), (USER_KEY, "{oops")]);
        store.initialize();

        assert!(store.is_authenticated());
        assert!(store.user().is_none());
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let (storage, store) = store_with(&[(TOKEN_KEY, "abc"), (USER_KEY, r#"{"email":"a@b.co"}"#)]);
        store.initialize();
        store.logout();

        assert!(!store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn bearer_falls_back_to_storage_and_adopts() {
        let (storage, store) = store_with(&[]);
        store.initialize();
        assert!(store.bearer_token().is_none());

        // Another process signed in after we started.
        storage.set(TOKEN_KEY, "late-token").unwrap();
        let token = store.bearer_token().unwrap();
        assert_eq!(token.expose_secret(), "late-token");
        assert!(store.is_authenticated());
    }

    #[test]
    fn failure_messages() {
        let with_message = eventos_api::Error::Api {
            status: 401,
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(login_failure_message(&with_message), "Invalid credentials");

        let silent = eventos_api::Error::Api {
            status: 500,
            message: None,
        };
        assert_eq!(login_failure_message(&silent), LOGIN_FAILED);
    }
}
