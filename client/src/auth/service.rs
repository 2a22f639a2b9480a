//! Session store: the single owner of "who, if anyone, is logged in".
//!
//! The store keeps the current `Session` in memory, mirrors it to a
//! `KeyValueStore` under the `"user"` key, and broadcasts every change over a
//! watch channel. Consumers get snapshots and may only ask the store to log in
//! or out.
//!
//! Operations are serialized by an internal gate, so a `login` issued while
//! `initialize` is still reading storage waits for the read to finish instead
//! of being overwritten by it.

use adapters::KeyValueStore;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use super::errors::AuthError;
use super::models::{Role, Session, SessionState};

/// Storage key the session is persisted under.
pub const SESSION_KEY: &str = "user";

pub struct SessionStore<S> {
    storage: S,
    state: watch::Sender<SessionState>,
    gate: Mutex<()>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Creates a store in the initializing state. Call [`initialize`] once
    /// before consumers act on [`current`].
    ///
    /// [`initialize`]: SessionStore::initialize
    /// [`current`]: SessionStore::current
    pub fn new(storage: S) -> Self {
        let (state, _) = watch::channel(SessionState::initializing());
        Self {
            storage,
            state,
            gate: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().current.clone()
    }

    pub fn is_initializing(&self) -> bool {
        self.state.borrow().initializing
    }

    /// Receiver that observes every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resolves once the initial load has settled and returns the state at
    /// that moment.
    pub async fn wait_until_ready(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let ready = match rx.wait_for(SessionState::is_ready).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        ready
    }

    /// Loads the persisted session. A missing, unreadable or undecodable value
    /// leaves the store logged out. Always ends with `initializing == false`.
    pub async fn initialize(&self) {
        let _gate = self.gate.lock().await;

        let restored = match self.storage.get(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => {
                    debug!(
                        user_id = session.user_id(),
                        role = %session.role(),
                        "restored persisted session"
                    );
                    Some(session)
                }
                Err(err) => {
                    warn!(error = %err, "discarding undecodable persisted session");
                    None
                }
            },
            Ok(None) => {
                debug!("no persisted session");
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to read persisted session");
                None
            }
        };

        self.state.send_replace(SessionState {
            current: restored,
            initializing: false,
        });
    }

    /// Persists a new session and makes it current.
    ///
    /// The in-memory session only changes after the storage write succeeds, so
    /// a session that is live now is also the one restored after a restart. On
    /// failure the previous state is kept and the error returned.
    pub async fn login(
        &self,
        token: impl Into<String>,
        user_id: impl Into<String>,
        role: Role,
    ) -> Result<Session, AuthError> {
        let session = Session::new(token, user_id, role);
        let encoded = serde_json::to_string(&session)?;

        let _gate = self.gate.lock().await;
        self.storage
            .set(SESSION_KEY, &encoded)
            .await
            .map_err(AuthError::Persist)?;

        self.state
            .send_modify(|state| state.current = Some(session.clone()));
        info!(user_id = session.user_id(), role = %session.role(), "logged in");
        Ok(session)
    }

    /// Removes the persisted session and clears the current one.
    ///
    /// Never fails: a storage error is logged and the in-memory session is
    /// cleared anyway. Calling it while logged out is a no-op apart from the
    /// removal attempt.
    pub async fn logout(&self) {
        let _gate = self.gate.lock().await;

        if let Err(err) = self.storage.remove(SESSION_KEY).await {
            error!(error = %err, "failed to remove persisted session, clearing it in memory only");
        }

        let mut previous = None;
        self.state.send_modify(|state| previous = state.current.take());
        match previous {
            Some(session) => info!(user_id = session.user_id(), "logged out"),
            None => debug!("logout requested without an active session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use adapters::{FaultyStore, MemoryStore};
    use tracing_test::traced_test;

    use super::*;

    #[tokio::test]
    async fn starts_initializing_without_session() {
        let store = SessionStore::new(MemoryStore::new());
        assert!(store.is_initializing());
        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn initialize_without_persisted_session() {
        let store = SessionStore::new(MemoryStore::new());
        store.initialize().await;

        assert_eq!(store.current(), None);
        assert!(!store.is_initializing());
    }

    #[tokio::test]
    async fn initialize_restores_valid_session() {
        let storage = MemoryStore::with_entry(
            SESSION_KEY,
            r#"{"token":"t1","userId":"u1","role":"user"}"#,
        );
        let store = SessionStore::new(storage);
        store.initialize().await;

        assert_eq!(store.current(), Some(Session::new("t1", "u1", Role::User)));
        assert!(!store.is_initializing());
    }

    #[tokio::test]
    #[traced_test]
    async fn initialize_treats_corrupted_value_as_logged_out() {
        let store = SessionStore::new(MemoryStore::with_entry(SESSION_KEY, "{not json"));
        store.initialize().await;

        assert_eq!(store.current(), None);
        assert!(!store.is_initializing());
        assert!(logs_contain("discarding undecodable persisted session"));
    }

    #[tokio::test]
    async fn initialize_ignores_corrupted_read_over_valid_session() {
        let storage = FaultyStore::new(MemoryStore::with_entry(
            SESSION_KEY,
            r#"{"token":"t1","userId":"u1","role":"user"}"#,
        ));
        storage
            .corrupt_reads(Some(r#"{"token":"t1","userId":"u1","role":"root"}"#.into()))
            .await;
        let store = SessionStore::new(storage);
        store.initialize().await;

        assert_eq!(store.current(), None);
        assert!(!store.is_initializing());

        store.storage().corrupt_reads(None).await;
        store.initialize().await;
        assert_eq!(store.current(), Some(Session::new("t1", "u1", Role::User)));
    }

    #[tokio::test]
    async fn initialize_survives_storage_read_failure() {
        let storage = FaultyStore::new(MemoryStore::new());
        storage.fail_get(true);
        let store = SessionStore::new(storage);
        store.initialize().await;

        assert_eq!(store.current(), None);
        assert!(!store.is_initializing());
    }

    #[tokio::test]
    async fn login_persists_and_survives_restart() {
        let storage = MemoryStore::new();
        let store = SessionStore::new(storage.clone());
        store.initialize().await;

        let session = store.login("t2", "u2", Role::Admin).await.unwrap();
        assert_eq!(session, Session::new("t2", "u2", Role::Admin));
        assert_eq!(store.current(), Some(session.clone()));

        let restarted = SessionStore::new(storage);
        restarted.initialize().await;
        assert_eq!(restarted.current(), Some(session));
    }

    #[tokio::test]
    async fn failed_login_write_keeps_previous_state() {
        let storage = FaultyStore::new(MemoryStore::new());
        let store = SessionStore::new(storage);
        store.initialize().await;
        store.login("t1", "u1", Role::User).await.unwrap();

        store.storage().fail_set(true);
        let err = store.login("t2", "u2", Role::Admin).await.unwrap_err();

        assert!(matches!(err, AuthError::Persist(_)));
        assert_eq!(store.current(), Some(Session::new("t1", "u1", Role::User)));
    }

    #[tokio::test]
    #[traced_test]
    async fn logout_clears_state_even_when_removal_fails() {
        let storage = FaultyStore::new(MemoryStore::new());
        let store = SessionStore::new(storage);
        store.initialize().await;
        store.login("t1", "u1", Role::User).await.unwrap();

        store.storage().fail_remove(true);
        store.logout().await;

        assert_eq!(store.current(), None);
        assert!(logs_contain("failed to remove persisted session"));
    }

    #[tokio::test]
    async fn logout_when_logged_out_is_a_no_op() {
        let storage = MemoryStore::new();
        let store = SessionStore::new(storage.clone());
        store.initialize().await;

        store.logout().await;
        store.logout().await;

        assert_eq!(store.current(), None);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn logout_removes_persisted_value() {
        let storage = MemoryStore::new();
        let store = SessionStore::new(storage.clone());
        store.initialize().await;
        store.login("t", "u", Role::User).await.unwrap();
        store.logout().await;

        let restarted = SessionStore::new(storage);
        restarted.initialize().await;
        assert_eq!(restarted.current(), None);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let store = SessionStore::new(MemoryStore::new());
        let mut rx = store.subscribe();

        store.initialize().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_ready());

        store.login("t", "u", Role::User).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow_and_update().session().map(Session::user_id),
            Some("u")
        );
    }

    #[tokio::test]
    async fn wait_until_ready_resolves_after_initialize() {
        let store = Arc::new(SessionStore::new(MemoryStore::with_entry(
            SESSION_KEY,
            r#"{"token":"t1","userId":"u1","role":"admin"}"#,
        )));

        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.wait_until_ready().await })
        };
        store.initialize().await;

        let state = waiter.await.unwrap();
        assert!(state.is_ready());
        assert_eq!(state.current, Some(Session::new("t1", "u1", Role::Admin)));
    }

    #[tokio::test]
    async fn login_racing_initialize_is_not_overwritten() {
        let storage = MemoryStore::new();
        let store = Arc::new(SessionStore::new(storage.clone()));

        let init = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.initialize().await })
        };
        let login = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.login("t", "u", Role::User).await })
        };
        init.await.unwrap();
        login.await.unwrap().unwrap();

        // Whichever ran first, memory and storage agree once both settle.
        let restarted = SessionStore::new(storage);
        restarted.initialize().await;
        assert_eq!(store.current(), Some(Session::new("t", "u", Role::User)));
        assert_eq!(restarted.current(), store.current());
    }
}
