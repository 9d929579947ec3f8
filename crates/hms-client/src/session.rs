//! Session state machine.
//!
//! # Purpose
//! Owns the signed-in identity, the bearer token, and the monitor flag,
//! and keeps the durable storage keys in lockstep with every transition.
//!
//! # How it fits
//! The gateway reads the token from here on every request and calls
//! [`SessionStore::handle_unauthorized`] when the server answers 401. The
//! route guard evaluates [`SessionSnapshot`]s taken from here.
//!
//! # Key invariants
//! - The session is authenticated exactly when both a user and a token
//!   are held; there is no state with one but not the other.
//! - Storage writes happen inside the same transition, so a reload
//!   mid-flow rehydrates either the old session or the new one, never a
//!   mix.
//! - `logout` is idempotent and purely local; no network call is made.
use crate::endpoints::auth;
use crate::gateway::Gateway;
use crate::storage::{KEY_IS_MONITOR, KEY_TOKEN, KEY_USER, SessionStorage};
use hms_api::{ApiError, LoginRequest, LoginResponse, Role};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("session storage error: {0}")]
    Storage(String),
}

/// Identity persisted under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

/// Where the session currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// A point-in-time copy of the session, safe to hand to the route guard.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub user: Option<SessionUser>,
    pub token: Option<String>,
    pub is_monitor: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// Exact role match; no role implies another.
    pub fn has_role(&self, role: Role) -> bool {
        self.user.as_ref().is_some_and(|user| user.role == role)
    }
}

enum State {
    Unauthenticated,
    Authenticating,
    Authenticated {
        user: SessionUser,
        token: String,
        is_monitor: bool,
    },
}

pub struct SessionStore {
    state: RwLock<State>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    /// Build the store, rehydrating any session the storage still holds.
    /// A rehydrated token is trusted until the server first rejects it.
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        let state = Self::hydrate(storage.as_ref());
        Self {
            state: RwLock::new(state),
            storage,
        }
    }

    fn hydrate(storage: &dyn SessionStorage) -> State {
        let Some(token) = storage.get(KEY_TOKEN) else {
            return State::Unauthenticated;
        };
        let Some(user_json) = storage.get(KEY_USER) else {
            return State::Unauthenticated;
        };
        let Ok(user) = serde_json::from_str::<SessionUser>(&user_json) else {
            tracing::warn!("stored user record is unreadable; starting unauthenticated");
            return State::Unauthenticated;
        };
        let is_monitor = storage
            .get(KEY_IS_MONITOR)
            .is_some_and(|value| value == "true");
        State::Authenticated {
            user,
            token,
            is_monitor,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match *self.read() {
            State::Unauthenticated => SessionPhase::Unauthenticated,
            State::Authenticating => SessionPhase::Authenticating,
            State::Authenticated { .. } => SessionPhase::Authenticated,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &*self.read() {
            State::Authenticated {
                user,
                token,
                is_monitor,
            } => SessionSnapshot {
                user: Some(user.clone()),
                token: Some(token.clone()),
                is_monitor: *is_monitor,
            },
            _ => SessionSnapshot {
                user: None,
                token: None,
                is_monitor: false,
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.read(), State::Authenticated { .. })
    }

    pub fn has_role(&self, role: Role) -> bool {
        match &*self.read() {
            State::Authenticated { user, .. } => user.role == role,
            _ => false,
        }
    }

    pub fn is_monitor(&self) -> bool {
        match &*self.read() {
            State::Authenticated { is_monitor, .. } => *is_monitor,
            _ => false,
        }
    }

    pub fn token(&self) -> Option<String> {
        match &*self.read() {
            State::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    /// Run the credential exchange and, on success, commit the session to
    /// memory and storage in one transition. Any failure lands back in
    /// `Unauthenticated` with the previous session (if any) discarded.
    pub async fn login(
        &self,
        gateway: &Gateway,
        credentials: &LoginRequest,
    ) -> Result<LoginResponse, SessionError> {
        *self.write() = State::Authenticating;
        match auth::login(gateway, credentials).await {
            Ok(response) => {
                // The login response carries no numeric user id; it stays 0
                // until a profile read supplies one.
                let user = SessionUser {
                    user_id: 0,
                    email: response.email.clone(),
                    role: response.role,
                };
                self.commit(user, response.token.clone(), response.is_monitor)?;
                tracing::info!(role = %response.role, "login succeeded");
                Ok(response)
            }
            Err(err) => {
                *self.write() = State::Unauthenticated;
                Err(SessionError::Api(err))
            }
        }
    }

    fn commit(&self, user: SessionUser, token: String, is_monitor: bool) -> Result<(), SessionError> {
        let mut state = self.write();
        let persisted = self.persist(&user, &token, is_monitor);
        if let Err(err) = persisted {
            // Half-written keys would rehydrate as a broken session.
            self.clear_storage();
            *state = State::Unauthenticated;
            return Err(SessionError::Storage(err.to_string()));
        }
        *state = State::Authenticated {
            user,
            token,
            is_monitor,
        };
        Ok(())
    }

    fn persist(&self, user: &SessionUser, token: &str, is_monitor: bool) -> anyhow::Result<()> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set(KEY_TOKEN, token)?;
        self.storage.set(KEY_USER, &user_json)?;
        self.storage
            .set(KEY_IS_MONITOR, if is_monitor { "true" } else { "false" })?;
        Ok(())
    }

    /// Drop the session locally and clear all three storage keys. Safe to
    /// call in any state.
    pub fn logout(&self) {
        let mut state = self.write();
        self.clear_storage();
        *state = State::Unauthenticated;
    }

    /// The server rejected our token; the session is no longer valid.
    pub(crate) fn handle_unauthorized(&self) {
        if self.is_authenticated() {
            tracing::warn!("token rejected by server; tearing down session");
        }
        self.logout();
    }

    fn clear_storage(&self) {
        for key in [KEY_TOKEN, KEY_USER, KEY_IS_MONITOR] {
            if let Err(err) = self.storage.remove(key) {
                tracing::warn!(key, error = %err, "failed to clear session key");
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn seeded_storage(role: Role, is_monitor: bool) -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.set(KEY_TOKEN, "tok-9").expect("set");
        let user = SessionUser {
            user_id: 7,
            email: "s@hostel.edu".to_string(),
            role,
        };
        storage
            .set(KEY_USER, &serde_json::to_string(&user).expect("encode"))
            .expect("set");
        storage
            .set(KEY_IS_MONITOR, if is_monitor { "true" } else { "false" })
            .expect("set");
        storage
    }

    #[test]
    fn hydrates_authenticated_from_complete_storage() {
        let store = SessionStore::new(Box::new(seeded_storage(Role::Student, true)));
        assert_eq!(store.phase(), SessionPhase::Authenticated);
        assert!(store.is_monitor());
        assert!(store.has_role(Role::Student));
        assert!(!store.has_role(Role::Admin));
        assert_eq!(store.token().as_deref(), Some("tok-9"));
    }

    #[test]
    fn token_without_user_hydrates_unauthenticated() {
        let storage = MemoryStorage::new();
        storage.set(KEY_TOKEN, "orphan").expect("set");
        let store = SessionStore::new(Box::new(storage));
        assert_eq!(store.phase(), SessionPhase::Unauthenticated);
        assert!(store.token().is_none());
    }

    #[test]
    fn corrupt_user_record_hydrates_unauthenticated() {
        let storage = MemoryStorage::new();
        storage.set(KEY_TOKEN, "tok").expect("set");
        storage.set(KEY_USER, "not json").expect("set");
        let store = SessionStore::new(Box::new(storage));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn logout_clears_every_key_and_is_idempotent() {
        let store = SessionStore::new(Box::new(seeded_storage(Role::Warden, false)));
        store.logout();
        assert_eq!(store.phase(), SessionPhase::Unauthenticated);
        let snapshot = store.snapshot();
        assert!(snapshot.user.is_none() && snapshot.token.is_none());
        assert!(!snapshot.is_monitor);
        store.logout();
        assert_eq!(store.phase(), SessionPhase::Unauthenticated);
    }

    #[test]
    fn snapshot_authentication_requires_user_and_token() {
        let store = SessionStore::new(Box::new(seeded_storage(Role::Admin, false)));
        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated());
        assert!(snapshot.has_role(Role::Admin));
        store.logout();
        assert!(!store.snapshot().is_authenticated());
    }
}
