//! In-memory store backend over concurrent maps.
//!
//! Per-entry locking only; no lock is held across an await point. Expiry
//! is enforced on lookup: an expired entry is purged and reported absent.

use crate::clock::Clock;
use crate::error::StoreError;
use crate::models::{AccessToken, AuthCode, Client, RefreshToken, Session, User};
use crate::traits::{
    AccessTokenStore, AuthCodeStore, ClientStore, RefreshTokenStore, SessionStore, UserStore,
};
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<Uuid, User>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.login == login)
            .map(|u| u.clone()))
    }

    async fn put(&self, user: User) -> Result<User, StoreError> {
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.users.remove(&id);
        Ok(())
    }
}

/// In-memory client store.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    clients: DashMap<String, Client>,
}

impl InMemoryClientStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn get(&self, id: &str) -> Result<Option<Client>, StoreError> {
        Ok(self.clients.get(id).map(|c| c.clone()))
    }

    async fn put(&self, client: Client) -> Result<Client, StoreError> {
        self.clients.insert(client.id.clone(), client.clone());
        Ok(client)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.clients.remove(id);
        Ok(())
    }
}

/// In-memory authorization code store with expiry enforcement.
#[derive(Debug)]
pub struct InMemoryAuthCodeStore {
    codes: DashMap<String, AuthCode>,
    clock: Clock,
}

impl InMemoryAuthCodeStore {
    /// Create an empty store reading time from `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            codes: DashMap::new(),
            clock,
        }
    }
}

#[async_trait]
impl AuthCodeStore for InMemoryAuthCodeStore {
    async fn get(&self, code: &str) -> Result<Option<AuthCode>, StoreError> {
        if let Some(entry) = self.codes.get(code) {
            if entry.expires_at > self.clock.now() {
                return Ok(Some(entry.clone()));
            }
        } else {
            return Ok(None);
        }
        // Expired: purge and miss.
        self.codes.remove(code);
        Ok(None)
    }

    async fn put(&self, code: AuthCode) -> Result<AuthCode, StoreError> {
        self.codes.insert(code.code.clone(), code.clone());
        Ok(code)
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.codes.remove(code);
        Ok(())
    }

    async fn take(&self, code: &str) -> Result<Option<AuthCode>, StoreError> {
        match self.codes.remove(code) {
            Some((_, entry)) if entry.expires_at > self.clock.now() => Ok(Some(entry)),
            _ => Ok(None),
        }
    }
}

/// In-memory access token store with expiry enforcement.
#[derive(Debug)]
pub struct InMemoryAccessTokenStore {
    tokens: DashMap<String, AccessToken>,
    clock: Clock,
}

impl InMemoryAccessTokenStore {
    /// Create an empty store reading time from `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            tokens: DashMap::new(),
            clock,
        }
    }
}

#[async_trait]
impl AccessTokenStore for InMemoryAccessTokenStore {
    async fn get(&self, secret: &str) -> Result<Option<AccessToken>, StoreError> {
        if let Some(entry) = self.tokens.get(secret) {
            if entry.expires_at > self.clock.now() {
                return Ok(Some(entry.clone()));
            }
        } else {
            return Ok(None);
        }
        self.tokens.remove(secret);
        Ok(None)
    }

    async fn put(&self, token: AccessToken) -> Result<AccessToken, StoreError> {
        self.tokens.insert(token.secret.clone(), token.clone());
        Ok(token)
    }

    async fn delete(&self, secret: &str) -> Result<(), StoreError> {
        self.tokens.remove(secret);
        Ok(())
    }

    async fn revoke_by(&self, client_id: &str, user_id: Option<Uuid>) -> Result<(), StoreError> {
        self.tokens
            .retain(|_, t| t.client_id != client_id || (user_id.is_some() && t.user_id != user_id));
        Ok(())
    }
}

/// In-memory refresh token store.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: DashMap<String, RefreshToken>,
}

impl InMemoryRefreshTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn get(&self, secret: &str) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.tokens.get(secret).map(|t| t.clone()))
    }

    async fn put(&self, token: RefreshToken) -> Result<RefreshToken, StoreError> {
        self.tokens.insert(token.secret.clone(), token.clone());
        Ok(token)
    }

    async fn delete(&self, secret: &str) -> Result<(), StoreError> {
        self.tokens.remove(secret);
        Ok(())
    }

    async fn revoke_by(&self, client_id: &str, user_id: Option<Uuid>) -> Result<(), StoreError> {
        self.tokens
            .retain(|_, t| t.client_id != client_id || user_id.is_some_and(|u| t.user_id != u));
        Ok(())
    }
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.get(id).map(|s| s.clone()))
    }

    async fn put(&self, session: Session) -> Result<Session, StoreError> {
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.sessions.remove(id);
        Ok(())
    }
}
