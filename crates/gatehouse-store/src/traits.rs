//! Store capability traits.
//!
//! Every backend implements these; the core is constructed over trait
//! objects and never names a concrete driver. `put` is an upsert. All
//! operations are async and safe to call concurrently; implementations
//! must not hold a lock across an await point.

use crate::error::StoreError;
use crate::models::{AccessToken, AuthCode, Client, RefreshToken, Session, User};
use async_trait::async_trait;
use uuid::Uuid;

/// User accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by id.
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fetch a user by unique login name.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    /// Insert or update a user.
    async fn put(&self, user: User) -> Result<User, StoreError>;

    /// Delete a user. Idempotent.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Registered clients.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Fetch a client by id.
    async fn get(&self, id: &str) -> Result<Option<Client>, StoreError>;

    /// Insert or update a client.
    async fn put(&self, client: Client) -> Result<Client, StoreError>;

    /// Delete a client. Idempotent.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Authorization codes. Expired entries are treated as absent and purged.
#[async_trait]
pub trait AuthCodeStore: Send + Sync {
    /// Fetch a live code.
    async fn get(&self, code: &str) -> Result<Option<AuthCode>, StoreError>;

    /// Insert or update a code.
    async fn put(&self, code: AuthCode) -> Result<AuthCode, StoreError>;

    /// Delete a code. Idempotent.
    async fn delete(&self, code: &str) -> Result<(), StoreError>;

    /// Atomically remove and return a live code.
    ///
    /// Single-use redemption hinges on this: of two concurrent takers of
    /// the same code, at most one receives the record.
    async fn take(&self, code: &str) -> Result<Option<AuthCode>, StoreError>;
}

/// Access tokens, indexed by their secret. Expired entries are treated as
/// absent and purged.
#[async_trait]
pub trait AccessTokenStore: Send + Sync {
    /// Fetch a live token by secret.
    async fn get(&self, secret: &str) -> Result<Option<AccessToken>, StoreError>;

    /// Insert or update a token.
    async fn put(&self, token: AccessToken) -> Result<AccessToken, StoreError>;

    /// Delete a token. Idempotent.
    async fn delete(&self, secret: &str) -> Result<(), StoreError>;

    /// Drop every token minted for `client_id`, optionally narrowed to one
    /// user.
    async fn revoke_by(&self, client_id: &str, user_id: Option<Uuid>) -> Result<(), StoreError>;
}

/// Refresh tokens, indexed by their secret.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Fetch a token by secret.
    async fn get(&self, secret: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Insert or update a token.
    async fn put(&self, token: RefreshToken) -> Result<RefreshToken, StoreError>;

    /// Delete a token. Idempotent.
    async fn delete(&self, secret: &str) -> Result<(), StoreError>;

    /// Drop every token minted for `client_id`, optionally narrowed to one
    /// user.
    async fn revoke_by(&self, client_id: &str, user_id: Option<Uuid>) -> Result<(), StoreError>;
}

/// Web sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session by id.
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError>;

    /// Insert or update a session.
    async fn put(&self, session: Session) -> Result<Session, StoreError>;

    /// Delete a session. Idempotent.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
