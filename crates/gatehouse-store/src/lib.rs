//! Entities and pluggable credential stores for the gatehouse
//! authorization server.
//!
//! Storage engines are external to the core: the protocol machinery only
//! speaks to the [`traits`] in this crate, and any backend that satisfies
//! them can be plugged in at construction time. The [`memory`] backend
//! ships here and is what the test suites use.
//!
//! Expiring entities (authorization codes, access tokens) are enforced at
//! the store boundary: a lookup of an expired entry reports absence and
//! purges it. Time comes from the injectable [`Clock`] so tests control
//! expiry deterministically.

pub mod clock;
pub mod error;
pub mod memory;
pub mod models;
pub mod traits;

pub use clock::Clock;
pub use error::StoreError;
pub use memory::{
    InMemoryAccessTokenStore, InMemoryAuthCodeStore, InMemoryClientStore,
    InMemoryRefreshTokenStore, InMemorySessionStore, InMemoryUserStore,
};
pub use models::{
    AccessToken, AuthCode, Client, PendingAuthorize, RefreshToken, Session, User,
};
pub use traits::{
    AccessTokenStore, AuthCodeStore, ClientStore, RefreshTokenStore, SessionStore, UserStore,
};
