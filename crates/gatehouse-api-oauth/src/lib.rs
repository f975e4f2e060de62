//! OAuth 2.0 Authorization Server endpoints for gatehouse.
//!
//! This crate implements the protocol core of an `OAuth2` authorization
//! server over pluggable credential stores.
//!
//! # Supported Grant Types
//!
//! - **Authorization Code + PKCE**: interactive login and consent
//! - **Implicit**: access token delivered in the redirect fragment
//! - **Resource Owner Password**: direct username/password exchange
//! - **Client Credentials**: service-to-service authentication
//! - **Refresh Token**: new access tokens without re-authentication
//!
//! # Endpoints
//!
//! - `GET /authorize` - Authorization endpoint (code and implicit grants)
//! - `GET/POST /login` - Form-based session login (CSRF-protected)
//! - `POST /approve` - User consent for a pending authorize request
//! - `GET /refuse` - User denial (`access_denied` redirect)
//! - `POST /token` - Token endpoint for all grants
//! - `GET /users/me` - Bearer-protected resource echoing the token owner
//!
//! # Example
//!
//! ```rust,ignore
//! use gatehouse_api_oauth::{oauth_router, OAuthState, ServerConfig};
//! use gatehouse_store::Clock;
//! use std::sync::Arc;
//!
//! let clock = Clock::system();
//! let state = OAuthState::new(
//!     ServerConfig::default(),
//!     clock.clone(),
//!     users, clients, codes, access_tokens, refresh_tokens, sessions,
//! );
//! let app = oauth_router(state);
//! ```

pub mod config;
pub mod csrf;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use config::ServerConfig;
pub use error::{AuthorizeReject, OAuthError, OAuthErrorCode, OAuthErrorResponse};
pub use middleware::bearer::AuthContext;
pub use router::{oauth_router, OAuthState};
