//! Router configuration and shared state.
//!
//! The embedding web runtime constructs an [`OAuthState`] over its chosen
//! store backends and mounts [`oauth_router`] wherever it terminates HTTP.

use crate::config::ServerConfig;
use crate::handlers::{
    approve_handler, authorize_handler, login_page_handler, login_submit_handler, me_handler,
    refuse_handler, token_handler,
};
use crate::middleware::bearer::bearer_auth_middleware;
use crate::services::{AuthorizationService, ClientService, CredentialService, TokenService};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use gatehouse_auth::PasswordHasher;
use gatehouse_store::{
    AccessTokenStore, AuthCodeStore, ClientStore, Clock, RefreshTokenStore, SessionStore,
    UserStore,
};
use std::sync::Arc;

/// Application state for the OAuth routes. Cheap to clone; everything
/// inside is shared.
#[derive(Clone)]
pub struct OAuthState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Time source shared with the stores.
    pub clock: Clock,
    /// User accounts, read directly by bearer validation and the refresh
    /// grant.
    pub users: Arc<dyn UserStore>,
    /// Web sessions.
    pub sessions: Arc<dyn SessionStore>,
    /// Client resolution and authentication.
    pub client_service: ClientService,
    /// Resource-owner credential verification.
    pub credential_service: CredentialService,
    /// Authorize-request validation and code lifecycle.
    pub authorization_service: AuthorizationService,
    /// Token minting and resolution.
    pub token_service: TokenService,
}

impl OAuthState {
    /// Wire up the services over the given store backends.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: ServerConfig,
        clock: Clock,
        users: Arc<dyn UserStore>,
        clients: Arc<dyn ClientStore>,
        auth_codes: Arc<dyn AuthCodeStore>,
        access_tokens: Arc<dyn AccessTokenStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let client_service = ClientService::new(clients);
        let credential_service = CredentialService::new(
            Arc::clone(&users),
            PasswordHasher::new(config.password_kdf),
        );
        let authorization_service = AuthorizationService::new(
            client_service.clone(),
            auth_codes,
            clock.clone(),
            config.clone(),
        );
        let token_service = TokenService::new(
            access_tokens,
            refresh_tokens,
            clock.clone(),
            config.clone(),
        );

        Self {
            config,
            clock,
            users,
            sessions,
            client_service,
            credential_service,
            authorization_service,
            token_service,
        }
    }
}

/// Create the OAuth router.
///
/// # Endpoints
///
/// - `GET /authorize` - start the code or implicit grant
/// - `GET /login` / `POST /login` - form-based session login
/// - `POST /approve` - user consent for the pending authorize request
/// - `GET /refuse` - user denial
/// - `POST /token` - grant exchange
/// - `GET /users/me` - bearer-protected resource
pub fn oauth_router(state: OAuthState) -> Router {
    let protected = Router::new()
        .route("/users/me", get(me_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_middleware,
        ));

    Router::new()
        .route("/authorize", get(authorize_handler))
        .route("/login", get(login_page_handler).post(login_submit_handler))
        .route("/approve", post(approve_handler))
        .route("/refuse", get(refuse_handler))
        .route("/token", post(token_handler))
        .merge(protected)
        .with_state(state)
}
