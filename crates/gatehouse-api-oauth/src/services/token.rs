//! Access and refresh token minting and resolution.

use crate::config::ServerConfig;
use crate::error::OAuthError;
use crate::models::TokenResponse;
use chrono::Duration;
use gatehouse_store::{AccessToken, AccessTokenStore, Clock, RefreshToken, RefreshTokenStore};
use std::sync::Arc;
use uuid::Uuid;

/// Service minting and resolving opaque bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    access_tokens: Arc<dyn AccessTokenStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    clock: Clock,
    config: ServerConfig,
}

impl TokenService {
    /// Create a new token service.
    #[must_use]
    pub fn new(
        access_tokens: Arc<dyn AccessTokenStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        clock: Clock,
        config: ServerConfig,
    ) -> Self {
        Self {
            access_tokens,
            refresh_tokens,
            clock,
            config,
        }
    }

    /// Access token lifetime in seconds.
    #[must_use]
    pub fn access_token_ttl(&self) -> u64 {
        self.config.access_token_ttl
    }

    /// Mint and persist an access token.
    pub async fn issue_access(
        &self,
        client_id: &str,
        user_id: Option<Uuid>,
        scope: &str,
    ) -> Result<AccessToken, OAuthError> {
        let now = self.clock.now();
        let token = AccessToken {
            secret: gatehouse_auth::random_secret(),
            client_id: client_id.to_string(),
            user_id,
            scope: scope.to_string(),
            expires_at: now + Duration::seconds(self.config.access_token_ttl as i64),
            created_at: now,
        };
        Ok(self.access_tokens.put(token).await?)
    }

    /// Mint and persist a refresh token.
    pub async fn issue_refresh(
        &self,
        client_id: &str,
        user_id: Uuid,
        scope: &str,
    ) -> Result<RefreshToken, OAuthError> {
        let token = RefreshToken {
            secret: gatehouse_auth::random_secret(),
            client_id: client_id.to_string(),
            user_id,
            scope: scope.to_string(),
            created_at: self.clock.now(),
        };
        Ok(self.refresh_tokens.put(token).await?)
    }

    /// Build the RFC 6749 §5.1 response body for a minted pair.
    #[must_use]
    pub fn respond(&self, access: &AccessToken, refresh_token: Option<String>) -> TokenResponse {
        TokenResponse {
            access_token: access.secret.clone(),
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
            refresh_token,
            scope: (!access.scope.is_empty()).then(|| access.scope.clone()),
        }
    }

    /// Resolve a live access token by its secret. Expired tokens are
    /// absent.
    pub async fn resolve_access_token(
        &self,
        secret: &str,
    ) -> Result<Option<AccessToken>, OAuthError> {
        Ok(self.access_tokens.get(secret).await?)
    }

    /// Resolve a refresh token by its secret.
    pub async fn find_refresh_token(
        &self,
        secret: &str,
    ) -> Result<Option<RefreshToken>, OAuthError> {
        Ok(self.refresh_tokens.get(secret).await?)
    }
}
