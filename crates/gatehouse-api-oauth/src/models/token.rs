//! Token endpoint models.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Form body for `POST /token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    /// Grant type (`authorization_code`, `password`, `client_credentials`,
    /// `refresh_token`).
    pub grant_type: String,
    /// Authorization code (authorization_code grant).
    pub code: Option<String>,
    /// Redirect URI; must equal the one recorded on the code.
    pub redirect_uri: Option<String>,
    /// PKCE code verifier.
    pub code_verifier: Option<String>,
    /// Resource-owner login (password grant).
    pub username: Option<String>,
    /// Resource-owner password (password grant).
    pub password: Option<String>,
    /// Refresh token (refresh_token grant).
    pub refresh_token: Option<String>,
    /// Requested scope (password and client_credentials grants).
    pub scope: Option<String>,
    /// Client id, when not using Basic auth.
    pub client_id: Option<String>,
    /// Client secret, when not using Basic auth.
    pub client_secret: Option<String>,
}

/// Successful token response (RFC 6749 §5.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    /// Opaque refresh token, absent for client-credentials responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Granted scope, absent when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl IntoResponse for TokenResponse {
    fn into_response(self) -> Response {
        // RFC 6749 §5.1: token responses must not be cached.
        (
            [
                (header::CACHE_CONTROL, "no-store"),
                (header::PRAGMA, "no-cache"),
            ],
            Json(self),
        )
            .into_response()
    }
}
