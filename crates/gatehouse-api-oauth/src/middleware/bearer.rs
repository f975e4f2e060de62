//! Bearer token authorization for protected resources (RFC 6750).
//!
//! Resolves the opaque token against the access token store, re-checks
//! that the owning client and user are still enabled, and attaches the
//! resolved principal to the request as an [`AuthContext`] extension.

use crate::error::{OAuthErrorCode, OAuthErrorResponse};
use crate::router::OAuthState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use gatehouse_store::User;

/// Resolved bearer credentials, attached to the request by
/// [`bearer_auth_middleware`]. `user` is `None` for client-credentials
/// tokens.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Owning user, if the token has one.
    pub user: Option<User>,
    /// Client the token was minted for.
    pub client_id: String,
    /// Scope granted to the token.
    pub scope: String,
}

/// Bearer authorization middleware.
///
/// Disabled clients and users are re-checked on every request: revocation
/// by disabling a principal takes effect immediately, not only at mint
/// time.
pub async fn bearer_auth_middleware(
    State(state): State<OAuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                OAuthErrorCode::InvalidRequest,
                "missing Authorization header",
            )
        })?;

    let secret = header_value.strip_prefix("Bearer ").ok_or_else(|| {
        reject(
            StatusCode::UNAUTHORIZED,
            OAuthErrorCode::InvalidRequest,
            "Authorization header is not a Bearer credential",
        )
    })?;

    if secret.is_empty() {
        return Err(reject(
            StatusCode::UNAUTHORIZED,
            OAuthErrorCode::InvalidToken,
            "empty bearer token",
        ));
    }

    // Expired tokens are already absent at the store boundary.
    let token = state
        .token_service
        .resolve_access_token(secret)
        .await
        .map_err(|err| err.into_response())?
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                OAuthErrorCode::InvalidToken,
                "bearer token is invalid or expired",
            )
        })?;

    let client = state
        .client_service
        .find(&token.client_id)
        .await
        .map_err(|err| err.into_response())?;
    if !client.as_ref().is_some_and(|c| c.enabled) {
        tracing::warn!(client_id = %token.client_id, "bearer token for disabled client rejected");
        return Err(reject(
            StatusCode::BAD_REQUEST,
            OAuthErrorCode::InvalidRequest,
            "token was issued to a disabled client",
        ));
    }

    let user = match token.user_id {
        Some(user_id) => {
            let user = state
                .users
                .get(user_id)
                .await
                .map_err(|err| crate::error::OAuthError::from(err).into_response())?;
            match user {
                Some(user) if user.enabled => Some(user),
                _ => {
                    tracing::warn!(%user_id, "bearer token for disabled user rejected");
                    return Err(reject(
                        StatusCode::BAD_REQUEST,
                        OAuthErrorCode::InvalidRequest,
                        "token was issued to a disabled user",
                    ));
                }
            }
        }
        None => None,
    };

    request.extensions_mut().insert(AuthContext {
        user,
        client_id: token.client_id,
        scope: token.scope,
    });

    Ok(next.run(request).await)
}

/// Build a bearer rejection: JSON error body plus a `WWW-Authenticate`
/// challenge naming `invalid_token` (RFC 6750 §3).
fn reject(status: StatusCode, code: OAuthErrorCode, description: &str) -> Response {
    let challenge = match code {
        OAuthErrorCode::InvalidRequest if status == StatusCode::UNAUTHORIZED => {
            "Bearer".to_string()
        }
        _ => format!(r#"Bearer error="invalid_token", error_description="{description}""#),
    };
    (
        status,
        [(header::WWW_AUTHENTICATE, challenge)],
        Json(OAuthErrorResponse::new(code, description)),
    )
        .into_response()
}
