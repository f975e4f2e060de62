//! Token endpoint: `POST /token`.
//!
//! Dispatches across the four grant types. Client credentials come from
//! HTTP Basic auth or the request body; confidential clients must present
//! their secret either way.

use crate::error::OAuthError;
use crate::models::{TokenRequest, TokenResponse};
use crate::router::OAuthState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    Form,
};

/// Exchange a grant for tokens.
pub async fn token_handler(
    State(state): State<OAuthState>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Result<TokenResponse, OAuthError> {
    let (client_id, client_secret) = extract_client_credentials(&headers, &request)?;

    match request.grant_type.as_str() {
        "authorization_code" => {
            handle_authorization_code(&state, &request, &client_id, client_secret.as_deref()).await
        }
        "password" => handle_password(&state, &request, &client_id, client_secret.as_deref()).await,
        "client_credentials" => {
            handle_client_credentials(&state, &request, &client_id, client_secret.as_deref()).await
        }
        "refresh_token" => {
            handle_refresh_token(&state, &request, &client_id, client_secret.as_deref()).await
        }
        other => Err(OAuthError::UnsupportedGrantType(format!(
            "unsupported grant_type '{other}'"
        ))),
    }
}

/// Extract client credentials from the Authorization header or the body.
fn extract_client_credentials(
    headers: &HeaderMap,
    request: &TokenRequest,
) -> Result<(String, Option<String>), OAuthError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| OAuthError::InvalidClient("invalid Authorization header".to_string()))?;
        let (client_id, client_secret) = gatehouse_auth::parse_basic_auth(auth_str)?;
        return Ok((client_id, Some(client_secret)));
    }

    let client_id = request
        .client_id
        .clone()
        .ok_or_else(|| OAuthError::InvalidRequest("client_id is required".to_string()))?;
    Ok((client_id, request.client_secret.clone()))
}

/// `authorization_code`: redeem a code minted by the authorize endpoint,
/// enforcing the PKCE binding recorded on it.
async fn handle_authorization_code(
    state: &OAuthState,
    request: &TokenRequest,
    client_id: &str,
    client_secret: Option<&str>,
) -> Result<TokenResponse, OAuthError> {
    let client = state
        .client_service
        .authenticate(client_id, client_secret)
        .await?;
    state
        .client_service
        .require_grant(&client, "authorization_code")?;

    let code = request
        .code
        .as_deref()
        .ok_or_else(|| OAuthError::InvalidRequest("code is required".to_string()))?;
    let redirect_uri = request
        .redirect_uri
        .as_deref()
        .ok_or_else(|| OAuthError::InvalidRequest("redirect_uri is required".to_string()))?;

    let record = state
        .authorization_service
        .consume_code(code, &client, redirect_uri, request.code_verifier.as_deref())
        .await?;

    let access = state
        .token_service
        .issue_access(&client.id, Some(record.user_id), &record.scope)
        .await?;
    let refresh = state
        .token_service
        .issue_refresh(&client.id, record.user_id, &record.scope)
        .await?;
    Ok(state.token_service.respond(&access, Some(refresh.secret)))
}

/// `password`: direct resource-owner credential exchange.
async fn handle_password(
    state: &OAuthState,
    request: &TokenRequest,
    client_id: &str,
    client_secret: Option<&str>,
) -> Result<TokenResponse, OAuthError> {
    let client = state
        .client_service
        .authenticate(client_id, client_secret)
        .await?;
    state.client_service.require_grant(&client, "password")?;

    let username = request
        .username
        .as_deref()
        .ok_or_else(|| OAuthError::InvalidRequest("username is required".to_string()))?;
    let password = request
        .password
        .as_deref()
        .ok_or_else(|| OAuthError::InvalidRequest("password is required".to_string()))?;
    let scope = state
        .client_service
        .validate_scope(&client, request.scope.as_deref())?;

    let user = state
        .credential_service
        .authenticate(username, password)
        .await?;

    let access = state
        .token_service
        .issue_access(&client.id, Some(user.id), &scope)
        .await?;
    let refresh = state
        .token_service
        .issue_refresh(&client.id, user.id, &scope)
        .await?;
    Ok(state.token_service.respond(&access, Some(refresh.secret)))
}

/// `client_credentials`: service-to-service tokens. No user, no refresh
/// token, confidential clients only.
async fn handle_client_credentials(
    state: &OAuthState,
    request: &TokenRequest,
    client_id: &str,
    client_secret: Option<&str>,
) -> Result<TokenResponse, OAuthError> {
    let secret = client_secret.ok_or_else(|| {
        OAuthError::InvalidClient(
            "client_secret is required for the client_credentials grant".to_string(),
        )
    })?;
    let client = state
        .client_service
        .authenticate(client_id, Some(secret))
        .await?;
    state
        .client_service
        .require_grant(&client, "client_credentials")?;

    let scope = state
        .client_service
        .validate_scope(&client, request.scope.as_deref())?;

    let access = state
        .token_service
        .issue_access(&client.id, None, &scope)
        .await?;
    Ok(state.token_service.respond(&access, None))
}

/// `refresh_token`: a new access token for the same scope. The refresh
/// token is reusable and echoed back unchanged.
async fn handle_refresh_token(
    state: &OAuthState,
    request: &TokenRequest,
    client_id: &str,
    client_secret: Option<&str>,
) -> Result<TokenResponse, OAuthError> {
    let client = state
        .client_service
        .authenticate(client_id, client_secret)
        .await?;
    state.client_service.require_grant(&client, "refresh_token")?;

    let secret = request
        .refresh_token
        .as_deref()
        .ok_or_else(|| OAuthError::InvalidRequest("refresh_token is required".to_string()))?;

    let refresh = state
        .token_service
        .find_refresh_token(secret)
        .await?
        .ok_or_else(|| {
            OAuthError::InvalidGrant("refresh token is invalid or revoked".to_string())
        })?;
    if refresh.client_id != client.id {
        tracing::warn!(client_id = %client.id, "refresh token presented by a different client");
        return Err(OAuthError::InvalidGrant(
            "refresh token was issued to another client".to_string(),
        ));
    }

    // The owning user must still be live; the client was re-checked by
    // authentication above.
    let user_live = state
        .users
        .get(refresh.user_id)
        .await?
        .is_some_and(|u| u.enabled);
    if !user_live {
        return Err(OAuthError::InvalidGrant(
            "user account is disabled".to_string(),
        ));
    }

    let access = state
        .token_service
        .issue_access(&client.id, Some(refresh.user_id), &refresh.scope)
        .await?;
    Ok(state
        .token_service
        .respond(&access, Some(refresh.secret.clone())))
}
