//! Authorization endpoint: `GET /authorize`, `POST /approve`,
//! `GET /refuse`.
//!
//! The interactive flow parks the validated request in the session while
//! the user logs in and decides, then re-validates it before anything is
//! minted:
//!
//! ```text
//! GET /authorize -> (not logged in)            302 /login
//!                -> (logged in, approved)      302 redirect_uri with artifact
//!                -> (logged in, needs consent) 200 consent page
//! POST /approve  -> 302 redirect_uri with artifact
//! GET /refuse    -> 302 redirect_uri with error=access_denied
//! ```

use crate::csrf;
use crate::error::{append_query, AuthorizeReject, OAuthError, OAuthErrorCode};
use crate::handlers::{found, with_cookie};
use crate::middleware::session::{extract_session_cookie, load_or_create_session};
use crate::models::{ApproveRequest, AuthorizeRequest};
use crate::router::OAuthState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Form,
};
use gatehouse_store::{Client, PendingAuthorize, Session};
use uuid::Uuid;

/// Start the authorization code or implicit grant.
///
/// The redirect target is validated against the client's registration
/// before anything is sent to it; see [`AuthorizeReject`] for how failures
/// split between JSON answers and error redirects.
pub async fn authorize_handler(
    State(state): State<OAuthState>,
    headers: HeaderMap,
    Query(request): Query<AuthorizeRequest>,
) -> Result<Response, AuthorizeReject> {
    let (mut session, set_cookie) = load_or_create_session(
        state.sessions.as_ref(),
        &state.clock,
        &headers,
        state.config.secure_cookies,
    )
    .await?;

    // A bare GET /authorize resumes the parked request (the post-login
    // re-entry path).
    let request = if request.client_id.is_none() {
        match session.pending_authorize.clone() {
            Some(pending) => request_from_pending(pending),
            None => request,
        }
    } else {
        request
    };

    let (client, pending) = state
        .authorization_service
        .validate_authorize_request(&request)
        .await?;

    session.pending_authorize = Some(pending.clone());
    state.sessions.put(session.clone()).await?;

    let Some(user_id) = session.user_id else {
        return Ok(with_cookie(found("/login"), set_cookie));
    };

    // A stale login (user deleted or disabled since) goes back through
    // the login form.
    let user_live = state
        .users
        .get(user_id)
        .await
        .map_err(OAuthError::from)?
        .is_some_and(|u| u.enabled);
    if !user_live {
        session.user_id = None;
        state.sessions.put(session).await?;
        return Ok(with_cookie(found("/login"), set_cookie));
    }

    if client.approved {
        let response = issue_authorization(&state, session, &client, &pending, user_id).await?;
        return Ok(with_cookie(response, set_cookie));
    }

    Ok(with_cookie(
        Html(consent_page(&client, &pending, &session.csrf_token)).into_response(),
        set_cookie,
    ))
}

/// Record the user's consent and deliver the authorization artifact.
pub async fn approve_handler(
    State(state): State<OAuthState>,
    headers: HeaderMap,
    Form(request): Form<ApproveRequest>,
) -> Result<Response, AuthorizeReject> {
    let session = require_session(&state, &headers).await?;

    if !csrf::verify(&session.csrf_token, request.csrf_token.as_deref()) {
        tracing::warn!("CSRF validation failed on consent form");
        return Err(OAuthError::InvalidRequest("CSRF validation failed".to_string()).into());
    }

    let user_id = session
        .user_id
        .ok_or_else(|| OAuthError::InvalidRequest("login is required".to_string()))?;
    let pending = session
        .pending_authorize
        .clone()
        .ok_or_else(|| {
            OAuthError::InvalidRequest("no pending authorization request".to_string())
        })?;

    // Park time may have invalidated the request; validate it again
    // before minting anything.
    let (client, pending) = state
        .authorization_service
        .validate_authorize_request(&request_from_pending(pending))
        .await?;

    issue_authorization(&state, session, &client, &pending, user_id).await
}

/// Record the user's refusal: the client gets `error=access_denied` on its
/// redirect URI and the parked request is dropped.
pub async fn refuse_handler(
    State(state): State<OAuthState>,
    headers: HeaderMap,
) -> Result<Response, AuthorizeReject> {
    let mut session = require_session(&state, &headers).await?;
    let pending = session.pending_authorize.take().ok_or_else(|| {
        OAuthError::InvalidRequest("no pending authorization request".to_string())
    })?;
    state.sessions.put(session).await?;

    Ok(AuthorizeReject::Redirect {
        redirect_uri: pending.redirect_uri,
        error: OAuthErrorCode::AccessDenied,
        description: "the user denied the authorization request".to_string(),
        state: pending.state,
    }
    .into_response())
}

/// Mint the requested artifact and build the success redirect. Clears the
/// parked request.
async fn issue_authorization(
    state: &OAuthState,
    mut session: Session,
    client: &Client,
    pending: &PendingAuthorize,
    user_id: Uuid,
) -> Result<Response, AuthorizeReject> {
    session.pending_authorize = None;
    state.sessions.put(session).await?;

    if pending.response_type == "token" {
        // Implicit grant: token in the fragment, never a refresh token.
        let token = state
            .token_service
            .issue_access(&client.id, Some(user_id), &pending.scope)
            .await?;
        let mut fragment = format!(
            "access_token={}&token_type=Bearer&expires_in={}",
            urlencoding::encode(&token.secret),
            state.token_service.access_token_ttl(),
        );
        if let Some(ref s) = pending.state {
            fragment.push_str("&state=");
            fragment.push_str(&urlencoding::encode(s));
        }
        return Ok(found(&format!("{}#{fragment}", pending.redirect_uri)));
    }

    let code = state
        .authorization_service
        .mint_code(pending, user_id)
        .await?;
    let mut params: Vec<(&str, &str)> = vec![("code", &code.code)];
    if let Some(ref s) = pending.state {
        params.push(("state", s));
    }
    Ok(found(&append_query(&pending.redirect_uri, &params)))
}

/// Rebuild the wire request from a parked one, so re-entry and issue-time
/// checks run the full validator again.
fn request_from_pending(pending: PendingAuthorize) -> AuthorizeRequest {
    AuthorizeRequest {
        response_type: Some(pending.response_type),
        client_id: Some(pending.client_id),
        redirect_uri: Some(pending.redirect_uri),
        scope: Some(pending.scope),
        state: pending.state,
        code_challenge: pending.code_challenge,
        code_challenge_method: pending.code_challenge_method.map(|m| m.to_string()),
    }
}

/// The approve/refuse endpoints only make sense inside an existing
/// session.
async fn require_session(
    state: &OAuthState,
    headers: &HeaderMap,
) -> Result<Session, AuthorizeReject> {
    let id = extract_session_cookie(headers)
        .ok_or_else(|| OAuthError::InvalidRequest("no active session".to_string()))?;
    let session = state
        .sessions
        .get(&id)
        .await?
        .ok_or_else(|| OAuthError::InvalidRequest("no active session".to_string()))?;
    Ok(session)
}

/// Minimal consent page. The embedding web runtime is expected to replace
/// this with its own rendering.
fn consent_page(client: &Client, pending: &PendingAuthorize, csrf_token: &str) -> String {
    let scopes = if pending.scope.is_empty() {
        "<li>(no scope requested)</li>".to_string()
    } else {
        pending
            .scope
            .split_whitespace()
            .map(|s| format!("<li><code>{s}</code></li>"))
            .collect()
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Authorize {info}</title></head>
<body>
  <h1>Authorize {info}?</h1>
  <p><a href="{homepage}">{homepage}</a> is requesting access to:</p>
  <ul>{scopes}</ul>
  <form method="post" action="/approve">
    <input type="hidden" name="csrf_token" value="{csrf_token}">
    <button type="submit">Approve</button>
  </form>
  <p><a href="/refuse">Deny</a></p>
</body>
</html>"#,
        info = client.info,
        homepage = client.homepage,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_auth::CodeChallengeMethod;

    fn pending() -> PendingAuthorize {
        PendingAuthorize {
            response_type: "code".to_string(),
            client_id: "client-1".to_string(),
            redirect_uri: "http://localhost".to_string(),
            scope: "photo:read".to_string(),
            state: Some("123ABC".to_string()),
            code_challenge: Some("challenge".to_string()),
            code_challenge_method: Some(CodeChallengeMethod::S256),
        }
    }

    #[test]
    fn test_request_from_pending_round_trips_pkce() {
        let request = request_from_pending(pending());
        assert_eq!(request.response_type.as_deref(), Some("code"));
        assert_eq!(request.code_challenge_method.as_deref(), Some("S256"));
        assert_eq!(request.state.as_deref(), Some("123ABC"));
    }

    #[test]
    fn test_consent_page_embeds_csrf_token() {
        let client = Client {
            id: "client-1".to_string(),
            secret: None,
            info: "Photo Printer".to_string(),
            homepage: "https://printer.example".to_string(),
            approved: false,
            scopes: vec!["photo:read".to_string()],
            grants: vec!["authorization_code".to_string()],
            redirects: vec!["http://localhost".to_string()],
            enabled: true,
        };
        let page = consent_page(&client, &pending(), "csrf-123");
        assert!(page.contains(r#"name="csrf_token" value="csrf-123""#));
        assert!(page.contains("Photo Printer"));
        assert!(page.contains("photo:read"));
    }
}
