//! Session cookie plumbing for the interactive authorize flow.
//!
//! Sessions are created lazily on first use and identified by an opaque
//! id in an `HttpOnly` cookie. `SameSite=Lax` so the cookie still rides
//! top-level redirects from client applications into `/authorize`.

use crate::csrf;
use axum::http::{header, HeaderMap, HeaderValue};
use gatehouse_store::{Clock, Session, SessionStore, StoreError};

/// Cookie name for web sessions.
pub const SESSION_COOKIE_NAME: &str = "gatehouse_session";

/// Cookie max age in seconds (24 hours).
pub const SESSION_COOKIE_MAX_AGE: i64 = 86400;

/// Build the session cookie header value.
#[must_use]
pub fn create_session_cookie(session_id: &str, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{SESSION_COOKIE_NAME}={session_id}; HttpOnly{secure_flag}; SameSite=Lax; Path=/; Max-Age={SESSION_COOKIE_MAX_AGE}"
    )
}

/// Build the header value that clears the session cookie.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!("{SESSION_COOKIE_NAME}=; HttpOnly{secure_flag}; SameSite=Lax; Path=/; Max-Age=0")
}

/// Extract the session id from request cookies.
#[must_use]
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_str = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_str.split(';') {
        if let Some(value) = part.trim().strip_prefix(&format!("{SESSION_COOKIE_NAME}=")) {
            if !value.is_empty() {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Load the request's session, creating and persisting a fresh one when
/// the cookie is absent or stale.
///
/// Returns the session and, when one was created, the `Set-Cookie` value
/// the response must carry.
pub async fn load_or_create_session(
    sessions: &dyn SessionStore,
    clock: &Clock,
    headers: &HeaderMap,
    secure: bool,
) -> Result<(Session, Option<HeaderValue>), StoreError> {
    if let Some(id) = extract_session_cookie(headers) {
        if let Some(session) = sessions.get(&id).await? {
            return Ok((session, None));
        }
    }

    let session = Session {
        id: gatehouse_auth::random_secret(),
        user_id: None,
        csrf_token: csrf::new_token(),
        pending_authorize: None,
        created_at: clock.now(),
    };
    let session = sessions.put(session).await?;
    let cookie = create_session_cookie(&session.id, secure);
    Ok((session, HeaderValue::from_str(&cookie).ok()))
}
