//! Form-based session login: `GET /login`, `POST /login`.
//!
//! CSRF-protected via the session token embedded in the form. Content
//! negotiation: browser form posts get a 302 to the landing URL, XHR
//! clients (`X-Requested-With: XMLHttpRequest` or `Accept:
//! application/json`) get JSON.

use crate::csrf;
use crate::error::OAuthError;
use crate::handlers::{found, with_cookie};
use crate::middleware::session::load_or_create_session;
use crate::models::{LoginRequest, LoginSuccess};
use crate::router::OAuthState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};

/// Render the login form, bootstrapping a session if needed.
pub async fn login_page_handler(
    State(state): State<OAuthState>,
    headers: HeaderMap,
) -> Result<Response, OAuthError> {
    let (session, set_cookie) = load_or_create_session(
        state.sessions.as_ref(),
        &state.clock,
        &headers,
        state.config.secure_cookies,
    )
    .await?;

    Ok(with_cookie(
        Html(login_page(&session.csrf_token, None)).into_response(),
        set_cookie,
    ))
}

/// Authenticate the submitted credentials and bind the user to the
/// session.
pub async fn login_submit_handler(
    State(state): State<OAuthState>,
    headers: HeaderMap,
    Form(request): Form<LoginRequest>,
) -> Response {
    let (mut session, set_cookie) = match load_or_create_session(
        state.sessions.as_ref(),
        &state.clock,
        &headers,
        state.config.secure_cookies,
    )
    .await
    {
        Ok(loaded) => loaded,
        Err(err) => return OAuthError::from(err).into_response(),
    };

    if !csrf::verify(&session.csrf_token, request.csrf_token.as_deref()) {
        tracing::warn!("CSRF validation failed on login form");
        return with_cookie(
            OAuthError::InvalidRequest("CSRF validation failed".to_string()).into_response(),
            set_cookie,
        );
    }

    match state
        .credential_service
        .authenticate(&request.username, &request.password)
        .await
    {
        Ok(user) => {
            session.user_id = Some(user.id);
            if let Err(err) = state.sessions.put(session.clone()).await {
                return OAuthError::from(err).into_response();
            }
            tracing::debug!(login = %user.login, "session login succeeded");

            // A parked authorize request resumes; otherwise land on the
            // configured page.
            let landing = if session.pending_authorize.is_some() {
                "/authorize".to_string()
            } else {
                state.config.landing_url.clone()
            };
            let response = if is_xhr(&headers) {
                Json(LoginSuccess {
                    landing_url: landing,
                })
                .into_response()
            } else {
                found(&landing)
            };
            with_cookie(response, set_cookie)
        }
        Err(err @ OAuthError::InvalidCredentials(_)) => {
            let response = if is_xhr(&headers) {
                err.into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Html(login_page(
                        &session.csrf_token,
                        Some("Invalid username or password."),
                    )),
                )
                    .into_response()
            };
            with_cookie(response, set_cookie)
        }
        Err(err) => err.into_response(),
    }
}

/// XHR detection for content negotiation.
fn is_xhr(headers: &HeaderMap) -> bool {
    let requested_with = headers
        .get("X-Requested-With")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    requested_with || accepts_json
}

/// Minimal login page. The embedding web runtime is expected to replace
/// this with its own rendering.
fn login_page(csrf_token: &str, error: Option<&str>) -> String {
    let notice = error.map_or(String::new(), |e| format!("<p>{e}</p>"));
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Sign in</title></head>
<body>
  <h1>Sign in</h1>
  {notice}
  <form method="post" action="/login">
    <input type="hidden" name="csrf_token" value="{csrf_token}">
    <label>Username <input type="text" name="username" autocomplete="username"></label>
    <label>Password <input type="password" name="password" autocomplete="current-password"></label>
    <button type="submit">Sign in</button>
  </form>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_xhr_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_xhr(&headers));

        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        assert!(is_xhr(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(is_xhr(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!is_xhr(&headers));
    }

    #[test]
    fn test_login_page_embeds_csrf_and_error() {
        let page = login_page("csrf-123", Some("Invalid username or password."));
        assert!(page.contains(r#"name="csrf_token" value="csrf-123""#));
        assert!(page.contains("Invalid username or password."));
    }
}
