//! HTTP handlers for the OAuth endpoints.

pub mod authorize;
pub mod login;
pub mod token;
pub mod users;

pub use authorize::{approve_handler, authorize_handler, refuse_handler};
pub use login::{login_page_handler, login_submit_handler};
pub use token::token_handler;
pub use users::me_handler;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// A `302 Found` redirect. OAuth redirects are 302; axum's `Redirect`
/// helpers answer 303/307.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Attach a `Set-Cookie` header produced by session bootstrap, if any.
pub(crate) fn with_cookie(mut response: Response, cookie: Option<HeaderValue>) -> Response {
    if let Some(value) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
