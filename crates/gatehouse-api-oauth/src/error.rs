//! OAuth 2.0 error types.
//!
//! Two response shapes exist (RFC 6749): JSON bodies for the token
//! endpoint and for authorize failures detected before a trustworthy
//! redirect target is established, and 302 redirects carrying the error in
//! query parameters once the redirect target is validated.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OAuth 2.0 error codes as defined in RFC 6749 and RFC 6750.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthErrorCode {
    /// The request is missing a required parameter or is malformed.
    InvalidRequest,
    /// Client authentication failed or the client is unknown.
    InvalidClient,
    /// The provided authorization grant or refresh token is invalid.
    InvalidGrant,
    /// The client is not authorized to use this grant type.
    UnauthorizedClient,
    /// The authorization server does not support the grant type.
    UnsupportedGrantType,
    /// The requested scope exceeds what the client may request.
    InvalidScope,
    /// The resource owner denied the request.
    AccessDenied,
    /// The authorization server does not support the response type.
    UnsupportedResponseType,
    /// The access token is invalid, expired, or revoked.
    InvalidToken,
    /// The authorization server encountered an unexpected condition.
    ServerError,
}

impl std::fmt::Display for OAuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::InvalidScope => "invalid_scope",
            Self::AccessDenied => "access_denied",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::InvalidToken => "invalid_token",
            Self::ServerError => "server_error",
        };
        write!(f, "{s}")
    }
}

/// JSON error body following RFC 6749 §5.2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthErrorResponse {
    /// Error code.
    pub error: OAuthErrorCode,
    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl OAuthErrorResponse {
    /// Create a new error response.
    pub fn new(error: OAuthErrorCode, description: impl Into<String>) -> Self {
        Self {
            error,
            error_description: Some(description.into()),
        }
    }
}

/// Errors raised by the OAuth endpoints.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Missing or malformed request parameter.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown client on the authorize endpoint (answered 400, before any
    /// redirect target exists).
    #[error("unknown client: {0}")]
    UnknownClient(String),

    /// Client authentication failed on the token endpoint.
    #[error("invalid client: {0}")]
    InvalidClient(String),

    /// Invalid authorization code or refresh token.
    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    /// Resource-owner credential failure on the password grant; carries
    /// `invalid_grant` but answers 401.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Client not registered for this grant type.
    #[error("unauthorized client: {0}")]
    UnauthorizedClient(String),

    /// Unknown grant type.
    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    /// Unknown or forbidden response type.
    #[error("unsupported response type: {0}")]
    UnsupportedResponseType(String),

    /// Requested scope exceeds the client's registration.
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// Invalid, expired, or revoked bearer token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Store backend failure.
    #[error("store failure: {0}")]
    Store(#[from] gatehouse_store::StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OAuthError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::UnknownClient(_)
            | Self::InvalidGrant(_)
            | Self::UnauthorizedClient(_)
            | Self::UnsupportedGrantType(_)
            | Self::UnsupportedResponseType(_)
            | Self::InvalidScope(_) => StatusCode::BAD_REQUEST,
            Self::InvalidClient(_) | Self::InvalidCredentials(_) | Self::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// RFC 6749 error code for this error.
    #[must_use]
    pub fn error_code(&self) -> OAuthErrorCode {
        match self {
            Self::InvalidRequest(_) => OAuthErrorCode::InvalidRequest,
            Self::UnknownClient(_) | Self::InvalidClient(_) => OAuthErrorCode::InvalidClient,
            Self::InvalidGrant(_) | Self::InvalidCredentials(_) => OAuthErrorCode::InvalidGrant,
            Self::UnauthorizedClient(_) => OAuthErrorCode::UnauthorizedClient,
            Self::UnsupportedGrantType(_) => OAuthErrorCode::UnsupportedGrantType,
            Self::UnsupportedResponseType(_) => OAuthErrorCode::UnsupportedResponseType,
            Self::InvalidScope(_) => OAuthErrorCode::InvalidScope,
            Self::InvalidToken(_) => OAuthErrorCode::InvalidToken,
            Self::Store(_) | Self::Internal(_) => OAuthErrorCode::ServerError,
        }
    }

    /// Bare description for the JSON body, without the variant prefix.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::InvalidRequest(d)
            | Self::UnknownClient(d)
            | Self::InvalidClient(d)
            | Self::InvalidGrant(d)
            | Self::InvalidCredentials(d)
            | Self::UnauthorizedClient(d)
            | Self::UnsupportedGrantType(d)
            | Self::UnsupportedResponseType(d)
            | Self::InvalidScope(d)
            | Self::InvalidToken(d) => d.clone(),
            // Internal detail stays in the logs.
            Self::Store(_) | Self::Internal(_) => "internal server error".to_string(),
        }
    }

    /// Convert to the JSON error body.
    #[must_use]
    pub fn to_response(&self) -> OAuthErrorResponse {
        OAuthErrorResponse::new(self.error_code(), self.description())
    }
}

impl From<gatehouse_auth::AuthError> for OAuthError {
    fn from(err: gatehouse_auth::AuthError) -> Self {
        use gatehouse_auth::AuthError;
        match err {
            AuthError::UnsupportedChallengeMethod(method) => Self::InvalidRequest(format!(
                "unsupported code_challenge_method: {method}"
            )),
            AuthError::MalformedBasicAuth(detail) => Self::InvalidClient(detail),
            AuthError::HashingFailed(_) | AuthError::InvalidHashFormat | AuthError::UnknownKdf(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "internal error on OAuth endpoint");
        }
        (status, Json(self.to_response())).into_response()
    }
}

/// Failure of an authorize-endpoint request.
///
/// Checks that run before the redirect target is trusted answer directly
/// with JSON; later checks answer with a 302 to the validated
/// `redirect_uri` carrying `error`, `error_description`, and the echoed
/// `state` (RFC 6749 §4.1.2.1).
#[derive(Debug)]
pub enum AuthorizeReject {
    /// Answer with a JSON error body.
    Direct(OAuthError),
    /// Answer with a 302 carrying the error in query parameters.
    Redirect {
        /// Validated redirect target.
        redirect_uri: String,
        /// Error code.
        error: OAuthErrorCode,
        /// Human-readable description.
        description: String,
        /// Client state, echoed verbatim.
        state: Option<String>,
    },
}

impl From<OAuthError> for AuthorizeReject {
    fn from(err: OAuthError) -> Self {
        Self::Direct(err)
    }
}

impl From<gatehouse_store::StoreError> for AuthorizeReject {
    fn from(err: gatehouse_store::StoreError) -> Self {
        Self::Direct(err.into())
    }
}

/// Append query parameters to a URI, respecting an existing query string.
pub(crate) fn append_query(uri: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::from(uri);
    let mut sep = if uri.contains('?') { '&' } else { '?' };
    for (key, value) in params {
        out.push(sep);
        out.push_str(key);
        out.push('=');
        out.push_str(&urlencoding::encode(value));
        sep = '&';
    }
    out
}

impl IntoResponse for AuthorizeReject {
    fn into_response(self) -> Response {
        match self {
            Self::Direct(err) => err.into_response(),
            Self::Redirect {
                redirect_uri,
                error,
                description,
                state,
            } => {
                let code = error.to_string();
                let mut params: Vec<(&str, &str)> =
                    vec![("error", &code), ("error_description", &description)];
                if let Some(ref state) = state {
                    params.push(("state", state));
                }
                let location = append_query(&redirect_uri, &params);
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(
            OAuthErrorCode::InvalidRequest.to_string(),
            "invalid_request"
        );
        assert_eq!(OAuthErrorCode::InvalidClient.to_string(), "invalid_client");
        assert_eq!(OAuthErrorCode::AccessDenied.to_string(), "access_denied");
    }

    #[test]
    fn test_error_response_serialization() {
        let response = OAuthError::InvalidGrant(
            "PKCE code verifier is required but not provided".to_string(),
        )
        .to_response();

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"error":"invalid_grant","error_description":"PKCE code verifier is required but not provided"}"#
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            OAuthError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OAuthError::UnknownClient("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OAuthError::InvalidClient("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            OAuthError::InvalidCredentials("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            OAuthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = OAuthError::Internal("connection string postgres://secret".into());
        assert_eq!(err.description(), "internal server error");
    }

    #[test]
    fn test_append_query() {
        assert_eq!(
            append_query("http://localhost", &[("code", "abc"), ("state", "1 2")]),
            "http://localhost?code=abc&state=1%202"
        );
        assert_eq!(
            append_query("http://localhost?keep=1", &[("code", "abc")]),
            "http://localhost?keep=1&code=abc"
        );
    }

    #[test]
    fn test_unsupported_method_maps_to_invalid_request() {
        let err: OAuthError =
            gatehouse_auth::AuthError::UnsupportedChallengeMethod("unknown".into()).into();
        assert_eq!(err.error_code(), OAuthErrorCode::InvalidRequest);
        assert!(err.description().contains("unknown"));
    }
}
