//! Authorization endpoint models.

use serde::Deserialize;

/// Query parameters for `GET /authorize`.
///
/// Everything is optional at the wire level; the validator decides which
/// absences are fatal and how each failure is answered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizeRequest {
    /// Requested response type (`code` or `token`).
    pub response_type: Option<String>,
    /// Requesting client.
    pub client_id: Option<String>,
    /// Redirect URI; must match a registered one when present.
    pub redirect_uri: Option<String>,
    /// Requested scopes (space-separated).
    pub scope: Option<String>,
    /// Opaque client state, echoed on every redirect.
    pub state: Option<String>,
    /// PKCE code challenge.
    pub code_challenge: Option<String>,
    /// PKCE code challenge method (`plain` or `S256`).
    pub code_challenge_method: Option<String>,
}

/// Form body for `POST /approve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveRequest {
    /// CSRF token from the consent form.
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Parsed `response_type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Authorization code grant.
    Code,
    /// Implicit grant.
    Token,
}

impl ResponseType {
    /// Parse the wire value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "code" => Some(Self::Code),
            "token" => Some(Self::Token),
            _ => None,
        }
    }

    /// The wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
        }
    }

    /// The grant type a client must be registered for to use this
    /// response type.
    #[must_use]
    pub fn required_grant(self) -> &'static str {
        match self {
            Self::Code => "authorization_code",
            Self::Token => "implicit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_type_parse() {
        assert_eq!(ResponseType::parse("code"), Some(ResponseType::Code));
        assert_eq!(ResponseType::parse("token"), Some(ResponseType::Token));
        assert_eq!(ResponseType::parse("id_token"), None);
    }

    #[test]
    fn test_required_grant() {
        assert_eq!(ResponseType::Code.required_grant(), "authorization_code");
        assert_eq!(ResponseType::Token.required_grant(), "implicit");
    }
}
