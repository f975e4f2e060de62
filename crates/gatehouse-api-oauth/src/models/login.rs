//! Login endpoint models.

use serde::{Deserialize, Serialize};

/// Form body for `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// CSRF token from the login form.
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// JSON body answered to XHR logins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSuccess {
    /// Where the client should navigate next.
    #[serde(rename = "landing-url")]
    pub landing_url: String,
}
