//! Credential artifacts minted by the grant flows.

use chrono::{DateTime, Utc};
use gatehouse_auth::CodeChallengeMethod;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-use authorization code bridging the authorize and token
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCode {
    /// The opaque code value.
    pub code: String,
    /// Client the code was minted for.
    pub client_id: String,
    /// User who approved the request.
    pub user_id: Uuid,
    /// Granted scope (space-separated, possibly empty).
    pub scope: String,
    /// Redirect URI the code was issued against; the token exchange must
    /// present the same value.
    pub redirect_uri: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// PKCE challenge, when the authorize request carried one.
    pub code_challenge: Option<String>,
    /// PKCE challenge method paired with `code_challenge`.
    pub code_challenge_method: Option<CodeChallengeMethod>,
}

/// An opaque bearer access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The opaque token value; stores index by it.
    pub secret: String,
    /// Client the token was minted for.
    pub client_id: String,
    /// Owning user; `None` for client-credentials tokens.
    pub user_id: Option<Uuid>,
    /// Granted scope.
    pub scope: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Mint time.
    pub created_at: DateTime<Utc>,
}

/// An opaque refresh token. Not minted for the client-credentials or
/// implicit grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    /// The opaque token value.
    pub secret: String,
    /// Client the token was minted for.
    pub client_id: String,
    /// Owning user.
    pub user_id: Uuid,
    /// Granted scope.
    pub scope: String,
    /// Mint time.
    pub created_at: DateTime<Utc>,
}
