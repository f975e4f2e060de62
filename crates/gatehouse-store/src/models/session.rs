//! Browser sessions for the interactive authorize flow.

use chrono::{DateTime, Utc};
use gatehouse_auth::CodeChallengeMethod;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A validated authorize request parked in the session while the user
/// logs in and approves. Re-validated before any artifact is minted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAuthorize {
    /// Requested response type (`code` or `token`).
    pub response_type: String,
    /// Requesting client.
    pub client_id: String,
    /// Resolved redirect URI.
    pub redirect_uri: String,
    /// Requested scope (space-separated, possibly empty).
    pub scope: String,
    /// Opaque client state, echoed on every redirect.
    pub state: Option<String>,
    /// PKCE challenge.
    pub code_challenge: Option<String>,
    /// PKCE challenge method.
    pub code_challenge_method: Option<CodeChallengeMethod>,
}

/// A web session. The core touches `user_id` (login) and
/// `pending_authorize` (parked authorize request); everything else about
/// session handling belongs to the web runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session id, carried in the session cookie.
    pub id: String,
    /// Logged-in user, if any.
    pub user_id: Option<Uuid>,
    /// CSRF token bound to this session, embedded in login/consent forms.
    pub csrf_token: String,
    /// Parked authorize request.
    pub pending_authorize: Option<PendingAuthorize>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
