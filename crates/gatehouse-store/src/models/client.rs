//! Registered client applications.

use serde::{Deserialize, Serialize};

/// A registered OAuth 2.0 client application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Opaque client identifier.
    pub id: String,
    /// Client secret. `None` or empty marks a public client that
    /// authenticates by id alone.
    pub secret: Option<String>,
    /// Human-readable description.
    pub info: String,
    /// Client homepage URL.
    pub homepage: String,
    /// Pre-approved clients skip the per-user consent step.
    pub approved: bool,
    /// Scopes the client may request.
    pub scopes: Vec<String>,
    /// Grant types the client may use (`authorization_code`, `implicit`,
    /// `password`, `client_credentials`, `refresh_token`).
    pub grants: Vec<String>,
    /// Registered redirect URIs.
    pub redirects: Vec<String>,
    /// Disabled clients cannot authenticate, and tokens minted for them
    /// stop validating.
    pub enabled: bool,
}

impl Client {
    /// Whether this client authenticates by id alone.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.secret.as_deref().map_or(true, str::is_empty)
    }

    /// Whether the client is registered for `grant`.
    #[must_use]
    pub fn allows_grant(&self, grant: &str) -> bool {
        self.grants.iter().any(|g| g == grant)
    }

    /// Whether `uri` is one of the registered redirect URIs (exact match).
    #[must_use]
    pub fn allows_redirect(&self, uri: &str) -> bool {
        self.redirects.iter().any(|r| r == uri)
    }
}
