//! Client resolution, authentication, and registration checks.

use crate::error::OAuthError;
use gatehouse_auth::constant_time_eq;
use gatehouse_store::{Client, ClientStore};
use std::sync::Arc;

/// Service for registered client applications.
#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientStore>,
}

impl ClientService {
    /// Create a new client service.
    #[must_use]
    pub fn new(clients: Arc<dyn ClientStore>) -> Self {
        Self { clients }
    }

    /// Fetch a client without further checks.
    pub async fn find(&self, client_id: &str) -> Result<Option<Client>, OAuthError> {
        Ok(self.clients.get(client_id).await?)
    }

    /// Resolve the client named by an authorize request.
    ///
    /// Failures here answer 400 `invalid_client` directly: without a
    /// trusted client there is no trusted redirect target.
    pub async fn resolve(&self, client_id: Option<&str>) -> Result<Client, OAuthError> {
        let client_id = client_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| OAuthError::UnknownClient("client_id is required".to_string()))?;

        let client = self
            .clients
            .get(client_id)
            .await?
            .ok_or_else(|| OAuthError::UnknownClient("unknown client_id".to_string()))?;

        if !client.enabled {
            return Err(OAuthError::UnknownClient("client is disabled".to_string()));
        }
        Ok(client)
    }

    /// Authenticate a client on the token endpoint.
    ///
    /// Confidential clients must present their secret (Basic auth or
    /// body), compared in constant time. Public clients authenticate by
    /// id alone.
    pub async fn authenticate(
        &self,
        client_id: &str,
        client_secret: Option<&str>,
    ) -> Result<Client, OAuthError> {
        let client = self
            .clients
            .get(client_id)
            .await?
            .ok_or_else(|| OAuthError::InvalidClient("unknown client".to_string()))?;

        if !client.enabled {
            return Err(OAuthError::InvalidClient("client is disabled".to_string()));
        }

        if client.is_public() {
            return Ok(client);
        }

        let registered = client.secret.as_deref().unwrap_or_default();
        let presented = client_secret.ok_or_else(|| {
            OAuthError::InvalidClient("client_secret is required".to_string())
        })?;
        if !constant_time_eq(registered, presented) {
            tracing::warn!(%client_id, "client secret mismatch");
            return Err(OAuthError::InvalidClient(
                "invalid client credentials".to_string(),
            ));
        }
        Ok(client)
    }

    /// Resolve and validate the redirect URI for an authorize request.
    ///
    /// A supplied URI must exactly match a registered one. When omitted,
    /// a client with a single registered redirect falls back to it.
    pub fn resolve_redirect_uri(
        &self,
        client: &Client,
        requested: Option<&str>,
    ) -> Result<String, OAuthError> {
        match requested {
            Some(uri) if client.allows_redirect(uri) => Ok(uri.to_string()),
            Some(_) => Err(OAuthError::InvalidRequest(
                "redirect_uri is not registered for this client".to_string(),
            )),
            None => match client.redirects.as_slice() {
                [only] => Ok(only.clone()),
                _ => Err(OAuthError::InvalidRequest(
                    "redirect_uri is required".to_string(),
                )),
            },
        }
    }

    /// Validate that every requested scope is declared on the client.
    ///
    /// An absent or empty scope is permitted and grants no scope. Returns
    /// the normalized (whitespace-collapsed) scope string.
    pub fn validate_scope(
        &self,
        client: &Client,
        requested: Option<&str>,
    ) -> Result<String, OAuthError> {
        let requested = requested.unwrap_or_default();
        let mut granted = Vec::new();
        for scope in requested.split_whitespace() {
            if !client.scopes.iter().any(|s| s == scope) {
                return Err(OAuthError::InvalidScope(format!(
                    "scope '{scope}' is not allowed for this client"
                )));
            }
            granted.push(scope);
        }
        Ok(granted.join(" "))
    }

    /// Require the client to be registered for `grant`.
    pub fn require_grant(&self, client: &Client, grant: &str) -> Result<(), OAuthError> {
        if client.allows_grant(grant) {
            Ok(())
        } else {
            Err(OAuthError::UnauthorizedClient(format!(
                "client is not authorized for the {grant} grant"
            )))
        }
    }
}
