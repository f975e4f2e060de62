//! Authorize-request validation and authorization code lifecycle.

use crate::config::ServerConfig;
use crate::error::{AuthorizeReject, OAuthError, OAuthErrorCode};
use crate::models::{AuthorizeRequest, ResponseType};
use crate::services::ClientService;
use chrono::Duration;
use gatehouse_auth::{pkce, CodeChallengeMethod};
use gatehouse_store::{AuthCode, AuthCodeStore, Client, Clock, PendingAuthorize};
use std::str::FromStr;
use std::sync::Arc;

/// Service validating authorize requests and minting/consuming
/// authorization codes.
#[derive(Clone)]
pub struct AuthorizationService {
    clients: ClientService,
    codes: Arc<dyn AuthCodeStore>,
    clock: Clock,
    config: ServerConfig,
}

impl AuthorizationService {
    /// Create a new authorization service.
    #[must_use]
    pub fn new(
        clients: ClientService,
        codes: Arc<dyn AuthCodeStore>,
        clock: Clock,
        config: ServerConfig,
    ) -> Self {
        Self {
            clients,
            codes,
            clock,
            config,
        }
    }

    /// Validate an authorize request (RFC 6749 §4.1.1 / §4.2.1 plus PKCE).
    ///
    /// Check order matters: failures before the redirect target is trusted
    /// answer directly with JSON; response-type and scope failures answer
    /// with an error redirect. The same validation runs again at issue
    /// time on the session-parked request.
    pub async fn validate_authorize_request(
        &self,
        request: &AuthorizeRequest,
    ) -> Result<(Client, PendingAuthorize), AuthorizeReject> {
        // 1. The client must resolve; without it nothing can be trusted.
        let client = self.clients.resolve(request.client_id.as_deref()).await?;

        // 2. The redirect target must be registered before anything is
        // sent to it.
        let redirect_uri = self
            .clients
            .resolve_redirect_uri(&client, request.redirect_uri.as_deref())?;

        // 3. Response type: unknown or not allowed for this client is
        // reported to the (now trusted) redirect target.
        let raw_response_type = request.response_type.as_deref().unwrap_or_default();
        let response_type = match ResponseType::parse(raw_response_type) {
            Some(rt) if client.allows_grant(rt.required_grant()) => rt,
            Some(_) => {
                return Err(self.redirect_error(
                    &redirect_uri,
                    OAuthErrorCode::UnsupportedResponseType,
                    format!("client is not authorized for response_type '{raw_response_type}'"),
                    request.state.clone(),
                ));
            }
            None => {
                return Err(self.redirect_error(
                    &redirect_uri,
                    OAuthErrorCode::UnsupportedResponseType,
                    format!("unsupported response_type '{raw_response_type}'"),
                    request.state.clone(),
                ));
            }
        };

        // 4. Scope must be a subset of the client's registration.
        let scope = match self.clients.validate_scope(&client, request.scope.as_deref()) {
            Ok(scope) => scope,
            Err(err @ OAuthError::InvalidScope(_)) => {
                return Err(self.redirect_error(
                    &redirect_uri,
                    OAuthErrorCode::InvalidScope,
                    err.description(),
                    request.state.clone(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        // 5-6. PKCE parameters. A challenge without a method defaults to
        // `plain` (RFC 7636 §4.3); an unknown method is a direct 400
        // naming the offender.
        let code_challenge_method = match request.code_challenge_method.as_deref() {
            Some(raw) => Some(CodeChallengeMethod::from_str(raw).map_err(OAuthError::from)?),
            None => request.code_challenge.as_ref().map(|_| CodeChallengeMethod::Plain),
        };
        let code_challenge = match (&code_challenge_method, &request.code_challenge) {
            (Some(_), Some(challenge)) if pkce::is_well_formed(challenge) => {
                Some(challenge.clone())
            }
            (Some(_), Some(_)) => {
                return Err(OAuthError::InvalidRequest(
                    "code_challenge must be unpadded URL-safe base64".to_string(),
                )
                .into());
            }
            (Some(_), None) => {
                return Err(OAuthError::InvalidRequest(
                    "code_challenge is required when code_challenge_method is present".to_string(),
                )
                .into());
            }
            (None, _) => None,
        };

        let pending = PendingAuthorize {
            response_type: response_type.as_str().to_string(),
            client_id: client.id.clone(),
            redirect_uri,
            scope,
            state: request.state.clone(),
            code_challenge,
            code_challenge_method,
        };
        Ok((client, pending))
    }

    /// Mint an authorization code for an approved request.
    pub async fn mint_code(
        &self,
        pending: &PendingAuthorize,
        user_id: uuid::Uuid,
    ) -> Result<AuthCode, OAuthError> {
        let now = self.clock.now();
        let code = AuthCode {
            code: gatehouse_auth::random_secret(),
            client_id: pending.client_id.clone(),
            user_id,
            scope: pending.scope.clone(),
            redirect_uri: pending.redirect_uri.clone(),
            expires_at: now + Duration::seconds(self.config.auth_code_ttl as i64),
            code_challenge: pending.code_challenge.clone(),
            code_challenge_method: pending.code_challenge_method,
        };
        Ok(self.codes.put(code).await?)
    }

    /// Redeem an authorization code.
    ///
    /// The code is removed atomically first, so of two concurrent
    /// exchanges at most one can succeed; validation failures burn the
    /// code rather than leave it redeemable.
    pub async fn consume_code(
        &self,
        code: &str,
        client: &Client,
        redirect_uri: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthCode, OAuthError> {
        let record = self.codes.take(code).await?.ok_or_else(|| {
            OAuthError::InvalidGrant(
                "authorization code is invalid, expired, or already used".to_string(),
            )
        })?;

        if record.client_id != client.id {
            tracing::warn!(
                client_id = %client.id,
                "authorization code presented by a different client"
            );
            return Err(OAuthError::InvalidGrant(
                "authorization code was issued to another client".to_string(),
            ));
        }

        if record.redirect_uri != redirect_uri {
            return Err(OAuthError::InvalidGrant(
                "redirect_uri does not match the authorization request".to_string(),
            ));
        }

        if let Some(ref challenge) = record.code_challenge {
            let method = record
                .code_challenge_method
                .unwrap_or(CodeChallengeMethod::Plain);
            let verifier = code_verifier.ok_or_else(|| {
                OAuthError::InvalidGrant(
                    "PKCE code verifier is required but not provided".to_string(),
                )
            })?;
            if !pkce::verify(challenge, method, verifier) {
                return Err(OAuthError::InvalidGrant(
                    "PKCE code verifier does not match the challenge".to_string(),
                ));
            }
        }

        Ok(record)
    }

    fn redirect_error(
        &self,
        redirect_uri: &str,
        error: OAuthErrorCode,
        description: String,
        state: Option<String>,
    ) -> AuthorizeReject {
        AuthorizeReject::Redirect {
            redirect_uri: redirect_uri.to_string(),
            error,
            description,
            state,
        }
    }
}
