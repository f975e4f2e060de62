//! Resource-owner credential verification.
//!
//! Shared by the login endpoint and the password grant. All failure modes
//! collapse into the same `invalid_grant` answer so responses do not leak
//! which part of the credential was wrong.

use crate::error::OAuthError;
use gatehouse_auth::PasswordHasher;
use gatehouse_store::{User, UserStore};
use std::sync::Arc;

/// Service verifying username/password credentials.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl CredentialService {
    /// Create a new credential service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Authenticate a resource owner.
    ///
    /// # Errors
    ///
    /// [`OAuthError::InvalidCredentials`] (401 `invalid_grant`) for an
    /// unknown user, a wrong password, or a disabled account.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, OAuthError> {
        let user = self
            .users
            .find_by_login(username)
            .await?
            .ok_or_else(Self::bad_credentials)?;

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .map_err(|err| {
                tracing::error!(login = %username, error = %err, "stored password hash is unreadable");
                OAuthError::Internal("password verification failed".to_string())
            })?;
        if !matches {
            return Err(Self::bad_credentials());
        }

        if !user.enabled {
            tracing::warn!(login = %username, "login attempt for disabled user");
            return Err(OAuthError::InvalidCredentials(
                "user account is disabled".to_string(),
            ));
        }
        Ok(user)
    }

    fn bad_credentials() -> OAuthError {
        OAuthError::InvalidCredentials("invalid username or password".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gatehouse_store::InMemoryUserStore;
    use uuid::Uuid;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_argon2_params(4096, 1, 1).unwrap()
    }

    async fn service_with_user(password: &str, enabled: bool) -> CredentialService {
        let hasher = fast_hasher();
        let users = Arc::new(InMemoryUserStore::new());
        gatehouse_store::UserStore::put(
            users.as_ref(),
            User {
                id: Uuid::new_v4(),
                login: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: hasher.hash(password).unwrap(),
                enabled,
                roles: vec![],
                permissions: vec![],
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        CredentialService::new(users, hasher)
    }

    #[tokio::test]
    async fn test_valid_credentials() {
        let service = service_with_user("pass", true).await;
        let user = service.authenticate("alice", "pass").await.unwrap();
        assert_eq!(user.login, "alice");
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let service = service_with_user("pass", true).await;
        assert!(matches!(
            service.authenticate("alice", "wrong").await.unwrap_err(),
            OAuthError::InvalidCredentials(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let service = service_with_user("pass", true).await;
        assert!(matches!(
            service.authenticate("bob", "pass").await.unwrap_err(),
            OAuthError::InvalidCredentials(_)
        ));
    }

    #[tokio::test]
    async fn test_disabled_user() {
        let service = service_with_user("pass", false).await;
        let err = service.authenticate("alice", "pass").await.unwrap_err();
        assert!(matches!(err, OAuthError::InvalidCredentials(_)));
        assert_eq!(err.description(), "user account is disabled");
    }
}
