//! Server configuration.
//!
//! An explicit value threaded from the entry point into every component;
//! there is no process-global configuration.

use gatehouse_auth::PasswordKdf;

/// Tunables for the authorization server core.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Access token lifetime in seconds.
    pub access_token_ttl: u64,
    /// Authorization code lifetime in seconds.
    pub auth_code_ttl: u64,
    /// KDF used when hashing new passwords. Verification follows the
    /// stored hash regardless.
    pub password_kdf: PasswordKdf,
    /// Where a plain login (no pending authorize request) lands.
    pub landing_url: String,
    /// Set the `Secure` flag on session cookies.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: 3600,
            auth_code_ttl: 600,
            password_kdf: PasswordKdf::Argon2,
            landing_url: "/".to_string(),
            secure_cookies: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.access_token_ttl, 3600);
        assert_eq!(config.auth_code_ttl, 600);
        assert_eq!(config.password_kdf, PasswordKdf::Argon2);
        assert_eq!(config.landing_url, "/");
    }
}
