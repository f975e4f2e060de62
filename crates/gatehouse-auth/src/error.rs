//! Error types for credential primitives.

use thiserror::Error;

/// Errors from password hashing, PKCE handling, and credential decoding.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash is not in a recognized format.
    #[error("unrecognized password hash format")]
    InvalidHashFormat,

    /// The PKCE code challenge method is not supported.
    #[error("unsupported code_challenge_method: {0}")]
    UnsupportedChallengeMethod(String),

    /// The password KDF name is not recognized.
    #[error("unknown password KDF: {0}")]
    UnknownKdf(String),

    /// The Authorization header does not carry valid HTTP Basic credentials.
    #[error("malformed basic authorization: {0}")]
    MalformedBasicAuth(String),
}
