//! PKCE verifier and challenge handling (RFC 7636).
//!
//! Binds an authorization request to its later token exchange: the client
//! sends a derived `code_challenge` up front and must present the original
//! `code_verifier` when redeeming the authorization code.

use crate::error::AuthError;
use crate::secret;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// PKCE code challenge transformation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeChallengeMethod {
    /// The challenge is the verifier itself.
    #[serde(rename = "plain")]
    Plain,
    /// The challenge is the URL-safe base64 (unpadded) SHA-256 of the
    /// US-ASCII verifier.
    #[serde(rename = "S256")]
    S256,
}

impl std::fmt::Display for CodeChallengeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::S256 => write!(f, "S256"),
        }
    }
}

impl std::str::FromStr for CodeChallengeMethod {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "S256" => Ok(Self::S256),
            other => Err(AuthError::UnsupportedChallengeMethod(other.to_string())),
        }
    }
}

/// Generate a code verifier: URL-safe base64 (unpadded) of `len` random
/// bytes from the OS CSPRNG.
#[must_use]
pub fn generate_verifier(len: usize) -> String {
    secret::random_urlsafe(len)
}

/// Derive the code challenge for `verifier` under `method`.
#[must_use]
pub fn challenge(method: CodeChallengeMethod, verifier: &str) -> String {
    match method {
        CodeChallengeMethod::Plain => verifier.to_string(),
        CodeChallengeMethod::S256 => {
            let mut hasher = Sha256::new();
            hasher.update(verifier.as_bytes());
            URL_SAFE_NO_PAD.encode(hasher.finalize())
        }
    }
}

/// Recompute the challenge from `verifier` under `method` and compare it to
/// the stored `code_challenge` in constant time.
#[must_use]
pub fn verify(code_challenge: &str, method: CodeChallengeMethod, verifier: &str) -> bool {
    secret::constant_time_eq(&challenge(method, verifier), code_challenge)
}

/// Whether `s` is non-empty URL-safe base64 without padding or whitespace.
#[must_use]
pub fn is_well_formed(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_s256_challenge_rfc7636_vector() {
        // Test vector from RFC 7636 Appendix B
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        let expected = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";
        assert_eq!(challenge(CodeChallengeMethod::S256, verifier), expected);
    }

    #[test]
    fn test_plain_challenge_is_identity() {
        let verifier = generate_verifier(32);
        assert_eq!(challenge(CodeChallengeMethod::Plain, &verifier), verifier);
    }

    #[test]
    fn test_round_trip_both_methods() {
        for method in [CodeChallengeMethod::Plain, CodeChallengeMethod::S256] {
            let verifier = generate_verifier(32);
            let c = challenge(method, &verifier);
            assert!(verify(&c, method, &verifier));
        }
    }

    #[test]
    fn test_wrong_verifier_rejected() {
        for method in [CodeChallengeMethod::Plain, CodeChallengeMethod::S256] {
            let c = challenge(method, &generate_verifier(32));
            assert!(!verify(&c, method, &generate_verifier(32)));
        }
    }

    #[test]
    fn test_verifier_is_url_safe() {
        let verifier = generate_verifier(64);
        assert!(is_well_formed(&verifier));
        // 64 bytes base64url encoded without padding
        assert_eq!(verifier.len(), 86);
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(
            CodeChallengeMethod::from_str("plain").unwrap(),
            CodeChallengeMethod::Plain
        );
        assert_eq!(
            CodeChallengeMethod::from_str("S256").unwrap(),
            CodeChallengeMethod::S256
        );
        // Case-sensitive per RFC 7636
        assert!(CodeChallengeMethod::from_str("s256").is_err());

        let err = CodeChallengeMethod::from_str("unknown").unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_well_formed() {
        assert!(is_well_formed("abc-DEF_123"));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("has space"));
        assert!(!is_well_formed("padded=="));
        assert!(!is_well_formed("plus+slash/"));
    }
}
