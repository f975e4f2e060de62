//! Opaque identifier and secret generation.
//!
//! Every credential the server mints (client secrets, authorization codes,
//! access and refresh tokens, session ids) is the URL-safe base64 encoding
//! of bytes drawn from the operating system CSPRNG.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;

/// Identifier length in bytes (128 bits).
const ID_LENGTH: usize = 16;

/// Secret length in bytes (256 bits).
const SECRET_LENGTH: usize = 32;

/// Generate an opaque identifier with 128 bits of entropy.
#[must_use]
pub fn random_id() -> String {
    random_urlsafe(ID_LENGTH)
}

/// Generate an opaque secret with 256 bits of entropy.
///
/// Callers that treat the output as a credential must compare it with
/// [`constant_time_eq`].
#[must_use]
pub fn random_secret() -> String {
    random_urlsafe(SECRET_LENGTH)
}

/// URL-safe base64 (unpadded) encoding of `len` random bytes.
#[must_use]
pub fn random_urlsafe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Constant-time equality for secret material.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_length() {
        // 16 bytes base64url encoded = 22 characters
        assert_eq!(random_id().len(), 22);
    }

    #[test]
    fn test_secret_length() {
        // 32 bytes base64url encoded = 43 characters
        assert_eq!(random_secret().len(), 43);
    }

    #[test]
    fn test_output_is_url_safe() {
        let secret = random_secret();
        assert!(secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generation_is_unique() {
        assert_ne!(random_secret(), random_secret());
        assert_ne!(random_id(), random_id());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("same-secret", "same-secret"));
        assert!(!constant_time_eq("same-secret", "other-secret"));
        assert!(!constant_time_eq("same-secret", "same-secret-longer"));
        assert!(constant_time_eq("", ""));
    }
}
