//! Session-bound CSRF tokens for the login and consent forms.
//!
//! Each session carries a random 256-bit token minted at session creation.
//! Forms embed it in a hidden field; submissions must echo it, and the
//! comparison is constant-time.

use gatehouse_auth::secret;

/// Mint a fresh CSRF token for a new session.
#[must_use]
pub fn new_token() -> String {
    secret::random_secret()
}

/// Check a submitted token against the session's. Absent or empty
/// submissions fail.
#[must_use]
pub fn verify(session_token: &str, presented: Option<&str>) -> bool {
    match presented {
        Some(token) if !token.is_empty() => secret::constant_time_eq(session_token, token),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_token_passes() {
        let token = new_token();
        assert!(verify(&token, Some(&token)));
    }

    #[test]
    fn test_wrong_token_fails() {
        assert!(!verify(&new_token(), Some(&new_token())));
    }

    #[test]
    fn test_absent_or_empty_token_fails() {
        let token = new_token();
        assert!(!verify(&token, None));
        assert!(!verify(&token, Some("")));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(new_token(), new_token());
    }
}
