//! HTTP Basic client credential decoding (RFC 6749 §2.3.1).

use crate::error::AuthError;
use base64::{engine::general_purpose::STANDARD, Engine};

/// Decode an `Authorization: Basic <base64(client_id:client_secret)>`
/// header value into its parts.
///
/// # Errors
///
/// Returns [`AuthError::MalformedBasicAuth`] when the scheme, base64, or
/// `id:secret` structure is invalid.
pub fn parse_basic_auth(header: &str) -> Result<(String, String), AuthError> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(|| AuthError::MalformedBasicAuth("missing Basic scheme".to_string()))?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedBasicAuth("invalid base64".to_string()))?;

    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::MalformedBasicAuth("credentials are not UTF-8".to_string()))?;

    let (client_id, client_secret) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::MalformedBasicAuth("missing ':' separator".to_string()))?;

    Ok((client_id.to_string(), client_secret.to_string()))
}
