//! Credential primitives for the gatehouse authorization server.
//!
//! This crate holds everything that touches secret material directly:
//!
//! - [`secret`] - opaque identifier and secret generation from the OS CSPRNG
//! - [`pkce`] - RFC 7636 verifier/challenge derivation and matching
//! - [`password`] - password hashing with selectable memory-hard KDFs
//! - [`basic`] - HTTP Basic client credential decoding
//!
//! All comparisons of secret material go through constant-time equality.

pub mod basic;
pub mod error;
pub mod password;
pub mod pkce;
pub mod secret;

pub use basic::parse_basic_auth;
pub use error::AuthError;
pub use password::{PasswordHasher, PasswordKdf};
pub use pkce::CodeChallengeMethod;
pub use secret::{constant_time_eq, random_id, random_secret};
