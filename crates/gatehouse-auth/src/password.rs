//! Password hashing with selectable memory-hard KDFs.
//!
//! Hashing uses the configured KDF; verification dispatches on the PHC
//! prefix of the stored hash, so a deployment can switch KDFs without
//! invalidating existing credentials.

use crate::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use scrypt::Scrypt;

/// Password KDF selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordKdf {
    /// Argon2id (default).
    #[default]
    Argon2,
    /// bcrypt.
    Bcrypt,
    /// scrypt.
    Scrypt,
}

impl std::fmt::Display for PasswordKdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Argon2 => write!(f, "argon2"),
            Self::Bcrypt => write!(f, "bcrypt"),
            Self::Scrypt => write!(f, "scrypt"),
        }
    }
}

impl std::str::FromStr for PasswordKdf {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(Self::Argon2),
            "bcrypt" => Ok(Self::Bcrypt),
            "scrypt" => Ok(Self::Scrypt),
            other => Err(AuthError::UnknownKdf(other.to_string())),
        }
    }
}

/// Password hasher with a configured KDF.
///
/// Argon2id uses OWASP-recommended parameters (m=19456 KiB, t=2, p=1)
/// unless overridden with [`PasswordHasher::with_argon2_params`].
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    kdf: PasswordKdf,
    argon2_params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(PasswordKdf::Argon2)
    }
}

impl PasswordHasher {
    /// Create a hasher for the given KDF.
    #[must_use]
    pub fn new(kdf: PasswordKdf) -> Self {
        // These are hardcoded constants that are always valid - the expect()
        // is acceptable since failure indicates a bug in the Argon2 library.
        let argon2_params = Params::new(19456, 2, 1, None)
            .expect("OWASP-recommended Argon2 parameters are valid constants");
        Self { kdf, argon2_params }
    }

    /// Create an Argon2id hasher with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid.
    pub fn with_argon2_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthError> {
        let argon2_params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashingFailed(format!("invalid parameters: {e}")))?;
        Ok(Self {
            kdf: PasswordKdf::Argon2,
            argon2_params,
        })
    }

    /// The configured KDF.
    #[must_use]
    pub fn kdf(&self) -> PasswordKdf {
        self.kdf
    }

    /// Hash a password with the configured KDF.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HashingFailed`] if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        match self.kdf {
            PasswordKdf::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let argon2 = self.argon2();
                let hash = argon2
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| AuthError::HashingFailed(e.to_string()))?;
                Ok(hash.to_string())
            }
            PasswordKdf::Bcrypt => bcrypt::hash(password, bcrypt::DEFAULT_COST)
                .map_err(|e| AuthError::HashingFailed(e.to_string())),
            PasswordKdf::Scrypt => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Scrypt
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| AuthError::HashingFailed(e.to_string()))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Verify a password against a stored hash.
    ///
    /// The hash self-describes its KDF; verification works regardless of
    /// the configured one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidHashFormat`] if the stored hash cannot
    /// be parsed.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        // bcrypt hashes ($2a$/$2b$/$2y$) are not PHC strings
        if hash.starts_with("$2") {
            return bcrypt::verify(password, hash).map_err(|_| AuthError::InvalidHashFormat);
        }

        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidHashFormat)?;
        let argon2 = self.argon2();
        let verifiers: [&dyn PasswordVerifier; 2] = [&argon2, &Scrypt];
        match parsed.verify_password(&verifiers, password) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Ok(false),
        }
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.argon2_params.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fast_hasher() -> PasswordHasher {
        // Smaller Argon2 parameters for faster testing
        PasswordHasher::with_argon2_params(4096, 1, 1).unwrap()
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct-password").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct-password", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let hasher = PasswordHasher::new(PasswordKdf::Bcrypt);
        let hash = hasher.hash("correct-password").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("correct-password", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_scrypt_hash_and_verify() {
        let hasher = PasswordHasher::new(PasswordKdf::Scrypt);
        let hash = hasher.hash("correct-password").unwrap();
        assert!(hash.starts_with("$scrypt$"));
        assert!(hasher.verify("correct-password", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_verify_dispatches_on_stored_hash() {
        // A hasher configured for Argon2 still verifies bcrypt hashes.
        let bcrypt_hash = PasswordHasher::new(PasswordKdf::Bcrypt)
            .hash("portable")
            .unwrap();
        assert!(fast_hasher().verify("portable", &bcrypt_hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = fast_hasher().verify("password", "not-a-valid-hash");
        assert!(matches!(result.unwrap_err(), AuthError::InvalidHashFormat));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = fast_hasher();
        let h1 = hasher.hash("same-password").unwrap();
        let h2 = hasher.hash("same-password").unwrap();
        assert_ne!(h1, h2);
        assert!(hasher.verify("same-password", &h1).unwrap());
        assert!(hasher.verify("same-password", &h2).unwrap());
    }

    #[test]
    fn test_empty_and_unicode_passwords() {
        let hasher = fast_hasher();
        let empty = hasher.hash("").unwrap();
        assert!(hasher.verify("", &empty).unwrap());
        assert!(!hasher.verify("non-empty", &empty).unwrap());

        let unicode = hasher.hash("пароль日本語").unwrap();
        assert!(hasher.verify("пароль日本語", &unicode).unwrap());
    }

    #[test]
    fn test_kdf_parse() {
        assert_eq!(PasswordKdf::from_str("argon2").unwrap(), PasswordKdf::Argon2);
        assert_eq!(PasswordKdf::from_str("BCRYPT").unwrap(), PasswordKdf::Bcrypt);
        assert_eq!(PasswordKdf::from_str("scrypt").unwrap(), PasswordKdf::Scrypt);
        assert!(PasswordKdf::from_str("md5").is_err());
    }
}
