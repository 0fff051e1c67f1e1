//! Password Hashing and Verification
//!
//! Argon2id hashing with an optional application-wide pepper. Strength
//! rules live in the validation layer; this module only stores and checks.

use std::fmt;

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::Zeroizing;

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Hashed password in PHC string format (`$argon2id$v=19$...`)
///
/// Safe to store and to log.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wraps a PHC string read back from storage.
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self(hash))
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    pub fn into_phc_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashedPassword").field(&"[PHC]").finish()
    }
}

/// Argon2id hasher.
///
/// OWASP parameters (m=19456, t=2, p=1), the `argon2` crate defaults.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    pepper: Option<Zeroizing<Vec<u8>>>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `pepper` to every password before hashing.
    pub fn with_pepper(pepper: impl Into<Vec<u8>>) -> Self {
        Self {
            pepper: Some(Zeroizing::new(pepper.into())),
        }
    }

    fn peppered(&self, password: &str) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(password.as_bytes().to_vec());
        if let Some(pepper) = &self.pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }

    /// Hashes `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(password), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
        Ok(HashedPassword(hash.to_string()))
    }

    /// Constant-time check of `password` against `hashed`.
    pub fn verify(&self, password: &str, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed.as_phc_string()) else {
            return false;
        };
        Argon2::default()
            .verify_password(&self.peppered(password), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hashed = hasher.hash("Rahasia1!").unwrap();
        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hasher.verify("Rahasia1!", &hashed));
        assert!(!hasher.verify("rahasia1!", &hashed));
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash("Rahasia1!").unwrap();
        let b = hasher.hash("Rahasia1!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pepper_must_match() {
        let peppered = PasswordHasher::with_pepper(b"server-side".to_vec());
        let hashed = peppered.hash("Rahasia1!").unwrap();
        assert!(peppered.verify("Rahasia1!", &hashed));
        assert!(!PasswordHasher::new().verify("Rahasia1!", &hashed));
    }

    #[test]
    fn test_from_phc_string() {
        let hashed = PasswordHasher::new().hash("Rahasia1!").unwrap();
        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert_eq!(restored, hashed);
        assert!(matches!(
            HashedPassword::from_phc_string("plaintext"),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let hasher = PasswordHasher::with_pepper(b"secret".to_vec());
        assert!(!format!("{hasher:?}").contains("secret"));
    }
}
