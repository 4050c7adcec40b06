//! Argon2id password digests stored as PHC strings.

use std::fmt;
use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Error raised when a digest cannot be produced or read back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password digest error: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl From<password_hash::Error> for PasswordHashError {
    fn from(err: password_hash::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Digest verified when a login names no known account, so a miss costs the
/// same as a wrong password.
static DECOY: LazyLock<Option<PasswordHash>> =
    LazyLock::new(|| PasswordHash::derive("decoy password for unknown accounts").ok());

/// Encoded Argon2id digest safe to persist.
///
/// # Examples
/// ```
/// use flashcards::domain::PasswordHash;
///
/// let hash = PasswordHash::derive("correct horse battery").expect("hash");
/// assert!(hash.as_str().starts_with("$argon2id$"));
/// assert!(hash.verify("correct horse battery"));
/// assert!(!hash.verify("wrong"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt and the default Argon2id
    /// parameters.
    pub fn derive(password: &str) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(Self(phc.to_string()))
    }

    /// Accept a stored PHC string after checking it is well formed.
    pub fn parse(encoded: &str) -> Result<Self, PasswordHashError> {
        password_hash::PasswordHash::new(encoded)?;
        Ok(Self(encoded.to_owned()))
    }

    /// Shared digest used to burn a verification on unknown usernames.
    pub fn decoy() -> Option<Self> {
        (*DECOY).clone()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check `candidate` against the digest.
    pub fn verify(&self, candidate: &str) -> bool {
        password_hash::PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordHash").field(&"<redacted>").finish()
    }
}
