//! Login accounts: password digests and the development sign-ins.
//!
//! Passwords are stored only as Argon2id PHC strings. The development
//! accounts are created by the server at start-up when it runs from memory
//! or as a debug build; release builds against PostgreSQL never seed them.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use uuid::Uuid;

use super::{Profile, Role, UserId};

/// Development admin account id.
pub const DEVELOPMENT_ADMIN_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// Development guest account id.
pub const DEVELOPMENT_GUEST_ID: &str = "6f1c2a7e-0d3b-4c55-9a8e-3b2f1d4c5e6a";
/// Password shared by the development accounts.
pub const DEVELOPMENT_PASSWORD: &str = "password";

/// A sign-in created for local development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevelopmentAccount {
    pub id: &'static str,
    pub email: &'static str,
    pub full_name: &'static str,
    pub role: Role,
}

/// `admin@example.com` and `guest@example.com`, both using
/// [`DEVELOPMENT_PASSWORD`].
pub const DEVELOPMENT_ACCOUNTS: [DevelopmentAccount; 2] = [
    DevelopmentAccount {
        id: DEVELOPMENT_ADMIN_ID,
        email: "admin@example.com",
        full_name: "Development Admin",
        role: Role::Admin,
    },
    DevelopmentAccount {
        id: DEVELOPMENT_GUEST_ID,
        email: "guest@example.com",
        full_name: "Development Guest",
        role: Role::Guest,
    },
];

/// Hashing could not produce a digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordDigestError(String);

/// Salted Argon2id digest in PHC string form.
///
/// # Examples
/// ```
/// use backend::domain::PasswordDigest;
///
/// let digest = PasswordDigest::hash("secret").expect("hashes");
/// assert!(digest.matches("secret"));
/// assert!(!digest.matches("Secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash `password` with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, PasswordDigestError> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
            .map_err(|err| PasswordDigestError(err.to_string()))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordDigestError(err.to_string()))
    }

    /// Wrap a digest read back from storage.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC string to persist.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `password` produces this digest. Unparseable digests match
    /// nothing.
    pub fn matches(&self, password: &str) -> bool {
        PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// An account ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub profile: Profile,
    /// Normalised sign-in email.
    pub email: String,
    pub password: PasswordDigest,
}

/// What sign-in needs to know about a stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password: PasswordDigest,
}
