//! Password hashing and access-token digests.
//!
//! Passwords are hashed with Argon2 using per-password random salts; tokens
//! are random values returned to the client once and stored only as SHA-256
//! digests.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::error::Error;
use super::user::{UserValidationError, PASSWORD_MIN};

/// Hash a plaintext password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(Error::invalid_request(
            UserValidationError::PasswordTooShort { min: PASSWORD_MIN }.to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

/// Verify a plaintext password against a stored Argon2 PHC string.
///
/// A malformed stored hash is an internal error; a mismatch is `Ok(false)`.
pub fn verify_password(stored: &str, provided: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(stored)
        .map_err(|err| Error::internal(format!("invalid stored password hash: {err}")))?;

    match Argon2::default().verify_password(provided.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(Error::internal(format!(
            "password verification failed: {err}"
        ))),
    }
}

/// Generate a fresh access token as 32 random bytes, hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest a presented token for storage or lookup.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
