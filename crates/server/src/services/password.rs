//! Password hashing and verification.
//!
//! Argon2id with per-hash random salts. The iteration count is configurable;
//! memory and parallelism stay at the crate defaults. Verification reads the
//! parameters back out of the PHC hash string, so hashes created under an
//! older cost setting keep verifying after the setting changes.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Password hashing failed.
///
/// Deliberately carries no detail; nothing about the input may leak.
#[derive(Debug, Error)]
#[error("password hashing failed")]
pub struct PasswordHashError;

/// Hash a password using Argon2id with the given iteration count.
///
/// # Errors
///
/// Returns [`PasswordHashError`] if the parameters are rejected or hashing
/// fails.
pub fn hash_password(password: &str, iterations: u32) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let params = Params::new(Params::DEFAULT_M_COST, iterations, Params::DEFAULT_P_COST, None)
        .map_err(|_| PasswordHashError)?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordHashError)
}

/// Verify a password against a stored hash.
///
/// Fails closed: a malformed hash yields `false`, never an error.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
