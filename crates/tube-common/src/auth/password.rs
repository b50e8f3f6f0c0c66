//! Argon2id password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tube_core::DomainError;

use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("password hashing failed: {e}")))
}

/// Returns `Ok(false)` on mismatch and an error only for a corrupt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("invalid password hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    let rules: [(fn(&str) -> bool, &str); 4] = [
        (|p| p.chars().count() >= 8, "must be at least 8 characters long"),
        (|p| p.chars().any(char::is_uppercase), "must contain an uppercase letter"),
        (|p| p.chars().any(char::is_lowercase), "must contain a lowercase letter"),
        (|p| p.chars().any(|c| c.is_ascii_digit()), "must contain a digit"),
    ];

    match rules.iter().find(|(ok, _)| !ok(password)) {
        Some((_, reason)) => Err(DomainError::WeakPassword(format!("Password {reason}"))),
        None => Ok(()),
    }
}
