//! Salted password hashing.
//!
//! Passwords are salted before bcrypt: the characters at even byte offsets
//! form a prefix and the ones at odd offsets a suffix around the original
//! password. Stored hashes depend on this exact layout.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Wraps `password` in its own even/odd character split.
pub fn salt_password(password: &str) -> String {
    let mut left = String::with_capacity(password.len());
    let mut right = String::with_capacity(password.len());

    for (offset, ch) in password.char_indices() {
        if offset % 2 == 0 {
            left.push(ch);
        } else {
            right.push(ch);
        }
    }

    format!("{left}{password}{right}")
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(salt_password(password), DEFAULT_COST).map_err(|e| {
        tracing::error!(error = %e, "failed to hash password");
        AppError::internal()
    })
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(salt_password(password), hash).map_err(|e| {
        tracing::error!(error = %e, "failed to verify password");
        AppError::internal()
    })
}
