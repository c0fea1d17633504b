use serde::{Deserialize, Serialize};

/// Issuer label stamped into every token.
pub const ISSUER: &str = "User auth";

/// Token lifetime: one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Signed token payload.
///
/// `id` is the subject (a user id as string) and `role` its integer role.
/// Tokens missing either, or carrying them with another JSON type, are
/// rejected as an invalid claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub role: u8,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(subject: &str, role: u8, issued_at: i64) -> Self {
        Self {
            id: subject.to_string(),
            role,
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
            iss: ISSUER.to_string(),
        }
    }
}
