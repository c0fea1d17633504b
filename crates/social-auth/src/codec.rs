//! Issuing and verifying identity tokens.
//!
//! Tokens are HS256 JWTs signed with the secret from [`JwtConfig`]. The codec
//! is built once at startup and shared; it holds no mutable state.
//!
//! # Errors
//!
//! [`TokenCodec::verify`] distinguishes three failures:
//!
//! - [`TokenError::Expired`]: `exp` is in the past (no leeway)
//! - [`TokenError::InvalidClaim`]: `id`/`role`/`exp`/`iss` missing, ill-typed
//!   or out of range
//! - [`TokenError::InvalidToken`]: anything else, including a bad signature

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use social_config::JwtConfig;
use social_models::Role;

use crate::claims::{Claims, ISSUER};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid claim")]
    InvalidClaim,
    #[error("token is expired")]
    Expired,
    #[error("could not sign token")]
    Signing,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `subject` valid for one hour from now.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(subject, role, Utc::now().timestamp())
    }

    /// Issues a token as if it were created at `issued_at` (unix seconds).
    pub fn issue_at(&self, subject: &str, role: Role, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims::new(subject, role.into(), issued_at);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            TokenError::Signing
        })
    }

    /// Verifies signature and expiry, returning `(subject, role)`.
    pub fn verify(&self, token: &str) -> Result<(String, Role), TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) | ErrorKind::InvalidIssuer => {
                    TokenError::InvalidClaim
                }
                _ => TokenError::InvalidToken,
            }
        })?;

        let role = Role::try_from(data.claims.role).map_err(|_| TokenError::InvalidClaim)?;
        if data.claims.id.is_empty() {
            return Err(TokenError::InvalidClaim);
        }

        Ok((data.claims.id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn get_test_codec() -> TokenCodec {
        TokenCodec::new(&JwtConfig::new("test_secret_key_for_testing_purposes"))
    }

    fn sign_raw(payload: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(b"test_secret_key_for_testing_purposes"),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_all_roles() {
        let codec = get_test_codec();
        for role in Role::ALL {
            let token = codec.issue("5f1d7c2e-aaaa-bbbb-cccc-0123456789ab", *role).unwrap();
            let (subject, decoded) = codec.verify(&token).unwrap();
            assert_eq!(subject, "5f1d7c2e-aaaa-bbbb-cccc-0123456789ab");
            assert_eq!(decoded, *role);
        }
    }

    #[test]
    fn test_expired_after_one_hour() {
        let codec = get_test_codec();
        let issued = Utc::now().timestamp() - crate::TOKEN_TTL_SECS - 1;
        let token = codec.issue_at("user", Role::Client, issued).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_still_valid_just_before_expiry() {
        let codec = get_test_codec();
        let issued = Utc::now().timestamp() - crate::TOKEN_TTL_SECS + 60;
        let token = codec.issue_at("user", Role::Admin, issued).unwrap();
        assert!(codec.verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid_token() {
        let token = get_test_codec().issue("user", Role::Client).unwrap();
        let other = TokenCodec::new(&JwtConfig::new("another_secret"));
        assert_eq!(other.verify(&token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_garbage_is_invalid_token() {
        assert_eq!(
            get_test_codec().verify("invalid.token.here"),
            Err(TokenError::InvalidToken)
        );
    }

    #[test]
    fn test_role_with_wrong_type_is_invalid_claim() {
        let exp = Utc::now().timestamp() + 600;
        let token = sign_raw(json!({"id": "user", "role": "admin", "exp": exp, "iss": ISSUER}));
        assert_eq!(get_test_codec().verify(&token), Err(TokenError::InvalidClaim));
    }

    #[test]
    fn test_missing_subject_is_invalid_claim() {
        let exp = Utc::now().timestamp() + 600;
        let token = sign_raw(json!({"role": 0, "exp": exp, "iss": ISSUER}));
        assert_eq!(get_test_codec().verify(&token), Err(TokenError::InvalidClaim));
    }

    #[test]
    fn test_unknown_role_is_invalid_claim() {
        let exp = Utc::now().timestamp() + 600;
        let token = sign_raw(json!({"id": "user", "role": 9, "exp": exp, "iss": ISSUER}));
        assert_eq!(get_test_codec().verify(&token), Err(TokenError::InvalidClaim));
    }

    #[test]
    fn test_foreign_issuer_is_invalid_claim() {
        let exp = Utc::now().timestamp() + 600;
        let token = sign_raw(json!({"id": "user", "role": 0, "exp": exp, "iss": "someone else"}));
        assert_eq!(get_test_codec().verify(&token), Err(TokenError::InvalidClaim));
    }
}
