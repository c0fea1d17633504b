//! # Social Auth
//!
//! Identity tokens and the external identity provider port.
//!
//! - [`claims`]: the signed token payload
//! - [`codec`]: [`TokenCodec`], issuing and verifying HS256 tokens
//! - [`provider`]: [`IdentityProvider`] for federated login
//!
//! ```ignore
//! use social_auth::TokenCodec;
//! use social_config::JwtConfig;
//! use social_models::Role;
//!
//! let codec = TokenCodec::new(&JwtConfig::from_env());
//! let token = codec.issue(&user.id.to_string(), Role::Client)?;
//! let (subject, role) = codec.verify(&token)?;
//! ```

pub mod claims;
pub mod codec;
pub mod provider;

pub use claims::{Claims, ISSUER, TOKEN_TTL_SECS};
pub use codec::{TokenCodec, TokenError};
pub use provider::{ExternalProfile, HttpIdentityProvider, IdentityProvider, ProviderError};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::StaticIdentityProvider;
