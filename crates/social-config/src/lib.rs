//! # Social Config
//!
//! Configuration types for the Social API, each loaded from environment
//! variables with development defaults.
//!
//! - [`cors`]: allowed browser origins
//! - [`jwt`]: token signing secret
//! - [`server`]: listen port, request budget, database URL
//! - [`identity`]: external identity provider endpoint
//!
//! ```ignore
//! dotenvy::dotenv().ok();
//! let jwt = JwtConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod identity;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use identity::IdentityProviderConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
