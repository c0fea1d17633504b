//! # Social Core
//!
//! Core types, errors, and utilities for the Social API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: In-memory page windows for list endpoints
//! - [`password`]: Salted password hashing and verification
//! - [`validation`]: Input format checks (email)
//! - [`deadline`]: Per-call time budget for service operations
//!
//! # Example
//!
//! ```ignore
//! use social_core::errors::AppError;
//! use social_core::pagination::paginate;
//! use social_core::password::{hash_password, verify_password};
//!
//! let hash = hash_password("123456")?;
//! assert!(verify_password("123456", &hash)?);
//!
//! let page = paginate(vec![1, 2, 3], 1, 2)?;
//! assert_eq!(page.items, vec![1, 2]);
//! ```

pub mod deadline;
pub mod errors;
pub mod pagination;
pub mod password;
pub mod validation;

// Re-export commonly used types at crate root
pub use deadline::with_deadline;
pub use errors::AppError;
pub use pagination::{Page, PaginationParams, paginate};
pub use password::{hash_password, verify_password};
pub use validation::is_valid_email;
