//! Request middleware and extractors.
//!
//! Protected routes run this chain, outermost first:
//!
//! 1. [`auth::authenticate`]: parses `Authorization: Bearer <token>`, verifies
//!    the token and stores an [`auth::Identity`] in the request extensions
//! 2. [`role::require_roles`]: exact membership of the identity's role in a
//!    static allow-set
//! 3. [`owner::require_self_or_privileged`]: only on routes that act on a
//!    user (`/users/{id}`), passes the user themself or any `Admin`/`Super`
//!
//! Every rejection is a 401 with a `{"message"}` body.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, extract::Request, middleware::Next};
//! use crate::middleware::{auth::authenticate, role::{require_roles, CLIENT_ONLY}};
//!
//! let routes = Router::new()
//!     .route("/posts", post(create_post))
//!     .route_layer(middleware::from_fn(|req: Request, next: Next| {
//!         require_roles(CLIENT_ONLY, req, next)
//!     }))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

pub mod auth;
pub mod owner;
pub mod role;
