//! # Social Observability
//!
//! Structured logging for the Social API.
//!
//! - [`logging::init_tracing`]: console output plus daily rolling error and
//!   JSON files under `storage/logs`
//! - [`logging::logging_middleware`]: one line per request with a request id,
//!   matched route, status and latency
//!
//! ```no_run
//! social_observability::init_tracing().expect("tracing already initialized");
//! ```

pub mod logging;

pub use logging::{LOG_DIR, filter_directives, init_tracing, logging_middleware};
