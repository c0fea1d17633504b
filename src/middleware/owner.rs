//! Self-or-privileged gate for routes acting on a single user.

use axum::{
    extract::{RawPathParams, Request},
    middleware::Next,
    response::Response,
};
use social_core::{AppError, errors::MSG_NOT_AUTHORIZED};
use social_models::Role;

use crate::middleware::auth::Identity;

/// Passes when the caller is `target` or holds `Admin` or above.
pub fn authorize_self_or_privileged(
    identity: Option<&Identity>,
    target: &str,
) -> Result<(), AppError> {
    let identity = identity.ok_or_else(|| AppError::unauthenticated(MSG_NOT_AUTHORIZED))?;

    if identity.is(target) || identity.role >= Role::Admin {
        Ok(())
    } else {
        Err(AppError::insufficient_privileges())
    }
}

/// Reads the target from the `id` path parameter. Must be installed with
/// `route_layer` so the path has been matched.
pub async fn require_self_or_privileged(
    params: RawPathParams,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let target = params
        .iter()
        .find(|(name, _)| *name == "id")
        .map(|(_, value)| value.to_string())
        .unwrap_or_default();

    authorize_self_or_privileged(req.extensions().get::<Identity>(), &target)?;
    Ok(next.run(req).await)
}

/// Same check against a fixed target.
pub async fn require_self_or_privileged_for(
    target: String,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize_self_or_privileged(req.extensions().get::<Identity>(), &target)?;
    Ok(next.run(req).await)
}
