//! Role gate: exact membership of the caller's role in a static set.

use axum::{extract::Request, middleware::Next, response::Response};
use social_core::AppError;
use social_models::Role;

use crate::middleware::auth::Identity;

pub const ANY_ROLE: &[Role] = &[Role::Client, Role::Admin, Role::Super];
pub const CLIENT_ONLY: &[Role] = &[Role::Client];
pub const ADMINS: &[Role] = &[Role::Admin, Role::Super];
pub const SUPER_ONLY: &[Role] = &[Role::Super];

/// Passes when `role` is listed in `allowed`. There is no ordering here:
/// `&[Role::Client, Role::Admin]` rejects `Super`.
pub fn authorize_roles(identity: Option<&Identity>, allowed: &[Role]) -> Result<(), AppError> {
    match identity {
        Some(identity) if allowed.contains(&identity.role) => Ok(()),
        _ => Err(AppError::insufficient_privileges()),
    }
}

/// Use through a closure:
///
/// ```ignore
/// middleware::from_fn(|req: Request, next: Next| require_roles(ADMINS, req, next))
/// ```
pub async fn require_roles(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize_roles(req.extensions().get::<Identity>(), allowed)?;
    Ok(next.run(req).await)
}
