use axum::{Json, extract::State, http::HeaderMap};
use social_core::AppError;
use social_models::{LoginRequest, LoginResponse};
use tracing::instrument;
use utoipa::ToSchema;

use super::service::Credentials;
use crate::middleware::auth::bearer_token;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Body of every error response.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad email or password", body = ErrorResponse),
        (status = 404, description = "No account with that email", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(email = %dto.email))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, token) = state
        .auth
        .login(Credentials::Password {
            email: dto.email,
            password: dto.password,
        })
        .await?;

    Ok(Json(LoginResponse { token, user }))
}

/// Login with a token from the external identity provider
///
/// First-time callers get a client account built from their provider profile.
#[utoipa::path(
    post,
    path = "/api/v1/auth/external",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Missing or rejected provider token", body = ErrorResponse),
        (status = 404, description = "Provider has no such user", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn external_login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LoginResponse>, AppError> {
    let raw_token = bearer_token(&headers)?;
    let uid = state.auth.resolve_external(raw_token).await?;
    let (user, token) = state.auth.login(Credentials::External { uid }).await?;

    Ok(Json(LoginResponse { token, user }))
}
