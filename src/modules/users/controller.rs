use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
};
use social_core::{AppError, Page, PaginationParams};
use social_models::{
    CreateUserDto, Role, UpdateUserDto, UserListFilter, UserResponse, UsersResponse,
};
use tracing::instrument;

use crate::middleware::auth::Identity;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// 201 with a `Location` header pointing at the new user.
type Created = (StatusCode, [(header::HeaderName, String); 1], Json<UserResponse>);

async fn create_with_role(
    state: &AppState,
    dto: CreateUserDto,
    role: Role,
) -> Result<Created, AppError> {
    let user = state.users.create(dto.into_user(role)).await?;
    let location = format!("/api/v1/users/{}", user.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse { user }),
    ))
}

/// Sign up as a client
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserResponse,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, description = "Invalid email", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Could not insert", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(email = %dto.email))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Created, AppError> {
    create_with_role(&state, dto, Role::Client).await
}

/// List client accounts
///
/// Active clients only, unless `all=true`.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PaginationParams, UserListFilter),
    responses(
        (status = 200, description = "Clients", body = UsersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<UserListFilter>,
) -> Result<Json<UsersResponse>, AppError> {
    let users = state.users.list_clients(filter.include_inactive()).await?;
    let page = match pagination.window() {
        Some((page, limit)) => UserService::with_pagination(users, page, limit)?,
        None => Page::all(users),
    };

    Ok(Json(UsersResponse {
        users: page.items,
        total: page.total,
    }))
}

/// List admin accounts
#[utoipa::path(
    get,
    path = "/api/v1/users/admins",
    params(PaginationParams),
    responses(
        (status = 200, description = "Admins", body = UsersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_admins(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<UsersResponse>, AppError> {
    let admins = state.users.list_by_role(Role::Admin).await?;
    let page = match pagination.window() {
        Some((page, limit)) => UserService::with_pagination(admins, page, limit)?,
        None => Page::all(admins),
    };

    Ok(Json(UsersResponse {
        users: page.items,
        total: page.total,
    }))
}

/// Create an admin account
#[utoipa::path(
    post,
    path = "/api/v1/users/admins",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Admin created", body = UserResponse),
        (status = 400, description = "Invalid email", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(email = %dto.email))]
pub async fn create_admin(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Created, AppError> {
    create_with_role(&state, dto, Role::Admin).await
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.find(&id).await?;
    Ok(Json(UserResponse { user }))
}

/// Update a profile
///
/// Clients may only update themselves; admins may update clients.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found or out of reach", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.update(&id, &identity, dto).await?;
    Ok(Json(UserResponse { user }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found or out of reach", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.users.delete(identity.role, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Follow a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/follow",
    params(("id" = String, Path, description = "User to follow")),
    responses(
        (status = 200, description = "The caller, with the updated following list", body = UserResponse),
        (status = 409, description = "Cannot follow yourself", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn follow_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.follow_to(&id, &identity.subject).await?;
    Ok(Json(UserResponse { user }))
}

/// Unfollow a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/follow",
    params(("id" = String, Path, description = "User to unfollow")),
    responses(
        (status = 200, description = "The caller, with the updated following list", body = UserResponse),
        (status = 409, description = "Cannot unfollow yourself", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn unfollow_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.unfollow_to(&id, &identity.subject).await?;
    Ok(Json(UserResponse { user }))
}
