use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use social_core::{AppError, Page, PaginationParams};
use social_models::{CreatePostDto, PostResponse, PostsResponse, UpdatePostDto};
use tracing::instrument;

use crate::middleware::auth::Identity;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::posts::PostService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PaginationParams),
    responses(
        (status = 200, description = "Posts", body = PostsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_posts(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PostsResponse>, AppError> {
    let posts = state.posts.list().await?;
    let page = match pagination.window() {
        Some((page, limit)) => PostService::with_pagination(posts, page, limit)?,
        None => Page::all(posts),
    };

    Ok(Json(PostsResponse {
        posts: page.items,
        total: page.total,
    }))
}

/// Publish a post as the caller
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Posts"
)]
#[instrument(skip(state, dto))]
pub async fn create_post(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(dto): ValidatedJson<CreatePostDto>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let author = identity.user_id()?;
    let post = state.posts.create(dto.into_post(author)).await?;
    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post with its author", body = PostResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.find(&id).await?;
    Ok(Json(PostResponse { post }))
}

/// Edit a post
///
/// Clients may only edit their own posts.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 401, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Posts"
)]
#[instrument(skip(state, dto))]
pub async fn update_post(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdatePostDto>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.update(&id, &identity, dto).await?;
    Ok(Json(PostResponse { post }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.posts.delete(&id, &identity).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post with the caller's like", body = PostResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn like_post(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.add_like(&identity.subject, &id).await?;
    Ok(Json(PostResponse { post }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post without the caller's like", body = PostResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn unlike_post(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.remove_like(&identity.subject, &id).await?;
    Ok(Json(PostResponse { post }))
}
