use social_models::{
    AuthorSummary, CreatePostDto, CreateUserDto, LoginRequest, LoginResponse, Post, PostResponse,
    PostsResponse, UpdatePostDto, UpdateUserDto, User, UserResponse, UsersResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::external_login,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_admins,
        crate::modules::users::controller::create_admin,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::follow_user,
        crate::modules::users::controller::unfollow_user,
        crate::modules::posts::controller::get_posts,
        crate::modules::posts::controller::create_post,
        crate::modules::posts::controller::get_post,
        crate::modules::posts::controller::update_post,
        crate::modules::posts::controller::delete_post,
        crate::modules::posts::controller::like_post,
        crate::modules::posts::controller::unlike_post,
    ),
    components(
        schemas(
            User,
            CreateUserDto,
            UpdateUserDto,
            UserResponse,
            UsersResponse,
            LoginRequest,
            LoginResponse,
            Post,
            AuthorSummary,
            CreatePostDto,
            UpdatePostDto,
            PostResponse,
            PostsResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Password and external provider login"),
        (name = "Users", description = "Accounts and follows"),
        (name = "Posts", description = "Posts and likes")
    ),
    info(
        title = "Social API",
        version = "0.1.0",
        description = "Accounts, follows, posts and likes over a token-authenticated REST API.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
