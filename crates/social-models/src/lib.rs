//! # Social Models
//!
//! Domain models and DTOs for the Social API.
//!
//! - [`ids`]: strongly-typed UUID identifiers
//! - [`roles`]: the ordinal [`Role`] (Client < Admin < Super)
//! - [`users`]: accounts, sign-up/login DTOs, profile patches
//! - [`posts`]: posts, author summaries, content patches

pub mod ids;
pub mod posts;
pub mod roles;
pub mod users;

pub use ids::{PostId, UserId};
pub use posts::{AuthorSummary, CreatePostDto, Post, PostResponse, PostsResponse, UpdatePostDto};
pub use roles::{Role, UnknownRole};
pub use users::{
    CreateUserDto, LoginRequest, LoginResponse, UpdateUserDto, User, UserListFilter,
    UserResponse, UsersResponse,
};
