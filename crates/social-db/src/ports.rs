//! Repository ports for users and posts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use social_models::{Post, PostId, Role, UpdatePostDto, UpdateUserDto, User, UserId};

/// Persistence errors raised by repository adapters.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("duplicate record: {0}")]
    Duplicate(String),
    #[error("repository connection failed: {0}")]
    Connection(String),
    #[error("repository query failed: {0}")]
    Query(String),
    #[error("stored record is malformed: {0}")]
    Corrupt(String),
}

/// Which records a scoped write may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteScope {
    Any,
    /// Only records currently tagged with this role.
    OnlyRole(Role),
}

impl WriteScope {
    #[must_use]
    pub fn allows(self, role: Role) -> bool {
        match self {
            WriteScope::Any => true,
            WriteScope::OnlyRole(required) => required == role,
        }
    }

    /// The role filter as a nullable SQL parameter.
    #[must_use]
    pub fn role_filter(self) -> Option<i16> {
        match self {
            WriteScope::Any => None,
            WriteScope::OnlyRole(role) => Some(role.into()),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Looks up an account by its external identity provider id.
    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, RepositoryError>;

    /// Users with `role`, oldest first, without credentials.
    async fn list(&self, role: Role, active_only: bool) -> Result<Vec<User>, RepositoryError>;

    /// Applies the profile patch if `id` exists within `scope`.
    async fn update_profile(
        &self,
        id: UserId,
        scope: WriteScope,
        patch: &UpdateUserDto,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, RepositoryError>;

    /// Returns whether a record within `scope` was removed.
    async fn delete(&self, id: UserId, scope: WriteScope) -> Result<bool, RepositoryError>;

    /// Adds `following` to `follower`'s set unless already present.
    async fn add_following(&self, follower: UserId, following: UserId)
    -> Result<(), RepositoryError>;

    /// Removes `following` from `follower`'s set if present.
    async fn remove_following(
        &self,
        follower: UserId,
        following: UserId,
    ) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<(), RepositoryError>;

    /// Reads a post with its author summary embedded.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError>;

    /// All posts, newest first, with author summaries.
    async fn list(&self) -> Result<Vec<Post>, RepositoryError>;

    async fn update_content(
        &self,
        id: PostId,
        patch: &UpdatePostDto,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepositoryError>;

    async fn delete(&self, id: PostId) -> Result<bool, RepositoryError>;

    async fn add_like(&self, id: PostId, user: UserId) -> Result<(), RepositoryError>;

    async fn remove_like(&self, id: PostId, user: UserId) -> Result<(), RepositoryError>;
}
