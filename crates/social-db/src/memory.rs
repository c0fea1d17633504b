//! In-process store.
//!
//! Backs the server when `DATABASE_URL` is unset and every HTTP test suite.
//! It mirrors the Postgres adapter: unique emails and external ids, scoped
//! writes, author summaries on post reads, and set semantics for follows and
//! likes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use social_models::{AuthorSummary, Post, PostId, Role, UpdatePostDto, UpdateUserDto, User, UserId};
use tokio::sync::RwLock;

use crate::ports::{PostRepository, RepositoryError, UserRepository, WriteScope};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    posts: RwLock<HashMap<PostId, Post>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_author(&self, mut post: Post) -> Post {
        let users = self.users.read().await;
        post.user = users.get(&post.user_id).map(|author| AuthorSummary {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            picture: author.picture.clone(),
        });
        post
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(RepositoryError::Duplicate(format!("users.id {}", user.id)));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate("users.email".to_string()));
        }
        if let Some(uid) = &user.uid
            && users.values().any(|u| u.uid.as_ref() == Some(uid))
        {
            return Err(RepositoryError::Duplicate("users.uid".to_string()));
        }

        let mut stored = user.clone();
        stored.password = None;
        users.insert(stored.id, stored);
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.uid.as_deref() == Some(uid))
            .cloned())
    }

    async fn list(&self, role: Role, active_only: bool) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.read().await;
        let mut listed: Vec<User> = users
            .values()
            .filter(|u| u.role == role && (!active_only || u.active))
            .cloned()
            .map(User::without_credentials)
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(listed)
    }

    async fn update_profile(
        &self,
        id: UserId,
        scope: WriteScope,
        patch: &UpdateUserDto,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id).filter(|u| scope.allows(u.role)) else {
            return Ok(None);
        };

        patch.apply_to(user);
        user.updated_at = updated_at;
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId, scope: WriteScope) -> Result<bool, RepositoryError> {
        let mut users = self.users.write().await;
        match users.get(&id) {
            Some(user) if scope.allows(user.role) => {
                users.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_following(
        &self,
        follower: UserId,
        following: UserId,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&follower)
            && !user.following.contains(&following)
        {
            user.following.push(following);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn remove_following(
        &self,
        follower: UserId,
        following: UserId,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&follower)
            && user.following.contains(&following)
        {
            user.following.retain(|id| *id != following);
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: &Post) -> Result<(), RepositoryError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(RepositoryError::Duplicate(format!("posts.id {}", post.id)));
        }

        let mut stored = post.clone();
        stored.user = None;
        posts.insert(stored.id, stored);
        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let post = self.posts.read().await.get(&id).cloned();
        match post {
            Some(post) => Ok(Some(self.with_author(post).await)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Post>, RepositoryError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let mut listed = Vec::with_capacity(posts.len());
        for post in posts {
            listed.push(self.with_author(post).await);
        }
        Ok(listed)
    }

    async fn update_content(
        &self,
        id: PostId,
        patch: &UpdatePostDto,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepositoryError> {
        let updated = {
            let mut posts = self.posts.write().await;
            let Some(post) = posts.get_mut(&id) else {
                return Ok(None);
            };
            patch.apply_to(post);
            post.updated_at = updated_at;
            post.clone()
        };

        Ok(Some(self.with_author(updated).await))
    }

    async fn delete(&self, id: PostId) -> Result<bool, RepositoryError> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn add_like(&self, id: PostId, user: UserId) -> Result<(), RepositoryError> {
        let mut posts = self.posts.write().await;
        if let Some(post) = posts.get_mut(&id)
            && !post.likes.contains(&user)
        {
            post.likes.push(user);
            post.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn remove_like(&self, id: PostId, user: UserId) -> Result<(), RepositoryError> {
        let mut posts = self.posts.write().await;
        if let Some(post) = posts.get_mut(&id)
            && post.likes.contains(&user)
        {
            post.likes.retain(|liker| *liker != user);
            post.updated_at = Utc::now();
        }
        Ok(())
    }
}
