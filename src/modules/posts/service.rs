use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use social_core::{AppError, Page, paginate, with_deadline};
use social_db::PostRepository;
use social_models::{Post, PostId, Role, UpdatePostDto, UserId};
use tracing::instrument;

use crate::middleware::auth::Identity;

pub struct PostService {
    repo: Arc<dyn PostRepository>,
    budget: Duration,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, budget: Duration) -> Self {
        Self { repo, budget }
    }

    #[instrument(skip(self, post), fields(author = %post.user_id))]
    pub async fn create(&self, mut post: Post) -> Result<Post, AppError> {
        with_deadline(self.budget, async move {
            if post.id.is_nil() {
                post.id = PostId::new();
            }
            let now = Utc::now();
            post.created_at = now;
            post.updated_at = now;
            post.likes.clear();

            self.repo.insert(&post).await.map_err(|e| {
                tracing::error!(error = %e, "failed to insert post");
                AppError::could_not_insert()
            })?;

            // read back for the author summary
            let stored = self.repo.find_by_id(post.id).await?;
            Ok::<_, AppError>(stored.unwrap_or(post))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn find(&self, id: &str) -> Result<Post, AppError> {
        let id = PostId::parse(id)?;
        with_deadline(self.budget, self.find_by_id(id)).await
    }

    async fn find_by_id(&self, id: PostId) -> Result<Post, AppError> {
        self.repo.find_by_id(id).await?.ok_or_else(AppError::not_found)
    }

    /// Every post, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Post>, AppError> {
        let listing = self.repo.list();
        with_deadline(self.budget, async { listing.await.map_err(AppError::from) }).await
    }

    /// Clients must author the post; admins and supers bypass the check.
    async fn authorize_write(&self, id: PostId, actor: &Identity) -> Result<(), AppError> {
        if actor.role != Role::Client {
            return Ok(());
        }

        let post = self.find_by_id(id).await?;
        if actor.is(&post.user_id.to_string()) {
            Ok(())
        } else {
            Err(AppError::unauthorized())
        }
    }

    #[instrument(skip(self, patch), fields(actor = %actor.subject))]
    pub async fn update(
        &self,
        target: &str,
        actor: &Identity,
        patch: UpdatePostDto,
    ) -> Result<Post, AppError> {
        let id = PostId::parse(target)?;

        with_deadline(self.budget, async {
            self.authorize_write(id, actor).await?;
            self.repo
                .update_content(id, &patch, Utc::now())
                .await?
                .ok_or_else(AppError::not_found)
        })
        .await
    }

    #[instrument(skip(self), fields(actor = %actor.subject))]
    pub async fn delete(&self, target: &str, actor: &Identity) -> Result<(), AppError> {
        let id = PostId::parse(target)?;

        with_deadline(self.budget, async {
            self.authorize_write(id, actor).await?;
            if self.repo.delete(id).await? {
                Ok(())
            } else {
                Err(AppError::not_found())
            }
        })
        .await
    }

    /// Records `fan`'s like once, however often it is repeated.
    #[instrument(skip(self))]
    pub async fn add_like(&self, fan: &str, post: &str) -> Result<Post, AppError> {
        let fan = UserId::parse(fan)?;
        let post = PostId::parse(post)?;

        with_deadline(self.budget, async {
            self.repo.add_like(post, fan).await?;
            self.find_by_id(post).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_like(&self, fan: &str, post: &str) -> Result<Post, AppError> {
        let fan = UserId::parse(fan)?;
        let post = PostId::parse(post)?;

        with_deadline(self.budget, async {
            self.repo.remove_like(post, fan).await?;
            self.find_by_id(post).await
        })
        .await
    }

    pub fn with_pagination(posts: Vec<Post>, page: i64, limit: i64) -> Result<Page<Post>, AppError> {
        paginate(posts, page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use social_db::InMemoryStore;

    fn service() -> PostService {
        PostService::new(Arc::new(InMemoryStore::new()), Duration::from_secs(5))
    }

    async fn seed(service: &PostService, author: UserId) -> Post {
        service
            .create(Post {
                user_id: author,
                description: "first".to_string(),
                badge: "news".to_string(),
                ..Post::default()
            })
            .await
            .unwrap()
    }

    fn client(id: UserId) -> Identity {
        Identity::new(id.to_string(), Role::Client)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let service = service();
        let post = seed(&service, UserId::new()).await;
        assert!(!post.id.is_nil());
        assert_eq!(post.created_at, post.updated_at);
    }

    #[tokio::test]
    async fn test_author_updates_own_post() {
        let service = service();
        let author = UserId::new();
        let post = seed(&service, author).await;
        let patch = UpdatePostDto {
            description: Some("edited".to_string()),
            ..UpdatePostDto::default()
        };

        let updated = service
            .update(&post.id.to_string(), &client(author), patch)
            .await
            .unwrap();
        assert_eq!(updated.description, "edited");
        assert_eq!(updated.badge, "news");
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn test_other_client_cannot_touch_post() {
        let service = service();
        let post = seed(&service, UserId::new()).await;
        let stranger = client(UserId::new());

        let err = service
            .update(&post.id.to_string(), &stranger, UpdatePostDto::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Unauthorized");

        let err = service
            .delete(&post.id.to_string(), &stranger)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Unauthorized");
    }

    #[tokio::test]
    async fn test_admin_bypasses_authorship() {
        let service = service();
        let post = seed(&service, UserId::new()).await;
        let admin = Identity::new(UserId::new().to_string(), Role::Admin);

        service
            .delete(&post.id.to_string(), &admin)
            .await
            .unwrap();
        let err = service.find(&post.id.to_string()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_client_write_on_missing_post() {
        let err = service()
            .delete(&PostId::new().to_string(), &client(UserId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_likes_are_idempotent() {
        let service = service();
        let post = seed(&service, UserId::new()).await;
        let fan = UserId::new().to_string();
        let id = post.id.to_string();

        service.add_like(&fan, &id).await.unwrap();
        let liked = service.add_like(&fan, &id).await.unwrap();
        assert_eq!(liked.likes.len(), 1);

        service.remove_like(&fan, &id).await.unwrap();
        let unliked = service.remove_like(&fan, &id).await.unwrap();
        assert!(unliked.likes.is_empty());
    }

    #[tokio::test]
    async fn test_like_invalid_ids() {
        let service = service();
        let err = service
            .add_like("fan", &PostId::new().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "invalid id");

        let err = service
            .remove_like(&UserId::new().to_string(), "post")
            .await
            .unwrap_err();
        assert_eq!(err.message(), "invalid id");
    }

    #[tokio::test]
    async fn test_like_missing_post() {
        let err = service()
            .add_like(&UserId::new().to_string(), &PostId::new().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
