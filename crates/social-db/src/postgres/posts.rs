use async_trait::async_trait;
use chrono::{DateTime, Utc};
use social_models::{Post, PostId, UpdatePostDto, UserId};

use super::PgStore;
use super::rows::{PostRow, post_select};
use crate::ports::{PostRepository, RepositoryError};

#[async_trait]
impl PostRepository for PgStore {
    async fn insert(&self, post: &Post) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO posts (id, user_id, description, badge, pictures, likes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.description)
        .bind(&post.badge)
        .bind(&post.pictures)
        .bind(&post.likes)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(concat!(post_select!(), " WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(Post::from))
    }

    async fn list(&self) -> Result<Vec<Post>, RepositoryError> {
        let rows = sqlx::query_as::<_, PostRow>(concat!(
            post_select!(),
            " ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn update_content(
        &self,
        id: PostId,
        patch: &UpdatePostDto,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepositoryError> {
        let updated = sqlx::query_scalar::<_, PostId>(
            "UPDATE posts SET \
             description = COALESCE($2, description), \
             badge = COALESCE($3, badge), \
             pictures = COALESCE($4, pictures), \
             updated_at = $5 \
             WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(&patch.description)
        .bind(&patch.badge)
        .bind(&patch.pictures)
        .bind(updated_at)
        .fetch_optional(self.pool())
        .await?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: PostId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, id: PostId, user: UserId) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE posts SET likes = array_append(likes, $2), updated_at = NOW() \
             WHERE id = $1 AND NOT ($2 = ANY(likes))",
        )
        .bind(id)
        .bind(user)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove_like(&self, id: PostId, user: UserId) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE posts SET likes = array_remove(likes, $2), updated_at = NOW() \
             WHERE id = $1 AND $2 = ANY(likes)",
        )
        .bind(id)
        .bind(user)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::UserRepository;
    use social_models::{Role, User};
    use sqlx::PgPool;

    async fn seed_author(store: &PgStore) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: format!("{}@example.com", UserId::new().into_inner()),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            role: Role::Client,
            active: true,
            created_at: now,
            updated_at: now,
            ..User::default()
        };
        UserRepository::insert(store, &user).await.unwrap();
        user
    }

    fn post_by(author: UserId, description: &str) -> Post {
        let now = Utc::now();
        Post {
            id: PostId::new(),
            user_id: author,
            description: description.to_string(),
            created_at: now,
            updated_at: now,
            ..Post::default()
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_find_embeds_author(pool: PgPool) {
        let store = PgStore::new(pool);
        let author = seed_author(&store).await;
        let post = post_by(author.id, "hello");
        PostRepository::insert(&store, &post).await.unwrap();

        let found = PostRepository::find_by_id(&store, post.id).await.unwrap().unwrap();
        let summary = found.user.unwrap();
        assert_eq!(summary.first_name, "Grace");
        assert_eq!(summary.last_name, "Hopper");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_keeps_likes(pool: PgPool) {
        let store = PgStore::new(pool);
        let author = seed_author(&store).await;
        let post = post_by(author.id, "before");
        PostRepository::insert(&store, &post).await.unwrap();
        store.add_like(post.id, author.id).await.unwrap();

        let patch = UpdatePostDto {
            description: Some("after".to_string()),
            ..UpdatePostDto::default()
        };
        let updated = store
            .update_content(post.id, &patch, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.description, "after");
        assert_eq!(updated.likes, vec![author.id]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_likes_are_a_set(pool: PgPool) {
        let store = PgStore::new(pool);
        let author = seed_author(&store).await;
        let post = post_by(author.id, "hello");
        PostRepository::insert(&store, &post).await.unwrap();

        store.add_like(post.id, author.id).await.unwrap();
        store.add_like(post.id, author.id).await.unwrap();
        let found = PostRepository::find_by_id(&store, post.id).await.unwrap().unwrap();
        assert_eq!(found.likes.len(), 1);

        store.remove_like(post.id, author.id).await.unwrap();
        let found = PostRepository::find_by_id(&store, post.id).await.unwrap().unwrap();
        assert!(found.likes.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_list_newest_first(pool: PgPool) {
        let store = PgStore::new(pool);
        let author = seed_author(&store).await;
        let mut older = post_by(author.id, "older");
        older.created_at = Utc::now() - chrono::Duration::minutes(5);
        let newer = post_by(author.id, "newer");
        PostRepository::insert(&store, &older).await.unwrap();
        PostRepository::insert(&store, &newer).await.unwrap();

        let posts = PostRepository::list(&store).await.unwrap();
        assert_eq!(posts[0].description, "newer");
        assert!(PostRepository::delete(&store, older.id).await.unwrap());
        assert!(!PostRepository::delete(&store, older.id).await.unwrap());
    }
}
