use async_trait::async_trait;
use chrono::{DateTime, Utc};
use social_models::{Role, UpdateUserDto, User, UserId};

use super::PgStore;
use super::rows::{UserRow, public_user_columns, user_columns};
use crate::ports::{RepositoryError, UserRepository, WriteScope};

fn into_users(rows: Vec<UserRow>) -> Result<Vec<User>, RepositoryError> {
    rows.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, email, password, uid, first_name, last_name, country, state, \
             city, bio, picture, following, role, active, notification_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.uid)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.country)
        .bind(&user.state)
        .bind(&user.city)
        .bind(&user.bio)
        .bind(&user.picture)
        .bind(&user.following)
        .bind(i16::from(user.role))
        .bind(user.active)
        .bind(&user.notification_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE uid = $1"
        ))
        .bind(uid)
        .fetch_optional(self.pool())
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn list(&self, role: Role, active_only: bool) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            public_user_columns!(),
            " FROM users WHERE role = $1 AND (NOT $2 OR active) ORDER BY created_at ASC, id ASC"
        ))
        .bind(i16::from(role))
        .bind(active_only)
        .fetch_all(self.pool())
        .await?;

        into_users(rows)
    }

    async fn update_profile(
        &self,
        id: UserId,
        scope: WriteScope,
        patch: &UpdateUserDto,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>(concat!(
            "UPDATE users SET \
             first_name = COALESCE($3, first_name), \
             last_name = COALESCE($4, last_name), \
             country = COALESCE($5, country), \
             state = COALESCE($6, state), \
             city = COALESCE($7, city), \
             bio = COALESCE($8, bio), \
             picture = COALESCE($9, picture), \
             updated_at = $10 \
             WHERE id = $1 AND ($2::SMALLINT IS NULL OR role = $2) \
             RETURNING ",
            user_columns!()
        ))
        .bind(id)
        .bind(scope.role_filter())
        .bind(&patch.first_name)
        .bind(&patch.last_name)
        .bind(&patch.country)
        .bind(&patch.state)
        .bind(&patch.city)
        .bind(&patch.bio)
        .bind(&patch.picture)
        .bind(updated_at)
        .fetch_optional(self.pool())
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn delete(&self, id: UserId, scope: WriteScope) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM users WHERE id = $1 AND ($2::SMALLINT IS NULL OR role = $2)")
                .bind(id)
                .bind(scope.role_filter())
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_following(
        &self,
        follower: UserId,
        following: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE users SET following = array_append(following, $2), updated_at = NOW() \
             WHERE id = $1 AND NOT ($2 = ANY(following))",
        )
        .bind(follower)
        .bind(following)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove_following(
        &self,
        follower: UserId,
        following: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE users SET following = array_remove(following, $2), updated_at = NOW() \
             WHERE id = $1 AND $2 = ANY(following)",
        )
        .bind(follower)
        .bind(following)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
