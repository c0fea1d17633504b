use chrono::{DateTime, Utc};
use social_models::{AuthorSummary, Post, PostId, Role, User, UserId};
use sqlx::FromRow;

use crate::ports::RepositoryError;

/// Columns read for a full user record.
macro_rules! user_columns {
    () => {
        "id, email, password, uid, first_name, last_name, country, state, city, bio, picture, \
         following, role, active, notification_id, created_at, updated_at"
    };
}

/// Same as [`user_columns`] without the password hash.
macro_rules! public_user_columns {
    () => {
        "id, email, uid, first_name, last_name, country, state, city, bio, picture, \
         following, role, active, notification_id, created_at, updated_at"
    };
}

/// Post columns plus the joined author summary; expects `posts p` and
/// `LEFT JOIN users u`.
macro_rules! post_select {
    () => {
        "SELECT p.id, p.user_id, p.description, p.badge, p.pictures, p.likes, \
         p.created_at, p.updated_at, \
         u.first_name AS author_first_name, u.last_name AS author_last_name, \
         u.picture AS author_picture \
         FROM posts p LEFT JOIN users u ON u.id = p.user_id"
    };
}

pub(crate) use {post_select, public_user_columns, user_columns};

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    id: UserId,
    email: String,
    #[sqlx(default)]
    password: Option<String>,
    uid: Option<String>,
    first_name: String,
    last_name: String,
    country: String,
    state: String,
    city: String,
    bio: String,
    picture: String,
    following: Vec<UserId>,
    role: i16,
    active: bool,
    notification_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::try_from(row.role)
            .map_err(|e| RepositoryError::Corrupt(format!("user {}: {e}", row.id)))?;

        Ok(User {
            id: row.id,
            email: row.email,
            password: None,
            password_hash: row.password,
            uid: row.uid,
            first_name: row.first_name,
            last_name: row.last_name,
            country: row.country,
            state: row.state,
            city: row.city,
            bio: row.bio,
            picture: row.picture,
            following: row.following,
            role,
            active: row.active,
            notification_id: row.notification_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PostRow {
    id: PostId,
    user_id: UserId,
    description: String,
    badge: String,
    pictures: Vec<String>,
    likes: Vec<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_first_name: Option<String>,
    author_last_name: Option<String>,
    author_picture: Option<String>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        // the author may have been deleted
        let user = row.author_first_name.map(|first_name| AuthorSummary {
            id: row.user_id,
            first_name,
            last_name: row.author_last_name.unwrap_or_default(),
            picture: row.author_picture.unwrap_or_default(),
        });

        Post {
            id: row.id,
            user_id: row.user_id,
            user,
            description: row.description,
            badge: row.badge,
            pictures: row.pictures,
            likes: row.likes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
