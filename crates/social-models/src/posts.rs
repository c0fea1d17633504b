//! Posts and their DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{PostId, UserId};

/// Author fields embedded into post reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub picture: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Post {
    pub id: PostId,
    /// Author.
    pub user_id: UserId,
    /// Denormalized author, present on reads only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthorSummary>,
    pub description: String,
    pub badge: String,
    pub pictures: Vec<String>,
    /// Ids of users who liked the post. Never contains duplicates.
    pub likes: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    #[must_use]
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreatePostDto {
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub pictures: Vec<String>,
}

impl CreatePostDto {
    /// Builds an unsaved post owned by `author`.
    pub fn into_post(self, author: UserId) -> Post {
        Post {
            user_id: author,
            description: self.description,
            badge: self.badge,
            pictures: self.pictures,
            ..Post::default()
        }
    }
}

/// Content patch. Author and likes are never written through this path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct UpdatePostDto {
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    pub badge: Option<String>,
    pub pictures: Option<Vec<String>>,
}

impl UpdatePostDto {
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(description) = &self.description {
            post.description = description.clone();
        }
        if let Some(badge) = &self.badge {
            post.badge = badge.clone();
        }
        if let Some(pictures) = &self.pictures {
            post.pictures = pictures.clone();
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostResponse {
    pub post: Post,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_post_sets_author() {
        let author = UserId::new();
        let post = CreatePostDto {
            description: "hello".to_string(),
            ..CreatePostDto::default()
        }
        .into_post(author);

        assert!(post.is_authored_by(author));
        assert!(post.id.is_nil());
        assert!(post.likes.is_empty());
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut post = Post {
            description: "before".to_string(),
            badge: "news".to_string(),
            pictures: vec!["a.png".to_string()],
            ..Post::default()
        };
        UpdatePostDto {
            description: Some("after".to_string()),
            ..UpdatePostDto::default()
        }
        .apply_to(&mut post);

        assert_eq!(post.description, "after");
        assert_eq!(post.badge, "news");
        assert_eq!(post.pictures, vec!["a.png".to_string()]);
    }

    #[test]
    fn test_author_omitted_when_absent() {
        let json = serde_json::to_value(Post::default()).unwrap();
        assert!(json.get("user").is_none());
        assert!(json.get("user_id").is_some());
    }
}
