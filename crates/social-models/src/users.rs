//! User accounts and the DTOs around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use social_core::{hash_password, is_valid_email, verify_password};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use crate::roles::Role;

/// A user account.
///
/// `password` only ever holds plaintext between deserialization and
/// [`User::encrypt_password`]; neither it nor the hash is serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
    /// Identifier at the external identity provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub bio: String,
    pub picture: String,
    /// Ids this user follows. Never contains duplicates or the user's own id.
    pub following: Vec<UserId>,
    #[schema(value_type = u8)]
    pub role: Role,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn has_valid_email(&self) -> bool {
        is_valid_email(&self.email)
    }

    /// Hashes and clears the plaintext password, if one was supplied.
    /// An empty password counts as none.
    pub fn encrypt_password(&mut self) -> Result<(), social_core::AppError> {
        if let Some(plain) = self.password.take().filter(|p| !p.is_empty()) {
            self.password_hash = Some(hash_password(&plain)?);
        }
        Ok(())
    }

    /// Checks `password` against the stored hash. Accounts without a hash
    /// (federated only) never match.
    #[must_use]
    pub fn compare_password(&self, password: &str) -> bool {
        match self.password_hash.as_deref() {
            Some(hash) => verify_password(password, hash).unwrap_or(false),
            None => false,
        }
    }

    /// Copy without credentials, as returned by list queries.
    #[must_use]
    pub fn without_credentials(mut self) -> Self {
        self.password = None;
        self.password_hash = None;
        self
    }
}

/// Splits a provider display name on its first space.
pub fn split_display_name(display_name: &str) -> (String, String) {
    match display_name.trim().split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (display_name.trim().to_string(), String::new()),
    }
}

/// Sign-up payload. The email format is checked by the service, so an empty
/// email fails the same way as any other malformed one.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub notification_id: Option<String>,
}

impl CreateUserDto {
    /// Builds an unsaved user with the given role. The id stays nil until
    /// the service assigns one.
    pub fn into_user(self, role: Role) -> User {
        User {
            email: self.email.trim().to_string(),
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            country: self.country,
            state: self.state,
            city: self.city,
            bio: self.bio,
            picture: self.picture,
            notification_id: self.notification_id,
            role,
            ..User::default()
        }
    }
}

/// Profile patch. Only the fields present are written; role, email and
/// password cannot be changed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub picture: Option<String>,
}

impl UpdateUserDto {
    pub fn apply_to(&self, user: &mut User) {
        let fields = [
            (&self.first_name, &mut user.first_name),
            (&self.last_name, &mut user.last_name),
            (&self.country, &mut user.country),
            (&self.state, &mut user.state),
            (&self.city, &mut user.city),
            (&self.bio, &mut user.bio),
            (&self.picture, &mut user.picture),
        ];
        for (patch, field) in fields {
            if let Some(value) = patch {
                *field = value.clone();
            }
        }
    }
}

/// Credentials are only checked by the login itself, so every bad
/// combination gets the same `Bad email or password`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<User>,
    pub total: usize,
}

/// `?all=true` includes inactive accounts in the client listing.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListFilter {
    pub all: Option<String>,
}

impl UserListFilter {
    #[must_use]
    pub fn include_inactive(&self) -> bool {
        self.all.as_deref() == Some("true")
    }
}
