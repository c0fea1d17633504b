//! Administrative commands behind `social-cli`.

use std::sync::Arc;

use social_core::{AppError, deadline::DEFAULT_BUDGET};
use social_db::UserRepository;
use social_models::{Role, User};

use crate::modules::users::UserService;

/// Input for the first `Super` account, which cannot be created over HTTP.
#[derive(Clone)]
pub struct NewSuper {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub async fn create_super(
    repo: Arc<dyn UserRepository>,
    new_super: NewSuper,
) -> Result<User, AppError> {
    if new_super.password.is_empty() {
        return Err(AppError::bad_email_or_password());
    }

    let user = User {
        email: new_super.email.trim().to_string(),
        password: Some(new_super.password),
        first_name: new_super.first_name,
        last_name: new_super.last_name,
        role: Role::Super,
        ..User::default()
    };

    UserService::new(repo, DEFAULT_BUDGET).create(user).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use social_db::InMemoryStore;

    fn input(email: &str, password: &str) -> NewSuper {
        NewSuper {
            first_name: "Root".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_super() {
        let store = Arc::new(InMemoryStore::new());
        let user = create_super(store.clone(), input(" root@example.com ", "123456"))
            .await
            .unwrap();

        assert_eq!(user.role, Role::Super);
        assert_eq!(user.email, "root@example.com");
        let stored = store.find_by_email("root@example.com").await.unwrap().unwrap();
        assert!(stored.compare_password("123456"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = Arc::new(InMemoryStore::new());
        create_super(store.clone(), input("root@example.com", "123456"))
            .await
            .unwrap();
        let err = create_super(store, input("root@example.com", "654321"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Error could not insert");
    }

    #[tokio::test]
    async fn test_empty_password_rejected() {
        let err = create_super(Arc::new(InMemoryStore::new()), input("root@example.com", ""))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }
}
