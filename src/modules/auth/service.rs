//! Password and federated login.
//!
//! Both strategies end the same way: a user record and a freshly issued
//! token from the shared [`TokenCodec`].

use std::sync::Arc;
use std::time::Duration;

use social_auth::{IdentityProvider, ProviderError, TokenCodec};
use social_core::{AppError, is_valid_email, with_deadline};
use social_models::{Role, User, users::split_display_name};
use tracing::instrument;

use crate::modules::users::service::UserService;

/// How a caller proves who they are.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { email: String, password: String },
    /// A uid already vouched for by the identity provider.
    External { uid: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .finish_non_exhaustive(),
            Credentials::External { uid } => f.debug_struct("External").field("uid", uid).finish(),
        }
    }
}

pub struct AuthService {
    users: Arc<UserService>,
    provider: Arc<dyn IdentityProvider>,
    codec: Arc<TokenCodec>,
    budget: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<UserService>,
        provider: Arc<dyn IdentityProvider>,
        codec: Arc<TokenCodec>,
        budget: Duration,
    ) -> Self {
        Self {
            users,
            provider,
            codec,
            budget,
        }
    }

    #[instrument(skip(self))]
    pub async fn login(&self, credentials: Credentials) -> Result<(User, String), AppError> {
        match credentials {
            Credentials::Password { email, password } => self.login_with_password(&email, &password).await,
            Credentials::External { uid } => self.federated_auth(&uid).await,
        }
    }

    /// The token is issued before the password is compared; a mismatch
    /// still discards it.
    async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AppError> {
        if !is_valid_email(email) {
            return Err(AppError::bad_email_or_password());
        }

        let user = with_deadline(self.budget, async {
            self.users
                .find_by_email(email)
                .await?
                .ok_or_else(AppError::not_found)
        })
        .await?;

        let token = self.issue(&user)?;

        if !user.compare_password(password) {
            return Err(AppError::bad_email_or_password());
        }

        Ok((user.without_credentials(), token))
    }

    /// Logs in by external id, creating a client account from the
    /// provider profile on first sight.
    async fn federated_auth(&self, uid: &str) -> Result<(User, String), AppError> {
        let existing = with_deadline(self.budget, async {
            self.users.find_by_uid(uid).await.map_err(AppError::from)
        })
        .await?;

        let user = match existing {
            Some(user) => user.without_credentials(),
            None => self.create_from_provider(uid).await?,
        };

        let token = self.issue(&user)?;
        Ok((user, token))
    }

    async fn create_from_provider(&self, uid: &str) -> Result<User, AppError> {
        let profile = with_deadline(self.budget, async {
            self.provider.fetch_profile(uid).await.map_err(|e| {
                tracing::error!(uid, error = %e, "could not load external profile");
                AppError::not_found()
            })
        })
        .await?;

        let (first_name, last_name) = split_display_name(&profile.display_name);
        let user = User {
            email: profile.email,
            uid: Some(uid.to_string()),
            first_name,
            last_name,
            picture: profile.picture,
            role: Role::Client,
            ..User::default()
        };

        tracing::info!(uid, "creating account for external user");
        self.users.create(user).await
    }

    /// Resolves a raw provider token to the external uid.
    #[instrument(skip_all)]
    pub async fn resolve_external(&self, raw_token: &str) -> Result<String, AppError> {
        with_deadline(self.budget, async {
            self.provider
                .verify_and_decode(raw_token)
                .await
                .map_err(|e| match e {
                    ProviderError::InvalidToken | ProviderError::UserNotFound(_) => {
                        AppError::unauthenticated(e.to_string())
                    }
                    ProviderError::NotConfigured(_) | ProviderError::Transport(_) => {
                        tracing::error!(error = %e, "identity provider unavailable");
                        AppError::internal()
                    }
                })
        })
        .await
    }

    fn issue(&self, user: &User) -> Result<String, AppError> {
        self.codec
            .issue(&user.id.to_string(), user.role)
            .map_err(|_| AppError::internal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use social_auth::{ExternalProfile, StaticIdentityProvider};
    use social_config::JwtConfig;
    use social_db::InMemoryStore;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(&JwtConfig::new("test_secret")))
    }

    fn services() -> (Arc<UserService>, AuthService) {
        let users = Arc::new(UserService::new(
            Arc::new(InMemoryStore::new()),
            Duration::from_secs(5),
        ));
        let provider = StaticIdentityProvider::new().with_user(
            "provider-token",
            "uid-1",
            ExternalProfile {
                email: "ada@example.com".to_string(),
                display_name: "Ada Lovelace".to_string(),
                picture: "https://example.com/ada.png".to_string(),
            },
        );
        let auth = AuthService::new(
            users.clone(),
            Arc::new(provider),
            codec(),
            Duration::from_secs(5),
        );
        (users, auth)
    }

    async fn seed(users: &UserService) -> User {
        users
            .create(User {
                email: "user@example.com".to_string(),
                password: Some("123456".to_string()),
                ..User::default()
            })
            .await
            .unwrap()
    }

    fn password(email: &str, password: &str) -> Credentials {
        Credentials::Password {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_password_login() {
        let (users, auth) = services();
        let created = seed(&users).await;

        let (user, token) = auth
            .login(password("user@example.com", "123456"))
            .await
            .unwrap();
        assert_eq!(user.id, created.id);
        assert!(user.password_hash.is_none());

        let (subject, role) = codec().verify(&token).unwrap();
        assert_eq!(subject, created.id.to_string());
        assert_eq!(role, Role::Client);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (users, auth) = services();
        seed(&users).await;
        let err = auth
            .login(password("user@example.com", "654321"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Bad email or password");
    }

    #[tokio::test]
    async fn test_malformed_email() {
        let (_, auth) = services();
        let err = auth.login(password("user", "123456")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Bad email or password");
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let (_, auth) = services();
        let err = auth
            .login(password("ghost@example.com", "123456"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_federated_creates_once() {
        let (users, auth) = services();
        let uid = auth.resolve_external("provider-token").await.unwrap();
        assert_eq!(uid, "uid-1");

        let (first, _) = auth
            .login(Credentials::External { uid: uid.clone() })
            .await
            .unwrap();
        assert_eq!(first.first_name, "Ada");
        assert_eq!(first.last_name, "Lovelace");
        assert_eq!(first.role, Role::Client);

        let (second, _) = auth.login(Credentials::External { uid }).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(users.list_clients(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_federated_unknown_uid() {
        let (_, auth) = services();
        let err = auth
            .login(Credentials::External {
                uid: "uid-404".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resolve_external_rejects_unknown_token() {
        let (_, auth) = services();
        let err = auth.resolve_external("forged").await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", password("a@example.com", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
