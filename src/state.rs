use std::sync::Arc;
use std::time::Duration;

use social_auth::{HttpIdentityProvider, IdentityProvider, TokenCodec};
use social_config::{CorsConfig, IdentityProviderConfig, JwtConfig, ServerConfig};
use social_db::{
    InMemoryStore, PostRepository, UserRepository, init_db_pool, postgres::PgStore, run_migrations,
};

use crate::modules::auth::AuthService;
use crate::modules::posts::PostService;
use crate::modules::users::UserService;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub auth: Arc<AuthService>,
    pub codec: Arc<TokenCodec>,
    pub cors_config: CorsConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the services over the given adapters.
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        provider: Arc<dyn IdentityProvider>,
        jwt_config: &JwtConfig,
        cors_config: CorsConfig,
        budget: Duration,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(jwt_config));
        let users = Arc::new(UserService::new(user_repo, budget));
        let posts = Arc::new(PostService::new(post_repo, budget));
        let auth = Arc::new(AuthService::new(
            users.clone(),
            provider,
            codec.clone(),
            budget,
        ));

        Self {
            users,
            posts,
            auth,
            codec,
            cors_config,
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(
        provider: Arc<dyn IdentityProvider>,
        jwt_config: &JwtConfig,
        cors_config: CorsConfig,
        budget: Duration,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(
            store.clone(),
            store,
            provider,
            jwt_config,
            cors_config,
            budget,
        )
    }
}

/// Builds the state from the environment. Without `DATABASE_URL` the server
/// runs on the in-memory store and loses everything on exit.
pub async fn init_app_state(server: &ServerConfig) -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env();
    let cors_config = CorsConfig::from_env();
    let provider: Arc<dyn IdentityProvider> =
        Arc::new(HttpIdentityProvider::new(IdentityProviderConfig::from_env())?);

    let state = match &server.database_url {
        Some(url) => {
            let pool = init_db_pool(url).await?;
            run_migrations(&pool).await?;
            tracing::info!("connected to postgres");

            let store = Arc::new(PgStore::new(pool));
            AppState::new(
                store.clone(),
                store,
                provider,
                &jwt_config,
                cors_config,
                server.request_timeout,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, using the in-memory store");
            AppState::in_memory(provider, &jwt_config, cors_config, server.request_timeout)
        }
    };

    Ok(state)
}
