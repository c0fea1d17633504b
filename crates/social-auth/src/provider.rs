//! External identity provider used for federated login.
//!
//! The provider vouches for a raw token from the client and resolves it to a
//! stable external user id (`uid`). On first login the service also pulls
//! the provider profile to create the local account.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use social_config::IdentityProviderConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalProfile {
    pub email: String,
    pub display_name: String,
    pub picture: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("external token rejected")]
    InvalidToken,
    #[error("external user {0} not found")]
    UserNotFound(String),
    #[error("identity provider is not configured: {0}")]
    NotConfigured(&'static str),
    #[error("identity provider request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a client-supplied token to the external user id.
    async fn verify_and_decode(&self, raw_token: &str) -> Result<String, ProviderError>;

    /// Loads the provider-side profile of `uid`.
    async fn fetch_profile(&self, uid: &str) -> Result<ExternalProfile, ProviderError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    photo_url: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

/// Identity-toolkit style REST adapter (`/v1/accounts:lookup`).
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    config: IdentityProviderConfig,
}

impl HttpIdentityProvider {
    pub fn new(config: IdentityProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn lookup_url(&self) -> String {
        format!(
            "{}/v1/accounts:lookup",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn lookup(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<LookupUser>, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            tracing::warn!(status = %status, "identity provider rejected lookup");
            return Err(ProviderError::InvalidToken);
        }
        if !status.is_success() {
            return Err(ProviderError::Transport(format!("unexpected status {status}")));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(body.users.into_iter().next())
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_and_decode(&self, raw_token: &str) -> Result<String, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("IDENTITY_PROVIDER_API_KEY"));
        }

        let request = self
            .client
            .post(self.lookup_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&json!({ "idToken": raw_token }));

        self.lookup(request)
            .await?
            .map(|user| user.local_id)
            .ok_or(ProviderError::InvalidToken)
    }

    async fn fetch_profile(&self, uid: &str) -> Result<ExternalProfile, ProviderError> {
        let admin_token = self
            .config
            .admin_token
            .as_deref()
            .ok_or(ProviderError::NotConfigured("IDENTITY_PROVIDER_ADMIN_TOKEN"))?;

        let request = self
            .client
            .post(self.lookup_url())
            .bearer_auth(admin_token)
            .json(&json!({ "localId": [uid] }));

        let user = self
            .lookup(request)
            .await?
            .ok_or_else(|| ProviderError::UserNotFound(uid.to_string()))?;

        Ok(ExternalProfile {
            email: user.email,
            display_name: user.display_name,
            picture: user.photo_url,
        })
    }
}

/// Fixed token → uid → profile table for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    tokens: std::collections::HashMap<String, String>,
    profiles: std::collections::HashMap<String, ExternalProfile>,
}

#[cfg(any(test, feature = "test-utils"))]
impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as resolving to `uid` with the given profile.
    pub fn with_user(mut self, token: &str, uid: &str, profile: ExternalProfile) -> Self {
        self.tokens.insert(token.to_string(), uid.to_string());
        self.profiles.insert(uid.to_string(), profile);
        self
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_and_decode(&self, raw_token: &str) -> Result<String, ProviderError> {
        self.tokens
            .get(raw_token)
            .cloned()
            .ok_or(ProviderError::InvalidToken)
    }

    async fn fetch_profile(&self, uid: &str) -> Result<ExternalProfile, ProviderError> {
        self.profiles
            .get(uid)
            .cloned()
            .ok_or_else(|| ProviderError::UserNotFound(uid.to_string()))
    }
}
