use std::env;

/// Endpoint and credentials for the external identity provider used by
/// federated login.
#[derive(Clone, Debug, Default)]
pub struct IdentityProviderConfig {
    /// Base URL of the provider's account API.
    pub base_url: String,
    /// Public API key sent with token lookups.
    pub api_key: String,
    /// Bearer token for privileged profile lookups by uid.
    pub admin_token: Option<String>,
}

impl IdentityProviderConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("IDENTITY_PROVIDER_URL")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_string()),
            api_key: env::var("IDENTITY_PROVIDER_API_KEY").unwrap_or_default(),
            admin_token: env::var("IDENTITY_PROVIDER_ADMIN_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}
