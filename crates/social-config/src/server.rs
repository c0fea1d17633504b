use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Budget for each service call.
    pub request_timeout: Duration,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            request_timeout: Duration::from_secs(10),
            database_url: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            request_timeout: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
        }
    }
}
