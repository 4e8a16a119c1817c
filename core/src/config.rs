//! Deployment configuration.

use std::env;

/// Base URL of the deployed API.
pub const DEFAULT_BASE_URL: &str = "https://workout-tracker-api.up.railway.app";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "WORKOUT_API_URL";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// A trailing slash would double up when paths are appended, so it is
    /// stripped here once.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads [`BASE_URL_ENV`], falling back to the compiled-in default.
    pub fn from_env() -> Self {
        let url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ApiConfig::new("http://localhost:8000/");
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn default_uses_deployment_url() {
        assert_eq!(ApiConfig::default().base_url, DEFAULT_BASE_URL);
    }
}
