//! Connection settings for the REST adapter.

use super::error::{RestError, RestResult};

/// Runtime configuration describing how to reach the managed backend.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL of the backend project (without the `/rest/v1` suffix).
    pub base_url: String,
    /// API key sent both as the `apikey` header and as a bearer token.
    pub api_key: String,
    /// Override for the serverless-function base URL. Defaults to
    /// `{base_url}/functions/v1` when unset.
    pub functions_url: Option<String>,
}

impl RestConfig {
    /// Construct a configuration from an explicit base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            functions_url: None,
        }
    }

    /// Point question generation at a dedicated function host.
    pub fn with_functions_url(mut self, url: impl Into<String>) -> Self {
        self.functions_url = Some(url.into());
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> RestResult<Self> {
        let base_url = std::env::var("DUEL_API_BASE_URL").map_err(|_| RestError::MissingEnvVar {
            var: "DUEL_API_BASE_URL",
        })?;
        let api_key = std::env::var("DUEL_API_KEY").map_err(|_| RestError::MissingEnvVar {
            var: "DUEL_API_KEY",
        })?;

        let mut config = Self::new(base_url, api_key);

        if let Ok(functions_url) = std::env::var("DUEL_FUNCTIONS_URL") {
            config = config.with_functions_url(functions_url);
        }

        Ok(config)
    }
}
