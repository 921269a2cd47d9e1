use thiserror::Error;
use url::Url;

/// Configuration errors. Missing provider credentials are a startup
/// precondition, so these are fatal in `main` rather than handled
/// per-request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },
}

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the hosted identity provider.
    pub provider_url: Url,
    /// Public API key sent with every provider call.
    pub anon_key: String,
    /// Our own origin, used to compose absolute redirect URLs.
    pub base_url: Url,
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IDP_URL`: Identity provider base URL (required)
    /// - `IDP_ANON_KEY`: Provider public API key (required)
    /// - `APP_BASE_URL`: Our origin for redirects (default: `http://localhost:3000`)
    /// - `COOKIE_SECURE`: Whether to set the secure flag on cookies (default: true)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is absent or a URL does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider_url = std::env::var("IDP_URL")
            .map_err(|_| ConfigError::MissingVar("IDP_URL"))?
            .parse()
            .map_err(|source| ConfigError::InvalidUrl {
                var: "IDP_URL",
                source,
            })?;

        let anon_key =
            std::env::var("IDP_ANON_KEY").map_err(|_| ConfigError::MissingVar("IDP_ANON_KEY"))?;

        let base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .parse()
            .map_err(|source| ConfigError::InvalidUrl {
                var: "APP_BASE_URL",
                source,
            })?;

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Ok(Self {
            provider_url,
            anon_key,
            base_url,
            cookie_secure,
        })
    }

    /// Configuration for tests and local development against a mock
    /// provider.
    pub fn for_testing() -> Self {
        Self {
            provider_url: Url::parse("http://localhost:9999").expect("static URL"),
            anon_key: "test-anon-key".to_string(),
            base_url: Url::parse("http://localhost:3000").expect("static URL"),
            cookie_secure: false,
        }
    }
}
