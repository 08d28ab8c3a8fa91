//! Configuration for the ScienceDirect research agent.
//!
//! Credentials are resolved once at startup from the process environment
//! (optionally pre-loaded from `.env`), then CLI overrides are applied.
//! The resulting [`Config`] is passed by reference to both clients.

use std::time::Duration;

use crate::error::ConfigError;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Elsevier content APIs.
    pub const ELSEVIER_BASE_URL: &str = "https://api.elsevier.com/content";

    /// Base URL for the OpenAI API.
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

    /// Model used when `DEFAULT_MODEL` is unset.
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    /// Maximum results per ScienceDirect search request.
    pub const MAX_RESULTS: u32 = 200;

    /// Default number of articles per search or question.
    pub const DEFAULT_LIMIT: u32 = 5;

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Retries on transient network or 5xx failures.
    pub const MAX_RETRIES: u32 = 2;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 4;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Environment variable names.
pub mod env {
    /// Elsevier API key (required).
    pub const ELSEVIER_API_KEY: &str = "ELSEVIER_API_KEY";

    /// Elsevier institutional token (optional).
    pub const ELSEVIER_INST_TOKEN: &str = "ELSEVIER_INST_TOKEN";

    /// Elsevier authentication token (optional).
    pub const ELSEVIER_AUTH_TOKEN: &str = "ELSEVIER_AUTH_TOKEN";

    /// OpenAI API key (required for answers).
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

    /// OpenAI-compatible base URL.
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

    /// Chat model name.
    pub const DEFAULT_MODEL: &str = "DEFAULT_MODEL";

    /// Debug switch (`true`, `1` or `yes`).
    pub const DEBUG: &str = "DEBUG";
}

/// Values given on the command line that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Elsevier API key.
    pub api_key: Option<String>,

    /// Elsevier institutional token.
    pub inst_token: Option<String>,

    /// Debug mode.
    pub debug: bool,
}

/// Runtime configuration.
#[derive(Clone)]
pub struct Config {
    /// Elsevier API key (required for searches).
    pub elsevier_api_key: Option<String>,

    /// Elsevier institutional token (optional).
    pub inst_token: Option<String>,

    /// Elsevier authentication token (optional).
    pub auth_token: Option<String>,

    /// OpenAI API key (required for answers).
    pub openai_api_key: Option<String>,

    /// Chat model name.
    pub model: String,

    /// Base URL for the Elsevier content APIs (for testing with mock servers).
    pub search_api_url: String,

    /// Base URL for the chat-completions API (for testing with mock servers).
    pub llm_api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retries on transient failures.
    pub max_retries: u32,

    /// Debug mode: verbose logs and raw upstream payloads in error messages.
    pub debug: bool,
}

impl Config {
    /// Create a configuration with the two required credentials and default settings.
    #[must_use]
    pub fn new(elsevier_api_key: Option<String>, openai_api_key: Option<String>) -> Self {
        Self {
            elsevier_api_key: non_empty(elsevier_api_key),
            inst_token: None,
            auth_token: None,
            openai_api_key: non_empty(openai_api_key),
            model: api::DEFAULT_MODEL.to_string(),
            search_api_url: api::ELSEVIER_BASE_URL.to_string(),
            llm_api_url: api::OPENAI_BASE_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: api::MAX_RETRIES,
            debug: false,
        }
    }

    /// Create a test configuration pointing both providers at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            elsevier_api_key: Some("test-elsevier-key".to_string()),
            inst_token: None,
            auth_token: None,
            openai_api_key: Some("test-openai-key".to_string()),
            model: api::DEFAULT_MODEL.to_string(),
            search_api_url: format!("{}/content", base_url),
            llm_api_url: format!("{}/v1", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0, // Fail fast in tests
            debug: false,
        }
    }

    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup(env::ELSEVIER_API_KEY), lookup(env::OPENAI_API_KEY));
        config.inst_token = non_empty(lookup(env::ELSEVIER_INST_TOKEN));
        config.auth_token = non_empty(lookup(env::ELSEVIER_AUTH_TOKEN));

        if let Some(model) = non_empty(lookup(env::DEFAULT_MODEL)) {
            config.model = normalize_model(&model);
        }
        if let Some(url) = non_empty(lookup(env::OPENAI_BASE_URL)) {
            config.llm_api_url = url.trim_end_matches('/').to_string();
        }
        config.debug = lookup(env::DEBUG).is_some_and(|v| parse_flag(&v));
        config
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(key) = non_empty(overrides.api_key) {
            self.elsevier_api_key = Some(key);
        }
        if let Some(token) = non_empty(overrides.inst_token) {
            self.inst_token = Some(token);
        }
        self.debug |= overrides.debug;
        self
    }

    /// Elsevier API key, or a configuration error if it is absent.
    pub fn require_elsevier_key(&self) -> Result<&str, ConfigError> {
        self.elsevier_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::missing("Elsevier API key", env::ELSEVIER_API_KEY))
    }

    /// OpenAI API key, or a configuration error if it is absent.
    pub fn require_openai_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::missing("OpenAI API key", env::OPENAI_API_KEY))
    }

    /// Check that both required credentials are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.require_elsevier_key()?;
        self.require_openai_key()?;
        Ok(())
    }

    /// Status of every credential, with values masked.
    #[must_use]
    pub fn credential_status(&self) -> Vec<CredentialStatus> {
        vec![
            CredentialStatus::new(
                "Elsevier API Key",
                env::ELSEVIER_API_KEY,
                true,
                self.elsevier_api_key.as_deref().map(mask_secret),
            ),
            CredentialStatus::new(
                "Institutional Token",
                env::ELSEVIER_INST_TOKEN,
                false,
                self.inst_token.as_ref().map(|_| "Set".to_string()),
            ),
            CredentialStatus::new(
                "Auth Token",
                env::ELSEVIER_AUTH_TOKEN,
                false,
                self.auth_token.as_ref().map(|_| "Set".to_string()),
            ),
            CredentialStatus::new(
                "OpenAI API Key",
                env::OPENAI_API_KEY,
                true,
                self.openai_api_key.as_deref().map(mask_secret),
            ),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_elsevier_api_key", &self.elsevier_api_key.is_some())
            .field("has_inst_token", &self.inst_token.is_some())
            .field("has_openai_api_key", &self.openai_api_key.is_some())
            .field("model", &self.model)
            .field("search_api_url", &self.search_api_url)
            .field("llm_api_url", &self.llm_api_url)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Presence of one credential, as reported by the `config` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStatus {
    /// Display name.
    pub name: &'static str,

    /// Environment variable.
    pub env_var: &'static str,

    /// Whether commands fail without it.
    pub required: bool,

    /// Masked value, if set.
    pub display: Option<String>,
}

impl CredentialStatus {
    fn new(
        name: &'static str,
        env_var: &'static str,
        required: bool,
        display: Option<String>,
    ) -> Self {
        Self { name, env_var, required, display }
    }

    /// Whether the credential is set.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.display.is_some()
    }
}

/// Mask a secret for display: first 8 and last 4 characters of long keys, `***` otherwise.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn normalize_model(model: &str) -> String {
    model.strip_prefix("openai:").unwrap_or(model).to_string()
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
