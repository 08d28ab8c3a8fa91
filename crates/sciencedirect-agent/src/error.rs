//! Error types for the ScienceDirect research agent.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Every error can be classified into an [`ErrorKind`] so callers can tell
//! "no results" apart from "could not reach the provider".

use std::time::Duration;

/// Hint appended to upstream failures when debug mode is off.
const DEBUG_HINT: &str = "Enable debug mode (--debug) for details.";

/// Coarse error classification used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid credential or setting.
    Configuration,
    /// Rejected user input (empty query, empty identifier).
    Validation,
    /// Provider could not be reached.
    Network,
    /// Provider answered with a non-success status.
    Upstream,
    /// Provider answered with an unexpected body.
    Parse,
    /// Provider rejected the credentials.
    Auth,
}

/// Input rejected before any request is made.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid input for '{field}': {message}")]
pub struct ValidationError {
    /// Field that failed validation
    pub field: &'static str,
    /// Validation error message
    pub message: String,
}

impl ValidationError {
    /// Create a validation error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Configuration errors, always raised before any network call.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required credential is absent.
    #[error("{name} is required. Set {env_var} in .env or pass it on the command line")]
    MissingCredential {
        /// Human-readable credential name
        name: &'static str,
        /// Environment variable that supplies it
        env_var: &'static str,
    },

    /// A credential cannot be sent as an HTTP header.
    #[error("Invalid {name}: {reason}")]
    InvalidCredential {
        /// Human-readable credential name
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// A configured endpoint is not a valid URL.
    #[error("Invalid {name} '{value}': {source}")]
    InvalidUrl {
        /// Setting name
        name: &'static str,
        /// Rejected value
        value: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl ConfigError {
    /// Create a missing credential error.
    #[must_use]
    pub const fn missing(name: &'static str, env_var: &'static str) -> Self {
        Self::MissingCredential { name, env_var }
    }

    /// Create an invalid credential error.
    #[must_use]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidCredential { name, reason: reason.into() }
    }
}

/// Errors from one call to an external provider.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error (retry layer)
    #[error("Network error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Input rejected before the request was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Credentials rejected (401/403 response)
    #[error("Authentication failed with status {status}")]
    Auth {
        /// HTTP status code
        status: u16,
        /// Raw response body
        message: String,
    },

    /// Rate limited by the provider (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
        /// Raw response body
        message: String,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
        /// Raw response body
        message: String,
    },

    /// Any other non-success status
    #[error("Upstream request failed with status {status}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Raw response body
        message: String,
    },

    /// Response body does not have the expected shape
    #[error("Failed to parse response: {message}")]
    Parse {
        /// Parser error or description of the missing field
        message: String,
    },
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64, message: impl Into<String>) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds), message: message.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into(), message: message.into() }
    }

    /// Create an authentication error.
    #[must_use]
    pub fn auth(status: u16, message: impl Into<String>) -> Self {
        Self::Auth { status, message: message.into() }
    }

    /// Create an upstream status error.
    #[must_use]
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream { status, message: message.into() }
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }

    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Middleware(_) => ErrorKind::Network,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::RateLimited { .. } | Self::NotFound { .. } | Self::Upstream { .. } => {
                ErrorKind::Upstream
            }
            Self::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Middleware(_) | Self::RateLimited { .. } => true,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// Raw payload reported by the provider, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Auth { message, .. }
            | Self::RateLimited { message, .. }
            | Self::NotFound { message, .. }
            | Self::Upstream { message, .. }
            | Self::Parse { message } => Some(message.as_str()).filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Convert to a message for the terminal.
    ///
    /// The raw upstream payload is only included when `debug` is set.
    #[must_use]
    pub fn to_user_message(&self, debug: bool) -> String {
        let summary = match self {
            Self::Http(_) | Self::Middleware(_) => {
                return format!("Could not reach the provider: {self}");
            }
            Self::Validation(err) => return err.to_string(),
            Self::Auth { status, .. } => {
                format!("Invalid API key or authentication failed (status {status}).")
            }
            Self::RateLimited { retry_after, .. } => {
                format!("Rate limit exceeded. Please wait {retry_after:?} before retrying.")
            }
            Self::NotFound { resource, .. } => format!("Not found: {resource}."),
            Self::Upstream { status, .. } => format!("API request failed with status {status}."),
            // Shape mismatches are reported as an upstream failure.
            Self::Parse { .. } => "The provider returned an unexpected response.".to_string(),
        };

        match (debug, self.detail()) {
            (true, Some(detail)) => format!("{summary}\nDebug: {detail}"),
            (true, None) => summary,
            (false, _) => format!("{summary} {DEBUG_HINT}"),
        }
    }
}

/// Errors from the answer agent.
#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    /// The question was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The search provider call failed
    #[error("Search failed: {0}")]
    Search(#[source] ClientError),

    /// The language model call failed
    #[error("Language model call failed: {0}")]
    Model(#[source] ClientError),
}

impl AgentError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Search(err) | Self::Model(err) => err.kind(),
        }
    }

    /// Convert to a message for the terminal.
    #[must_use]
    pub fn to_user_message(&self, debug: bool) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Search(err) => format!("Search failed: {}", err.to_user_message(debug)),
            Self::Model(err) => {
                format!("Language model call failed: {}", err.to_user_message(debug))
            }
        }
    }
}

/// Top-level error for a CLI invocation.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Rejected input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Direct provider call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Answer agent failed
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Terminal I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be rendered
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Classify this error; I/O and serialization failures count as configuration-level faults.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => ErrorKind::Configuration,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Client(err) => err.kind(),
            Self::Agent(err) => err.kind(),
        }
    }

    /// Convert to a message for the terminal.
    #[must_use]
    pub fn to_user_message(&self, debug: bool) -> String {
        match self {
            Self::Client(err) => err.to_user_message(debug),
            Self::Agent(err) => err.to_user_message(debug),
            other => other.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
