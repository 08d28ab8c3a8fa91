//! HTTP plumbing shared by the search and language-model clients.
//!
//! Builds the reqwest client with retry middleware and maps response
//! statuses onto [`ClientError`] variants.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, trace};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult, ConfigError};

/// Build a client with default headers, timeouts and bounded retries.
pub(crate) fn build_client(
    headers: HeaderMap,
    config: &Config,
) -> Result<ClientWithMiddleware, ConfigError> {
    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    let builder = ClientBuilder::new(client);
    let builder = if config.max_retries > 0 {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_secs(8))
            .build_with_max_retries(config.max_retries);
        builder.with(RetryTransientMiddleware::new_with_policy(retry_policy))
    } else {
        builder
    };

    Ok(builder.build())
}

/// Header value for a credential, marked sensitive so it never shows in debug output.
pub(crate) fn secret_header(name: &'static str, value: &str) -> Result<HeaderValue, ConfigError> {
    let mut header =
        HeaderValue::from_str(value).map_err(|e| ConfigError::invalid(name, e.to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Validate a configured base URL and strip any trailing slash.
pub(crate) fn base_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    url::Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        source,
    })?;
    Ok(value.trim_end_matches('/').to_string())
}

/// Check the status, then decode the body as JSON.
pub(crate) async fn read_json<T>(response: reqwest::Response) -> ClientResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let response = handle_response(response).await?;
    let body = response.text().await?;
    trace!(bytes = body.len(), body = %body, "Response body");

    serde_json::from_str(&body).map_err(ClientError::from)
}

/// Map API response status codes onto error kinds.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "Response received");

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            let text = response.text().await.unwrap_or_default();

            Err(ClientError::rate_limited(retry_after, text))
        }
        401 | 403 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::auth(status.as_u16(), text))
        }
        404 => {
            let url = response.url().path().to_string();
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::not_found(url, text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::upstream(status.as_u16(), text))
        }
    }
}
