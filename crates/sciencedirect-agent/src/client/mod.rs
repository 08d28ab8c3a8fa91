//! ScienceDirect API client.
//!
//! Provides an async HTTP client with:
//! - Header-carried authentication (API key, optional institutional and auth tokens)
//! - Bounded retry with exponential backoff on transient failures
//! - Schema validation of search entries into [`ArticleRecord`]s

mod middleware;

pub(crate) use middleware::{base_url, build_client, read_json, secret_header};

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ClientResult, ConfigError, ValidationError};
use crate::models::{ArticleRecord, ArticleResponse, SearchQuery, SearchResponse};

/// Anything that can turn a [`SearchQuery`] into article records.
///
/// Implemented by [`ScienceDirectClient`]; the research agent depends only on
/// this trait so it can be driven by a stub.
#[async_trait::async_trait]
pub trait ArticleSearch: Send + Sync {
    /// Run one search, returning at most `query.limit()` records.
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<ArticleRecord>>;
}

/// ScienceDirect API client.
#[derive(Clone)]
pub struct ScienceDirectClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Search endpoint.
    search_url: String,

    /// Article retrieval endpoint (PII appended).
    article_url: String,

    /// Whether an institutional token is sent.
    has_inst_token: bool,
}

impl ScienceDirectClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails before any network call when the API key is missing or unusable.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.require_elsevier_key()?;
        let base = base_url("search API URL", &config.search_api_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-els-apikey", secret_header("Elsevier API key", api_key)?);

        if let Some(ref token) = config.inst_token {
            headers.insert("x-els-insttoken", secret_header("institutional token", token)?);
        }
        if let Some(ref token) = config.auth_token {
            headers.insert("x-els-authtoken", secret_header("auth token", token)?);
        }

        let client = build_client(headers, config)?;

        Ok(Self {
            client,
            search_url: format!("{base}/search/sciencedirect"),
            article_url: format!("{base}/article/pii"),
            has_inst_token: config.inst_token.is_some(),
        })
    }

    /// Whether requests carry an institutional token.
    #[must_use]
    pub const fn has_inst_token(&self) -> bool {
        self.has_inst_token
    }

    /// Search for articles.
    ///
    /// Never returns more than `query.limit()` records. An empty result set
    /// is `Ok(vec![])`, not an error.
    pub async fn search_articles(&self, query: &SearchQuery) -> ClientResult<Vec<ArticleRecord>> {
        let mut params = vec![
            ("query", query.text().to_string()),
            ("count", query.limit().to_string()),
            ("httpAccept", "application/json".to_string()),
        ];
        if let Some(offset) = query.offset() {
            params.push(("start", offset.to_string()));
        }

        debug!(url = %self.search_url, params = ?params, "Searching articles");

        let response = self.client.get(&self.search_url).query(&params).send().await?;
        let body: SearchResponse = read_json(response).await?;
        let articles = body.into_articles(query.limit() as usize);

        info!(query = query.text(), count = articles.len(), "Search complete");
        Ok(articles)
    }

    /// Retrieve one article by its Publisher Item Identifier.
    pub async fn get_article(&self, pii: &str) -> ClientResult<ArticleRecord> {
        let pii = pii.trim();
        if pii.is_empty() {
            return Err(ValidationError::new("pii", "cannot be empty").into());
        }

        let url = format!("{}/{}", self.article_url, pii);
        debug!(url = %url, "Getting article");

        let response = self
            .client
            .get(&url)
            .query(&[("httpAccept", "application/json")])
            .send()
            .await?;
        let body: ArticleResponse = read_json(response).await?;
        body.into_article()
    }
}

#[async_trait::async_trait]
impl ArticleSearch for ScienceDirectClient {
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<ArticleRecord>> {
        self.search_articles(query).await
    }
}

impl std::fmt::Debug for ScienceDirectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScienceDirectClient")
            .field("search_url", &self.search_url)
            .field("has_inst_token", &self.has_inst_token)
            .finish()
    }
}
