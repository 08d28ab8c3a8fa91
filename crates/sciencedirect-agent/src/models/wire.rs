//! Wire schema for the ScienceDirect search and article retrieval APIs.
//!
//! The provider is loose about types: `dc:creator` arrives as a string, a
//! list, a `{"$": ...}` object or a list of those, depending on endpoint and
//! result. Everything textual goes through [`TextValue`] and is only trusted
//! after conversion into [`ArticleRecord`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use super::ArticleRecord;
use crate::error::ClientError;

/// Title used when the provider omits one.
const UNTITLED: &str = "No title";

/// A text field in any of the shapes the provider emits.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    /// Plain string.
    Text(String),
    /// List of values.
    List(Vec<TextValue>),
    /// `{"@_fa": "true", "$": "..."}` object.
    Tagged {
        /// Text content.
        #[serde(rename = "$")]
        value: String,
    },
    /// Anything else (numbers, unknown objects); carries no text.
    Other(Value),
}

impl TextValue {
    /// All non-empty strings, flattened in order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    /// First non-empty string.
    #[must_use]
    pub fn first(&self) -> Option<String> {
        self.values().into_iter().next()
    }

    fn collect_into(&self, out: &mut Vec<String>) {
        match self {
            Self::Text(text) | Self::Tagged { value: text } => {
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            Self::List(items) => {
                for item in items {
                    item.collect_into(out);
                }
            }
            Self::Other(_) => {}
        }
    }
}

/// Hyperlink attached to an entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Link {
    /// Link relation (`self`, `scidir`, ...). Search uses `@ref`, retrieval uses `@rel`.
    #[serde(rename = "@ref", alias = "@rel", default)]
    pub rel: Option<String>,

    /// Target URL.
    #[serde(rename = "@href", default)]
    pub href: Option<String>,
}

/// One search entry or the `coredata` block of a retrieval response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(rename = "dc:title", default)]
    pub title: Option<TextValue>,

    #[serde(rename = "dc:creator", default)]
    pub creator: Option<TextValue>,

    #[serde(rename = "prism:teaser", default)]
    pub teaser: Option<TextValue>,

    #[serde(rename = "dc:description", default)]
    pub description: Option<TextValue>,

    #[serde(rename = "prism:doi", default)]
    pub doi: Option<TextValue>,

    #[serde(default)]
    pub pii: Option<TextValue>,

    #[serde(rename = "dc:identifier", default)]
    pub identifier: Option<TextValue>,

    #[serde(rename = "prism:publicationName", default)]
    pub publication_name: Option<TextValue>,

    #[serde(rename = "prism:coverDate", default)]
    pub cover_date: Option<TextValue>,

    #[serde(default)]
    pub link: Vec<Link>,

    /// Set on the placeholder entry of an empty result set.
    #[serde(default)]
    pub error: Option<String>,
}

fn first(value: Option<&TextValue>) -> Option<String> {
    value.and_then(TextValue::first)
}

fn preferred_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref() == Some("scidir"))
        .or_else(|| links.first())
        .and_then(|l| l.href.clone())
}

impl TryFrom<RawArticle> for ArticleRecord {
    type Error = ClientError;

    fn try_from(raw: RawArticle) -> Result<Self, Self::Error> {
        if let Some(message) = raw.error {
            return Err(ClientError::parse(format!("provider error entry: {message}")));
        }

        let pii = first(raw.pii.as_ref());
        let doi = first(raw.doi.as_ref());
        let identifier = pii
            .clone()
            .or_else(|| doi.clone())
            .or_else(|| first(raw.identifier.as_ref()))
            .ok_or_else(|| ClientError::parse("entry has no PII, DOI or dc:identifier"))?;

        Ok(Self {
            title: first(raw.title.as_ref()).unwrap_or_else(|| UNTITLED.to_string()),
            authors: raw.creator.map(|c| c.values()).unwrap_or_default(),
            r#abstract: first(raw.teaser.as_ref()).or_else(|| first(raw.description.as_ref())),
            identifier,
            link: preferred_link(&raw.link),
            doi,
            pii,
            publication_name: first(raw.publication_name.as_ref()),
            publication_date: first(raw.cover_date.as_ref()),
        })
    }
}

/// Response of `GET /search/sciencedirect`.
///
/// Any JSON body deserializes. A missing or malformed `search-results`
/// object reads as an empty page.
#[derive(Debug, Default)]
pub struct SearchResponse {
    pub search_results: SearchResults,
}

impl<'de> Deserialize<'de> for SearchResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut body = Value::deserialize(deserializer)?;

        let search_results = match body.get_mut("search-results").map(Value::take) {
            None | Some(Value::Null) => {
                debug!("Response has no search-results");
                SearchResults::default()
            }
            Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_else(|err| {
                warn!(error = %err, "Ignoring malformed search-results");
                SearchResults::default()
            }),
            Some(other) => {
                warn!(found = json_type(&other), "Ignoring malformed search-results");
                SearchResults::default()
            }
        };

        Ok(Self { search_results })
    }
}

/// The `search-results` object.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    /// Total hits; the provider sends it as a string.
    #[serde(rename = "opensearch:totalResults", default)]
    pub total_results: Option<Value>,

    /// Raw entries, validated one by one. Anything but an array reads as empty.
    #[serde(default, deserialize_with = "entry_list")]
    pub entry: Vec<Value>,
}

fn entry_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => {
            warn!(found = json_type(&other), "Ignoring malformed entry list");
            Ok(Vec::new())
        }
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl SearchResults {
    /// Total number of hits reported by the provider.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        match self.total_results.as_ref()? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}

impl SearchResponse {
    /// Validate entries into at most `limit` records.
    ///
    /// Entries that cannot be validated are skipped, so a partly malformed
    /// page still yields its good records, and an empty page yields none.
    #[must_use]
    pub fn into_articles(self, limit: usize) -> Vec<ArticleRecord> {
        let total = self.search_results.total();
        let mut articles = Vec::with_capacity(limit.min(self.search_results.entry.len()));

        for (index, value) in self.search_results.entry.into_iter().enumerate() {
            if articles.len() >= limit {
                break;
            }

            let raw = match serde_json::from_value::<RawArticle>(value) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(index, error = %err, "Skipping malformed search entry");
                    continue;
                }
            };

            if let Some(message) = &raw.error {
                debug!(index, message = %message, "Provider reported an empty result set");
                continue;
            }

            match ArticleRecord::try_from(raw) {
                Ok(article) => articles.push(article),
                Err(err) => warn!(index, error = %err, "Skipping search entry"),
            }
        }

        debug!(total = ?total, returned = articles.len(), "Parsed search results");
        articles
    }
}

/// Response of `GET /article/pii/{pii}`.
#[derive(Debug, Deserialize)]
pub struct ArticleResponse {
    #[serde(rename = "full-text-retrieval-response")]
    pub full_text: FullTextResponse,
}

/// The `full-text-retrieval-response` object.
#[derive(Debug, Deserialize)]
pub struct FullTextResponse {
    pub coredata: RawArticle,
}

impl ArticleResponse {
    /// Validate the core metadata into a record.
    pub fn into_article(self) -> Result<ArticleRecord, ClientError> {
        ArticleRecord::try_from(self.full_text.coredata)
    }
}
