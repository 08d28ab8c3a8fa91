//! Data models for ScienceDirect articles, queries and answers.
//!
//! Wire types mirror the loosely typed provider JSON and are validated into
//! [`ArticleRecord`] before anything downstream sees them.

mod answer;
mod article;
mod query;
mod wire;

pub use answer::{AnswerResult, NO_SOURCES_MESSAGE};
pub use article::{ArticleRecord, truncate_chars};
pub use query::{SearchQuery, clamp_limit};
pub use wire::{
    ArticleResponse, FullTextResponse, Link, RawArticle, SearchResponse, SearchResults, TextValue,
};
