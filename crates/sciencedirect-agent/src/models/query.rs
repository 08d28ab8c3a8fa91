//! Search query validation.

use crate::config::api;
use crate::error::ValidationError;

/// Clamp a requested result count to what the search API accepts.
#[must_use]
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, api::MAX_RESULTS)
}

/// A validated search request: non-empty text and a clamped limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    limit: u32,
    offset: Option<u32>,
}

impl SearchQuery {
    /// Build a query, trimming the text and clamping `limit` to `[1, 200]`.
    pub fn new(text: &str, limit: u32) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::new("query", "cannot be empty"));
        }

        Ok(Self { text: text.to_string(), limit: clamp_limit(limit), offset: None })
    }

    /// Start from the given result offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Maximum number of records to return.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Pagination offset.
    #[must_use]
    pub const fn offset(&self) -> Option<u32> {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        let query = SearchQuery::new("  diabetes treatment \n", 5).unwrap();
        assert_eq!(query.text(), "diabetes treatment");
        assert_eq!(query.limit(), 5);
        assert_eq!(query.offset(), None);
    }

    #[test]
    fn test_blank_query_is_rejected() {
        let err = SearchQuery::new(" \t ", 5).unwrap_err();
        assert_eq!(err.field, "query");
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(SearchQuery::new("q", 0).unwrap().limit(), 1);
        assert_eq!(SearchQuery::new("q", 500).unwrap().limit(), 200);
        assert_eq!(SearchQuery::new("q", 200).unwrap().limit(), 200);
    }

    #[test]
    fn test_offset() {
        let query = SearchQuery::new("q", 10).unwrap().with_offset(20);
        assert_eq!(query.offset(), Some(20));
    }
}
