//! Normalized article metadata.

use std::borrow::Cow;

use serde::Serialize;

/// One retrieved ScienceDirect article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    /// Article title, never empty.
    pub title: String,

    /// Author names in publication order.
    pub authors: Vec<String>,

    /// Teaser or abstract text.
    pub r#abstract: Option<String>,

    /// Unique external identifier (PII, else DOI, else `dc:identifier`).
    pub identifier: String,

    /// ScienceDirect landing page.
    pub link: Option<String>,

    /// Digital Object Identifier.
    pub doi: Option<String>,

    /// Publisher Item Identifier.
    pub pii: Option<String>,

    /// Journal or book title.
    pub publication_name: Option<String>,

    /// Cover date (YYYY-MM-DD).
    pub publication_date: Option<String>,
}

impl ArticleRecord {
    /// Create a record with only the mandatory fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            r#abstract: None,
            identifier: identifier.into(),
            link: None,
            doi: None,
            pii: None,
            publication_name: None,
            publication_date: None,
        }
    }

    /// Publication year, taken from the cover date.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.publication_date.as_deref().and_then(|d| d.get(..4))
    }

    /// First `max` author names joined by commas, with "et al." when more exist.
    #[must_use]
    pub fn author_summary(&self, max: usize) -> Option<String> {
        if self.authors.is_empty() {
            return None;
        }

        let mut names = self.authors.iter().take(max).cloned().collect::<Vec<_>>().join(", ");
        if self.authors.len() > max {
            names.push_str(" et al.");
        }
        Some(names)
    }

    /// Abstract cut to at most `max_chars` characters.
    #[must_use]
    pub fn abstract_excerpt(&self, max_chars: usize) -> Option<Cow<'_, str>> {
        self.r#abstract.as_deref().map(|text| truncate_chars(text, max_chars))
    }
}

/// Truncate `text` to `max_chars` characters, appending "..." when cut.
///
/// Cuts on a char boundary, so multi-byte text never panics.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}...", text[..byte_idx].trim_end())),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_with_authors(n: usize) -> ArticleRecord {
        let mut article = ArticleRecord::new("Title", "S0000");
        article.authors = (1..=n).map(|i| format!("Author {i}")).collect();
        article
    }

    #[test]
    fn test_author_summary() {
        assert_eq!(article_with_authors(0).author_summary(3), None);
        assert_eq!(
            article_with_authors(2).author_summary(3).as_deref(),
            Some("Author 1, Author 2")
        );
        assert_eq!(
            article_with_authors(4).author_summary(2).as_deref(),
            Some("Author 1, Author 2 et al.")
        );
    }

    #[test]
    fn test_year_from_cover_date() {
        let mut article = ArticleRecord::new("T", "S1");
        assert_eq!(article.year(), None);
        article.publication_date = Some("2023-06-15".to_string());
        assert_eq!(article.year(), Some("2023"));
    }

    #[test]
    fn test_serializes_every_field_by_name() {
        let mut article = ArticleRecord::new("T", "S1");
        article.r#abstract = Some("Teaser".to_string());

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["abstract"], "Teaser");
        assert_eq!(value["identifier"], "S1");
        assert!(value["doi"].is_null());
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        // Multi-byte characters must not split.
        assert_eq!(truncate_chars("αβγδε", 2), "αβ...");
    }
}
