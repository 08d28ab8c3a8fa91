//! Answer returned by the research agent.

use serde::Serialize;

use super::ArticleRecord;

/// Answer text used when the search returned nothing.
pub const NO_SOURCES_MESSAGE: &str = "No relevant sources were found on ScienceDirect for this \
     question, so no answer was generated. Try rephrasing the question or using broader terms.";

/// Generated answer plus the articles the model was shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerResult {
    /// Generated answer text.
    pub answer: String,

    /// Closing summary of the findings, when the model gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Articles included in the prompt, in prompt order.
    pub citations: Vec<ArticleRecord>,

    /// False when the search returned no articles and the model was not called.
    pub sources_found: bool,
}

impl AnswerResult {
    /// Pair model output with the articles it was given.
    #[must_use]
    pub fn new(answer: impl Into<String>, citations: Vec<ArticleRecord>) -> Self {
        Self { answer: answer.into(), summary: None, citations, sources_found: true }
    }

    /// Attach the closing summary.
    #[must_use]
    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    /// The "no sources found" outcome.
    #[must_use]
    pub fn no_sources() -> Self {
        Self {
            answer: NO_SOURCES_MESSAGE.to_string(),
            summary: None,
            citations: Vec::new(),
            sources_found: false,
        }
    }

    /// Identifiers of the cited articles, in order.
    #[must_use]
    pub fn citation_ids(&self) -> Vec<&str> {
        self.citations.iter().map(|a| a.identifier.as_str()).collect()
    }
}
