//! Research agent: search, then answer from what was found.
//!
//! One question costs at most two sequential calls: the search provider,
//! then the language model. When the search finds nothing the model is not
//! called at all.

mod chat;
mod prompt;

pub use chat::{EXIT_COMMANDS, is_exit_command, run_chat};
pub use prompt::{
    ABSTRACT_EXCERPT_CHARS, PROMPT_AUTHORS, SYSTEM_PROMPT, build_prompt, split_summary,
};

use std::sync::Arc;

use tracing::{info, instrument};

use crate::client::{ArticleSearch, ScienceDirectClient};
use crate::config::Config;
use crate::error::{AgentError, AgentResult, ConfigError, ValidationError};
use crate::llm::{LanguageModel, OpenAiClient};
use crate::models::{AnswerResult, SearchQuery};

/// Answers questions from ScienceDirect search results.
pub struct ResearchAgent {
    search: Arc<dyn ArticleSearch>,
    model: Arc<dyn LanguageModel>,
}

impl ResearchAgent {
    /// Create an agent from explicit search and model implementations.
    #[must_use]
    pub fn new(search: Arc<dyn ArticleSearch>, model: Arc<dyn LanguageModel>) -> Self {
        Self { search, model }
    }

    /// Create an agent backed by ScienceDirect and the configured chat model.
    ///
    /// Both credentials are checked before either client is built.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let search = ScienceDirectClient::new(config)?;
        let model = OpenAiClient::new(config)?;
        Ok(Self::new(Arc::new(search), Arc::new(model)))
    }

    /// Answer `question` from at most `max_articles` search results.
    ///
    /// The returned citations are exactly the articles placed in the prompt,
    /// in prompt order.
    #[instrument(skip(self), fields(model = self.model.model_name()))]
    pub async fn answer(&self, question: &str, max_articles: u32) -> AgentResult<AnswerResult> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::new("question", "cannot be empty").into());
        }

        // The question is the query; no rewriting.
        let query = SearchQuery::new(question, max_articles)?;
        let mut articles = self.search.search(&query).await.map_err(AgentError::Search)?;
        articles.truncate(query.limit() as usize);

        if articles.is_empty() {
            info!("No articles found; skipping language model");
            return Ok(AnswerResult::no_sources());
        }

        let user_prompt = build_prompt(question, &articles);
        let completion = self
            .model
            .complete(SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(AgentError::Model)?;
        let (answer, summary) = split_summary(&completion);

        info!(citations = articles.len(), has_summary = summary.is_some(), "Answer generated");
        Ok(AnswerResult::new(answer, articles).with_summary(summary))
    }
}

impl std::fmt::Debug for ResearchAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchAgent").field("model", &self.model.model_name()).finish()
    }
}
