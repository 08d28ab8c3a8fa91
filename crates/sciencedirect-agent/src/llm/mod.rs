//! Language-model providers.

mod openai;

pub use openai::OpenAiClient;

use crate::error::ClientResult;

/// A hosted model that turns a system prompt and a user prompt into text.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for logs.
    fn model_name(&self) -> &str;

    /// Run one completion and return the generated text.
    async fn complete(&self, system: &str, prompt: &str) -> ClientResult<String>;
}
