//! OpenAI-compatible chat-completions client.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::LanguageModel;
use crate::client::{base_url, build_client, read_json, secret_header};
use crate::config::Config;
use crate::error::{ClientError, ClientResult, ConfigError};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for `POST {base}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiClient {
    client: ClientWithMiddleware,
    completions_url: String,
    model: String,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.require_openai_key()?;
        let base = base_url("language model API URL", &config.llm_api_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {api_key}");
        headers.insert(AUTHORIZATION, secret_header("OpenAI API key", &bearer)?);

        Ok(Self {
            client: build_client(headers, config)?,
            completions_url: format!("{base}/chat/completions"),
            model: config.model.clone(),
        })
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> ClientResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
        };
        let body = serde_json::to_string(&request)?;

        debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting completion");

        let response = self.client.post(&self.completions_url).body(body).send().await?;
        let completion: ChatCompletionResponse = read_json(response).await?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ClientError::parse("completion has no message content"))?;

        info!(model = %self.model, answer_chars = text.len(), "Completion received");
        Ok(text)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("completions_url", &self.completions_url)
            .field("model", &self.model)
            .finish()
    }
}
