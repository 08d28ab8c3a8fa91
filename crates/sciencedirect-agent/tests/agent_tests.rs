//! Research agent tests with stub providers and with mocked HTTP providers.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sciencedirect_agent::agent::{ResearchAgent, SYSTEM_PROMPT, run_chat};
use sciencedirect_agent::client::ArticleSearch;
use sciencedirect_agent::config::Config;
use sciencedirect_agent::error::{AgentError, ClientError, ClientResult, ErrorKind};
use sciencedirect_agent::llm::LanguageModel;
use sciencedirect_agent::models::{ArticleRecord, NO_SOURCES_MESSAGE, SearchQuery};

// =============================================================================
// Stubs
// =============================================================================

#[derive(Default)]
struct StubSearch {
    articles: Vec<ArticleRecord>,
    fail_with: Option<u16>,
    calls: AtomicUsize,
    last_query: Mutex<Option<SearchQuery>>,
}

impl StubSearch {
    fn returning(articles: Vec<ArticleRecord>) -> Self {
        Self { articles, ..Self::default() }
    }

    fn failing(status: u16) -> Self {
        Self { fail_with: Some(status), ..Self::default() }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ArticleSearch for StubSearch {
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<ArticleRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());

        match self.fail_with {
            Some(status) => Err(ClientError::upstream(status, "search down")),
            None => Ok(self.articles.clone()),
        }
    }
}

struct StubModel {
    // None answers with an auth failure.
    reply: Option<String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<(String, String)>>,
}

impl StubModel {
    fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    fn unauthorized() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LanguageModel for StubModel {
    fn model_name(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, system: &str, prompt: &str) -> ClientResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some((system.to_string(), prompt.to_string()));

        self.reply.clone().ok_or_else(|| ClientError::auth(401, "bad key"))
    }
}

fn article(id: &str, title: &str) -> ArticleRecord {
    let mut article = ArticleRecord::new(title, id);
    article.authors = vec!["Smith, J.".to_string()];
    article.r#abstract = Some(format!("Abstract of {title}"));
    article
}

fn agent(search: &Arc<StubSearch>, model: &Arc<StubModel>) -> ResearchAgent {
    ResearchAgent::new(search.clone(), model.clone())
}

// =============================================================================
// Answering
// =============================================================================

#[tokio::test]
async fn test_no_results_skips_model() {
    let search = Arc::new(StubSearch::returning(vec![]));
    let model = Arc::new(StubModel::replying("should not be used"));

    let result = agent(&search, &model).answer("xyzzy nonexistent topic", 5).await.unwrap();

    assert!(!result.sources_found);
    assert!(result.citations.is_empty());
    assert_eq!(result.answer, NO_SOURCES_MESSAGE);
    assert_eq!(result.summary, None);
    assert_eq!(search.calls(), 1);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_citations_are_the_articles_in_the_prompt() {
    let search = Arc::new(StubSearch::returning(vec![
        article("S1", "Metformin tolerance"),
        article("S2", "Lactic acidosis risk"),
    ]));
    let model = Arc::new(StubModel::replying("Gastrointestinal effects are common [1]."));

    let result = agent(&search, &model)
        .answer("What are the side effects of metformin?", 3)
        .await
        .unwrap();

    assert!(result.sources_found);
    assert_eq!(result.answer, "Gastrointestinal effects are common [1].");
    assert_eq!(result.citation_ids(), vec!["S1", "S2"]);
    assert_eq!(model.calls(), 1);

    let (system, prompt) = model.last_prompt.lock().unwrap().clone().unwrap();
    assert_eq!(system, SYSTEM_PROMPT);
    assert!(prompt.contains("What are the side effects of metformin?"));
    let first = prompt.find("Metformin tolerance").unwrap();
    let second = prompt.find("Lactic acidosis risk").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_closing_summary_is_split_from_answer() {
    let search = Arc::new(StubSearch::returning(vec![article("S1", "Metformin tolerance")]));
    let model = Arc::new(StubModel::replying(
        "GI upset is the most common effect [1].\n\nSummary: Mostly mild GI effects.",
    ));

    let result = agent(&search, &model).answer("metformin side effects", 3).await.unwrap();

    assert_eq!(result.answer, "GI upset is the most common effect [1].");
    assert_eq!(result.summary.as_deref(), Some("Mostly mild GI effects."));
    assert_eq!(result.citation_ids(), vec!["S1"]);
}

#[tokio::test]
async fn test_citations_capped_at_max_articles() {
    let articles = (1..=6).map(|i| article(&format!("S{i}"), &format!("Title {i}"))).collect();
    let search = Arc::new(StubSearch::returning(articles));
    let model = Arc::new(StubModel::replying("answer"));

    let result = agent(&search, &model).answer("question", 3).await.unwrap();

    assert_eq!(result.citation_ids(), vec!["S1", "S2", "S3"]);
    let (_, prompt) = model.last_prompt.lock().unwrap().clone().unwrap();
    assert!(!prompt.contains("Title 4"));
}

#[tokio::test]
async fn test_question_is_the_search_query() {
    let search = Arc::new(StubSearch::returning(vec![article("S1", "T")]));
    let model = Arc::new(StubModel::replying("answer"));

    agent(&search, &model).answer("  CRISPR off-target effects  ", 1000).await.unwrap();

    let query = search.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.text(), "CRISPR off-target effects");
    assert_eq!(query.limit(), 200);
}

#[tokio::test]
async fn test_empty_question_is_rejected_without_calls() {
    let search = Arc::new(StubSearch::returning(vec![article("S1", "T")]));
    let model = Arc::new(StubModel::replying("answer"));

    let err = agent(&search, &model).answer("   ", 5).await.unwrap_err();

    assert!(matches!(err, AgentError::Validation(_)), "got {err:?}");
    assert_eq!(search.calls(), 0);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_search_failure_propagates_without_model_call() {
    let search = Arc::new(StubSearch::failing(500));
    let model = Arc::new(StubModel::replying("answer"));

    let err = agent(&search, &model).answer("question", 5).await.unwrap_err();

    assert!(matches!(err, AgentError::Search(_)), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_model_failure_propagates() {
    let search = Arc::new(StubSearch::returning(vec![article("S1", "T")]));
    let model = Arc::new(StubModel::unauthorized());

    let err = agent(&search, &model).answer("question", 5).await.unwrap_err();

    assert!(matches!(err, AgentError::Model(_)), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.to_user_message(false).starts_with("Language model call failed"));
}

// =============================================================================
// Chat loop
// =============================================================================

#[tokio::test]
async fn test_chat_answers_until_exit() {
    let search = Arc::new(StubSearch::returning(vec![article("S1", "Metformin tolerance")]));
    let model = Arc::new(StubModel::replying("Chat answer [1]."));
    let agent = agent(&search, &model);

    let input: &[u8] = b"What is metformin?\n\n   \nQUIT\nnever asked\n";
    let mut output = Vec::new();

    let answered = run_chat(&agent, 5, false, input, &mut output).await.unwrap();
    let output = String::from_utf8(output).unwrap();

    assert_eq!(answered, 1);
    assert_eq!(search.calls(), 1);
    assert!(output.contains("Scientific Research Assistant"));
    assert!(output.contains("Chat answer [1]."));
    assert!(output.contains("[1] Metformin tolerance"));
    assert!(output.contains("Goodbye!"));
}

#[tokio::test]
async fn test_chat_ends_at_end_of_input() {
    let search = Arc::new(StubSearch::returning(vec![article("S1", "T")]));
    let model = Arc::new(StubModel::replying("answer"));
    let agent = agent(&search, &model);

    let input: &[u8] = b"first question\nsecond question";
    let mut output = Vec::new();

    let answered = run_chat(&agent, 5, false, input, &mut output).await.unwrap();

    assert_eq!(answered, 2);
    assert_eq!(model.calls(), 2);
    assert!(!String::from_utf8(output).unwrap().contains("Goodbye!"));
}

#[tokio::test]
async fn test_chat_reports_failed_turn_and_continues() {
    let search = Arc::new(StubSearch::failing(500));
    let model = Arc::new(StubModel::replying("answer"));
    let agent = agent(&search, &model);

    let input: &[u8] = b"first\nsecond\nexit\n";
    let mut output = Vec::new();

    let answered = run_chat(&agent, 5, false, input, &mut output).await.unwrap();
    let output = String::from_utf8(output).unwrap();

    assert_eq!(answered, 0);
    assert_eq!(search.calls(), 2);
    assert_eq!(output.matches("Error: ").count(), 2);
    assert!(output.contains("Goodbye!"));
}

// =============================================================================
// End to end over HTTP
// =============================================================================

fn search_body() -> serde_json::Value {
    json!({
        "search-results": {
            "opensearch:totalResults": "2",
            "entry": [
                {
                    "dc:title": "Metformin tolerance",
                    "pii": "S0001",
                    "dc:creator": "Smith, J.",
                    "prism:teaser": "GI effects."
                },
                {"dc:title": "Lactic acidosis", "pii": "S0002", "dc:creator": {"$": "Doe, A."}}
            ]
        }
    })
}

#[tokio::test]
async fn test_end_to_end_with_mocked_providers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content/search/sciencedirect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "Mostly GI effects [1], rarely acidosis [2]."
            }}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let agent = ResearchAgent::from_config(&Config::for_testing(&mock_server.uri())).unwrap();
    let result = agent.answer("What are the side effects of metformin?", 3).await.unwrap();

    assert_eq!(result.answer, "Mostly GI effects [1], rarely acidosis [2].");
    assert_eq!(result.citation_ids(), vec!["S0001", "S0002"]);
    assert_eq!(result.citations[1].authors, vec!["Doe, A."]);
}

#[tokio::test]
async fn test_end_to_end_empty_search_never_calls_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content/search/sciencedirect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search-results": {
                "opensearch:totalResults": "0",
                "entry": [{"error": "Result set was empty"}]
            }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let agent = ResearchAgent::from_config(&Config::for_testing(&mock_server.uri())).unwrap();
    let result = agent.answer("xyzzy", 5).await.unwrap();

    assert!(!result.sources_found);
}

#[tokio::test]
async fn test_end_to_end_malformed_entry_list_is_no_sources() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content/search/sciencedirect"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"search-results": {"entry": null}})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let agent = ResearchAgent::from_config(&Config::for_testing(&mock_server.uri())).unwrap();
    let result = agent.answer("metformin", 3).await.unwrap();

    assert!(!result.sources_found);
    assert!(result.citations.is_empty());
}

#[test]
fn test_agent_requires_both_credentials() {
    let mut config = Config::for_testing("http://localhost:9");
    config.openai_api_key = None;

    assert!(ResearchAgent::from_config(&config).is_err());
}
