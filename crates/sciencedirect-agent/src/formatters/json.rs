//! JSON output for scripting.

use serde_json::{Value, json};

use crate::models::{AnswerResult, ArticleRecord};

/// Compact article representation; absent fields are omitted.
#[must_use]
pub fn compact_article(article: &ArticleRecord) -> Value {
    let mut obj = json!({
        "id": article.identifier,
        "title": article.title,
        "authors": article.authors,
    });

    if let Some(journal) = &article.publication_name {
        obj["journal"] = json!(journal);
    }

    if let Some(date) = &article.publication_date {
        obj["date"] = json!(date);
    }

    if let Some(doi) = &article.doi {
        obj["doi"] = json!(doi);
    }

    if let Some(link) = &article.link {
        obj["link"] = json!(link);
    }

    if let Some(text) = &article.r#abstract {
        obj["abstract"] = json!(text);
    }

    obj
}

/// Search results as JSON.
#[must_use]
pub fn articles_json(query: &str, articles: &[ArticleRecord]) -> Value {
    json!({
        "query": query,
        "count": articles.len(),
        "articles": articles.iter().map(compact_article).collect::<Vec<_>>(),
    })
}

/// An answer and its citations as JSON.
#[must_use]
pub fn answer_json(question: &str, result: &AnswerResult) -> Value {
    json!({
        "question": question,
        "answer": result.answer,
        "summary": result.summary,
        "sourcesFound": result.sources_found,
        "citations": result.citations.iter().map(compact_article).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_article_omits_missing_fields() {
        let mut article = ArticleRecord::new("Test Article", "S0000000000000");
        article.authors = vec!["Author One".to_string()];
        article.doi = Some("10.1234/test.doi".to_string());

        let compact = compact_article(&article);

        assert_eq!(compact["id"], "S0000000000000");
        assert_eq!(compact["title"], "Test Article");
        assert_eq!(compact["authors"], json!(["Author One"]));
        assert_eq!(compact["doi"], "10.1234/test.doi");
        assert!(compact.get("journal").is_none());
        assert!(compact.get("abstract").is_none());
    }

    #[test]
    fn test_answer_json_keeps_citation_order() {
        let result = AnswerResult::new(
            "Answer [1][2]",
            vec![ArticleRecord::new("A", "S1"), ArticleRecord::new("B", "S2")],
        );
        let value = answer_json("q", &result);

        assert_eq!(value["sourcesFound"], true);
        assert_eq!(value["citations"][0]["id"], "S1");
        assert_eq!(value["citations"][1]["id"], "S2");
        assert!(value["summary"].is_null());
    }

    #[test]
    fn test_answer_json_includes_summary() {
        let result = AnswerResult::new("Answer [1]", vec![ArticleRecord::new("A", "S1")])
            .with_summary(Some("Brief.".to_string()));
        assert_eq!(answer_json("q", &result)["summary"], "Brief.");
    }
}
