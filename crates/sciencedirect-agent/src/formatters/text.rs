//! Plain terminal output.

use crate::config::Config;
use crate::models::{AnswerResult, ArticleRecord, truncate_chars};

const RULE: &str = "==================================================";

/// Characters of title shown in search listings.
const TITLE_CHARS: usize = 80;

/// Characters of abstract shown under search listings.
const ABSTRACT_CHARS: usize = 500;

/// Format search results: a numbered listing followed by abstracts.
#[must_use]
pub fn format_articles(query: &str, articles: &[ArticleRecord]) -> String {
    if articles.is_empty() {
        return "No articles found.\n".to_string();
    }

    let mut output = format!("Search Results for: {query} ({} articles)\n{RULE}\n", articles.len());

    for (i, article) in articles.iter().enumerate() {
        output.push_str(&format!("\n{}. {}\n", i + 1, truncate_chars(&article.title, TITLE_CHARS)));
        output.push_str(&format!(
            "   Authors: {}\n",
            article.author_summary(2).as_deref().unwrap_or("N/A")
        ));
        output.push_str(&format!(
            "   Journal: {}\n",
            article.publication_name.as_deref().unwrap_or("N/A")
        ));
        output.push_str(&format!("   Year: {}\n", article.year().unwrap_or("N/A")));
        output.push_str(&format!("   ID: {}\n", article.identifier));
        if let Some(link) = &article.link {
            output.push_str(&format!("   Link: {link}\n"));
        }
    }

    let with_abstracts: Vec<_> = articles
        .iter()
        .enumerate()
        .filter_map(|(i, a)| a.abstract_excerpt(ABSTRACT_CHARS).map(|text| (i + 1, &a.title, text)))
        .collect();

    if !with_abstracts.is_empty() {
        output.push_str(&format!("\n{RULE}\nAbstracts:\n"));
        for (index, title, text) in with_abstracts {
            output.push_str(&format!("\n{index}. {title}\n   {text}\n"));
        }
    }

    output
}

/// Format an answer followed by its references.
#[must_use]
pub fn format_answer(result: &AnswerResult) -> String {
    let mut output = format!("\n{RULE}\nANSWER:\n{}\n", result.answer);

    if !result.citations.is_empty() {
        output.push_str(&format!("\n{RULE}\nREFERENCES:\n"));
        for (i, article) in result.citations.iter().enumerate() {
            output.push_str(&format_reference(article, i + 1));
        }
    }

    if let Some(summary) = &result.summary {
        output.push_str(&format!("\n{RULE}\nSUMMARY:\n{summary}\n"));
    }

    output.push_str(&format!("{RULE}\n"));
    output
}

fn format_reference(article: &ArticleRecord, index: usize) -> String {
    let mut output = format!("\n[{index}] {}\n", article.title);

    if let Some(authors) = article.author_summary(3) {
        output.push_str(&format!("    Authors: {authors}\n"));
    }
    if let Some(journal) = &article.publication_name {
        output.push_str(&format!("    Journal: {journal}\n"));
    }
    if let Some(date) = &article.publication_date {
        output.push_str(&format!("    Date: {date}\n"));
    }
    match &article.doi {
        Some(doi) => output.push_str(&format!("    DOI: https://doi.org/{doi}\n")),
        None => output.push_str(&format!("    ID: {}\n", article.identifier)),
    }

    output
}

/// Format the credential and endpoint report for the `config` command.
#[must_use]
pub fn format_config_report(config: &Config) -> String {
    let mut output = format!("Configuration Status\n{RULE}\n");

    for status in config.credential_status() {
        let (marker, value) = match (&status.display, status.required) {
            (Some(display), _) => ("+", display.clone()),
            (None, true) => ("X", "Not set".to_string()),
            (None, false) => ("o", "Not set (optional)".to_string()),
        };
        output.push_str(&format!("[{marker}] {}: {value}\n", status.name));
    }

    output.push_str(&format!("[i] Model: {}\n", config.model));
    output.push_str(&format!("[i] Search API: {}\n", config.search_api_url));
    output.push_str(&format!("[i] Language model API: {}\n", config.llm_api_url));
    output.push_str(&format!("[i] Debug: {}\n", if config.debug { "on" } else { "off" }));
    output.push_str("\nEdit the .env file or pass --api-key/--inst-token to change credentials.\n");

    output
}
