//! Prompt composition.

use crate::models::ArticleRecord;

/// System instructions sent with every question.
pub const SYSTEM_PROMPT: &str = "You are a scientific research assistant specializing in \
     analyzing academic literature. Answer the user's question using only the ScienceDirect \
     articles provided. Cite the articles you rely on inline by their bracketed number, for \
     example [1] or [2][3]. Give a balanced, evidence-based answer, note where findings \
     disagree, and say plainly when the articles do not address the question. End with a \
     final line starting with \"Summary:\" that sums up the findings in one or two sentences.";

/// Label of the closing summary line requested by [`SYSTEM_PROMPT`].
const SUMMARY_LABEL: &str = "summary";

/// Authors listed per article before "et al.".
pub const PROMPT_AUTHORS: usize = 5;

/// Abstract characters included per article.
pub const ABSTRACT_EXCERPT_CHARS: usize = 1000;

/// Build the user prompt: the question followed by a numbered summary of each article.
///
/// Article `[n]` in the prompt is `articles[n - 1]`.
#[must_use]
pub fn build_prompt(question: &str, articles: &[ArticleRecord]) -> String {
    let mut prompt = format!("Question: {question}\n\nArticles:\n");

    for (i, article) in articles.iter().enumerate() {
        prompt.push_str(&format!("\n[{}] {}\n", i + 1, article.title));

        if let Some(authors) = article.author_summary(PROMPT_AUTHORS) {
            prompt.push_str(&format!("Authors: {authors}\n"));
        }

        match (&article.publication_name, &article.publication_date) {
            (Some(name), Some(date)) => prompt.push_str(&format!("Published: {name} ({date})\n")),
            (Some(name), None) => prompt.push_str(&format!("Published: {name}\n")),
            (None, Some(date)) => prompt.push_str(&format!("Published: {date}\n")),
            (None, None) => {}
        }

        prompt.push_str(&format!("Identifier: {}\n", article.identifier));

        match article.abstract_excerpt(ABSTRACT_EXCERPT_CHARS) {
            Some(excerpt) => prompt.push_str(&format!("Abstract: {excerpt}\n")),
            None => prompt.push_str("Abstract: not available\n"),
        }
    }

    prompt.push_str("\nAnswer the question using these articles and cite them by number.");
    prompt
}

/// Split model output into the answer body and its closing summary.
///
/// The summary starts at the last line labelled `Summary:` (markdown emphasis
/// or heading marks allowed) and runs to the end. Output without such a line,
/// or with nothing before it, is returned whole with no summary.
#[must_use]
pub fn split_summary(text: &str) -> (String, Option<String>) {
    let lines: Vec<&str> = text.lines().collect();
    let whole = || (text.trim().to_string(), None);

    let Some(pos) = lines.iter().rposition(|line| summary_line(line).is_some()) else {
        return whole();
    };

    let answer = lines[..pos].join("\n").trim().to_string();
    if answer.is_empty() {
        return whole();
    }

    let first = summary_line(lines[pos]).unwrap_or_default();
    let summary = std::iter::once(first)
        .chain(lines[pos + 1..].iter().copied())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    (answer, Some(summary).filter(|s| !s.is_empty()))
}

/// Text after the label when `line` is a summary line.
fn summary_line(line: &str) -> Option<&str> {
    let line = line.trim().trim_start_matches(['#', '*']).trim_start();
    let label = line.get(..SUMMARY_LABEL.len())?;
    if !label.eq_ignore_ascii_case(SUMMARY_LABEL) {
        return None;
    }

    let rest = line[SUMMARY_LABEL.len()..].trim_start_matches('*').strip_prefix(':')?;
    Some(rest.trim_start_matches('*').trim())
}
