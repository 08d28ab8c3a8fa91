//! Command-line surface: `chat`, `ask`, `search` and `config`.
//!
//! Every command writes to a caller-supplied async writer so the binary can
//! hand in stdout and tests can hand in a buffer.

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::info;

use crate::agent::{ResearchAgent, run_chat};
use crate::client::ScienceDirectClient;
use crate::config::{Config, Overrides, api};
use crate::error::AppError;
use crate::formatters;
use crate::models::SearchQuery;

#[derive(Parser, Debug)]
#[command(name = "sciencedirect-agent")]
#[command(about = "Answer research questions from ScienceDirect literature")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Elsevier API key (overrides ELSEVIER_API_KEY)
    #[arg(short = 'k', long, global = true)]
    pub api_key: Option<String>,

    /// Elsevier institutional token (overrides ELSEVIER_INST_TOKEN)
    #[arg(short = 't', long, global = true)]
    pub inst_token: Option<String>,

    /// Verbose logs and raw provider error payloads
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Log filter, a level (trace, debug, info, warn, error) or directives
    #[arg(long, global = true, default_value = "warn", env = "RUST_LOG")]
    pub log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

impl GlobalArgs {
    /// Values that take precedence over the environment.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            inst_token: self.inst_token.clone(),
            debug: self.debug,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start an interactive chat session with the research agent
    Chat {
        /// Maximum articles to analyze per question
        #[arg(short = 'm', long, default_value_t = api::DEFAULT_LIMIT)]
        max_articles: u32,
    },

    /// Ask a research question and get an answer with citations
    Ask {
        /// Research question to answer
        #[arg(required = true)]
        question: Vec<String>,

        /// Maximum articles to analyze
        #[arg(short = 'm', long, default_value_t = api::DEFAULT_LIMIT)]
        max_articles: u32,

        /// Print the answer as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search for scientific articles on ScienceDirect
    Search {
        /// Search query for articles
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum number of results (1-200)
        #[arg(short = 'l', long, default_value_t = api::DEFAULT_LIMIT)]
        limit: u32,

        /// Offset of the first result
        #[arg(long)]
        offset: Option<u32>,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration and credential status
    Config,
}

impl Command {
    /// Subcommand name, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::Ask { .. } => "ask",
            Self::Search { .. } => "search",
            Self::Config => "config",
        }
    }
}

/// Run one command.
///
/// `input` is only read by `chat`.
pub async fn dispatch<R, W>(
    command: Command,
    config: &Config,
    input: R,
    output: &mut W,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match command {
        Command::Config => show_config(config, output).await,
        Command::Search { query, limit, offset, json } => {
            search(config, &query.join(" "), limit, offset, json, output).await
        }
        Command::Ask { question, max_articles, json } => {
            ask(config, &question.join(" "), max_articles, json, output).await
        }
        Command::Chat { max_articles } => {
            let agent = ResearchAgent::from_config(config)?;
            let answered = run_chat(&agent, max_articles, config.debug, input, output).await?;
            info!(answered, "Chat session ended");
            Ok(())
        }
    }
}

/// Print the report, then fail if a required credential is missing. No network.
async fn show_config<W>(config: &Config, output: &mut W) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    write_out(output, &formatters::format_config_report(config)).await?;
    config.validate()?;
    Ok(())
}

async fn search<W>(
    config: &Config,
    text: &str,
    limit: u32,
    offset: Option<u32>,
    json: bool,
    output: &mut W,
) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    let client = ScienceDirectClient::new(config)?;

    let mut query = SearchQuery::new(text, limit)?;
    if let Some(offset) = offset {
        query = query.with_offset(offset);
    }

    let articles = client.search_articles(&query).await?;

    let rendered = if json {
        let value = formatters::articles_json(query.text(), &articles);
        format!("{}\n", serde_json::to_string_pretty(&value)?)
    } else {
        formatters::format_articles(query.text(), &articles)
    };
    write_out(output, &rendered).await
}

async fn ask<W>(
    config: &Config,
    question: &str,
    max_articles: u32,
    json: bool,
    output: &mut W,
) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    let agent = ResearchAgent::from_config(config)?;
    let result = agent.answer(question, max_articles).await?;

    let rendered = if json {
        let value = formatters::answer_json(question.trim(), &result);
        format!("{}\n", serde_json::to_string_pretty(&value)?)
    } else {
        formatters::format_answer(&result)
    };
    write_out(output, &rendered).await
}

async fn write_out<W>(output: &mut W, text: &str) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
