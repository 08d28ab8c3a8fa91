//! ScienceDirect Research Agent
//!
//! Searches the ScienceDirect literature API, hands the retrieved article
//! metadata to a hosted language model, and returns a natural-language
//! answer together with the articles it was based on.
//!
//! # Components
//!
//! - **Search client**: one authenticated request per search, validated into
//!   [`models::ArticleRecord`]s
//! - **Research agent**: search, then a single model call; no model call when nothing was found
//! - **CLI**: `chat`, `ask`, `search` and `config` commands
//!
//! # Example
//!
//! ```no_run
//! use sciencedirect_agent::{agent::ResearchAgent, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let agent = ResearchAgent::from_config(&config)?;
//!
//!     let result = agent.answer("What are the side effects of metformin?", 3).await?;
//!     println!("{}", result.answer);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod llm;
pub mod models;

pub use agent::ResearchAgent;
pub use client::{ArticleSearch, ScienceDirectClient};
pub use config::Config;
pub use error::{AgentError, AppError, ClientError, ConfigError, ErrorKind};
pub use llm::{LanguageModel, OpenAiClient};
