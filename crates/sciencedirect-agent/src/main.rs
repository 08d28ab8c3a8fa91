//! ScienceDirect Research Agent - Entry Point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sciencedirect_agent::cli::{Cli, dispatch};
use sciencedirect_agent::config::Config;

/// Logs go to stderr so command output on stdout stays clean.
///
/// `filter` comes from `--log-level`, which clap already falls back to `RUST_LOG` for.
fn init_tracing(filter: &str, debug: bool, json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter)?;
    let filter =
        if debug { filter.add_directive("sciencedirect_agent=debug".parse()?) } else { filter };

    let subscriber = tracing_subscriber::registry().with(filter);
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if json {
        subscriber.with(layer.json()).try_init()?;
    } else {
        subscriber.with(layer.compact()).try_init()?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine; the environment may already be set.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.global.overrides());

    init_tracing(&cli.global.log_level, config.debug, cli.global.json_logs)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        command = cli.command.name(),
        debug = config.debug,
        "Starting ScienceDirect research agent"
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    match dispatch(cli.command, &config, stdin, &mut stdout).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!(error = %err, kind = ?err.kind(), "Command failed");
            eprintln!("Error: {}", err.to_user_message(config.debug));
            Ok(ExitCode::FAILURE)
        }
    }
}
