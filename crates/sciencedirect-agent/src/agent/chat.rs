//! Interactive read-evaluate loop.
//!
//! Each line is an independent question; nothing carries over between turns.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use super::ResearchAgent;
use crate::formatters;

/// Inputs that end the session.
pub const EXIT_COMMANDS: &[&str] = &["quit", "exit", "q"];

const BANNER: &str = "Scientific Research Assistant\n\
     ==================================================\n\
     Ask me any scientific question, and I'll search the literature for you.\n\
     Type 'quit' or 'exit' to end the session.\n";

/// Whether `line` asks to leave the chat.
#[must_use]
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    EXIT_COMMANDS.iter().any(|cmd| line.eq_ignore_ascii_case(cmd))
}

/// Run the chat loop until an exit command or end of input.
///
/// A failed turn is reported and the loop continues. Returns the number of
/// questions answered.
pub async fn run_chat<R, W>(
    agent: &ResearchAgent,
    max_articles: u32,
    debug: bool,
    input: R,
    output: &mut W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0;

    output.write_all(BANNER.as_bytes()).await?;

    loop {
        output.write_all(b"\nYour question: ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };

        let question = line.trim();
        if is_exit_command(question) {
            output.write_all(b"Goodbye!\n").await?;
            break;
        }
        if question.is_empty() {
            continue;
        }

        output.write_all(b"\nSearching scientific literature...\n").await?;

        match agent.answer(question, max_articles).await {
            Ok(result) => {
                answered += 1;
                output.write_all(formatters::format_answer(&result).as_bytes()).await?;
            }
            Err(err) => {
                warn!(error = %err, "Chat turn failed");
                let message = format!(
                    "\nError: {}\nPlease check your API credentials and try again.\n",
                    err.to_user_message(debug)
                );
                output.write_all(message.as_bytes()).await?;
            }
        }
    }

    output.flush().await?;
    Ok(answered)
}
