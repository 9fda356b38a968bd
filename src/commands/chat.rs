//! Talk to the chat assistant from the terminal

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::TryRecvError;

use crate::chat::{ChatMessage, LiveChat, Sender};
use crate::Folio;

/// Run an interactive session on stdin/stdout until EOF or `/quit`
pub async fn run(folio: &Folio) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    converse(folio, stdin, &mut std::io::stdout()).await
}

/// Drive one session: every input line is a user message
pub async fn converse<R, W>(folio: &Folio, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let bot = folio.config.chat.bot_name.as_str();
    let chat = LiveChat::start(folio.responder()?, &folio.config.chat.welcome, folio.typing_delay());
    let mut events = chat.subscribe();

    for message in chat.transcript() {
        print_message(out, bot, &message)?;
    }

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        if chat.submit(&line).is_none() {
            continue;
        }

        writeln!(out, "{} is typing...", bot)?;
        out.flush()?;
        chat.wait_idle().await;

        loop {
            match events.try_recv() {
                Ok(message) if message.sender == Sender::Bot => print_message(out, bot, &message)?,
                Ok(_) => {}
                Err(TryRecvError::Lagged(n)) => tracing::warn!("Missed {} chat messages", n),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    tracing::debug!("Chat ended after {} messages", chat.transcript().len());
    Ok(())
}

fn print_message<W: Write>(out: &mut W, bot: &str, message: &ChatMessage) -> Result<()> {
    let who = match message.sender {
        Sender::Bot => bot,
        Sender::User => "you",
    };
    writeln!(
        out,
        "[{}] {}: {}",
        message.timestamp.with_timezone(&chrono::Local).format("%H:%M"),
        who,
        message.content
    )?;
    out.flush()?;
    Ok(())
}
