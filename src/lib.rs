pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod stream;
pub mod ui;

use cli::Args;
use client::new_backend;
use config::ClientConfig;
use error::ChatError;
use log::{ info, warn };
use session::{ RejectReason, SendOutcome, Session };
use std::error::Error;
use std::io::Write;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt };
use ui::terminal::TerminalView;
use ui::ChatView;

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];
const HISTORY_COMMAND: &str = "/history";
const SENDING_DISABLED: &str = "Sending is disabled: no conversation could be created";

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = ClientConfig::from_args(&args)?;

    info!("--- Client Configuration ---");
    info!("Server URL: {}", config.server_url);
    info!("Banner: {}", config.show_banner);
    info!("One-shot messages: {}", args.messages.len());
    info!("----------------------------");

    let backend = new_backend(&config)?;
    let mut session = Session::new(backend);
    let one_shot = !args.messages.is_empty();
    let mut view = TerminalView::new(std::io::stdout(), one_shot);

    if config.show_banner {
        view.header();
        view.welcome();
    }
    if !session.initialize().await {
        view.notice(SENDING_DISABLED);
    }

    if one_shot {
        for message in &args.messages {
            let outcome = session.send(message, &mut view).await;
            report(&outcome, &mut view);
        }
    } else {
        view.hint();
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        chat_loop(&mut session, &mut view, stdin).await?;
    }

    if config.show_banner {
        view.footer();
    }
    Ok(())
}

/// Reads one message per line from `input` until EOF or a quit command.
///
/// Lines that are not valid UTF-8 are decoded lossily rather than ending the
/// session.
pub async fn chat_loop<R, W>(
    session: &mut Session,
    view: &mut TerminalView<W>,
    mut input: R
) -> Result<(), ChatError>
    where R: AsyncBufRead + Unpin, W: Write
{
    let mut buf = Vec::new();
    loop {
        view.prompt(session.can_send());
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(text) => text.to_string(),
            Err(e) => {
                warn!("Input line is not valid UTF-8 ({}), decoding lossily", e);
                String::from_utf8_lossy(&buf).into_owned()
            }
        };
        let command = line.trim();
        if QUIT_COMMANDS.contains(&command) {
            break;
        }
        if command == HISTORY_COMMAND {
            show_history(session, view);
            continue;
        }
        let outcome = session.send(&line, view).await;
        report(&outcome, view);
    }
    Ok(())
}

fn show_history<W: Write>(session: &Session, view: &mut TerminalView<W>) {
    let conversation = match session.conversation() {
        Some(conversation) => conversation,
        None => {
            view.notice(SENDING_DISABLED);
            return;
        }
    };
    if let Err(e) = conversation.validate() {
        warn!("Conversation {} failed validation: {}", conversation.id, e);
    }
    view.history(&conversation);
}

fn report(outcome: &SendOutcome, view: &mut dyn ChatView) {
    match outcome {
        SendOutcome::Rejected(RejectReason::NoConversation) => view.notice(SENDING_DISABLED),
        SendOutcome::Rejected(RejectReason::Busy) => view.notice("Still waiting for the previous reply"),
        SendOutcome::Rejected(RejectReason::EmptyInput) => {}
        SendOutcome::Completed(streamed) => {
            if streamed.skipped > 0 {
                warn!("{} malformed record(s) skipped in reply {}", streamed.skipped, streamed.message.id);
            }
        }
        SendOutcome::Failed => {}
    }
}
