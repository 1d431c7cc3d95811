use log::debug;
use std::fmt;
use std::io::Write;

use super::ChatView;
use crate::models::chat::{ Conversation, Message, Role };

pub const TITLE: &str = "Calgary Newcomers Guide";
pub const SUBTITLE: &str = "AI Chatbot Assistant";
pub const FOOTER: &str = "Calgary Newcomers Guide Chatbot Prototype v1.0";
pub const INPUT_HINT: &str = "Ask me about CNG programs...";
const SENDING: &str = "Sending...";

const TOPICS: [&str; 5] = [
    "Employment services",
    "Language learning programs",
    "Settlement support",
    "Community connections",
    "Housing information",
];

/// Line-oriented renderer for a terminal.
///
/// Streamed replies are written in place: each delta prints only the text that
/// was not on screen yet. If the final reply diverges from what was streamed,
/// the turn is printed again in full.
pub struct TerminalView<W: Write> {
    out: W,
    echo_user: bool,
    /// Assistant text already on screen for the turn being streamed.
    on_screen: Option<String>,
    status_shown: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, echo_user: bool) -> Self {
        Self {
            out,
            echo_user,
            on_screen: None,
            status_shown: false,
        }
    }

    pub fn header(&mut self) {
        self.emit(format_args!("{}\n{}\n\n", TITLE, SUBTITLE));
    }

    /// Shown while the conversation has no turns yet.
    pub fn welcome(&mut self) {
        self.emit(format_args!("Welcome to {}! 👋\n", TITLE));
        self.emit(format_args!("I'm here to help you learn about our programs and services.\n"));
        self.emit(format_args!("Ask me about:\n"));
        for topic in TOPICS {
            self.emit(format_args!("  - {}\n", topic));
        }
        self.emit(format_args!("\n"));
    }

    pub fn footer(&mut self) {
        self.emit(format_args!("\n{}\n", FOOTER));
    }

    /// Input prompt. A disabled prompt still reads lines but marks that
    /// nothing will be sent.
    pub fn prompt(&mut self, enabled: bool) {
        if enabled {
            self.emit(format_args!("> "));
        } else {
            self.emit(format_args!("(disabled) > "));
        }
    }

    pub fn hint(&mut self) {
        self.emit(format_args!("{} (/history to review, /quit to leave)\n", INPUT_HINT));
    }

    pub fn history(&mut self, conversation: &Conversation) {
        self.emit(
            format_args!(
                "Conversation {} ({} turns)\n",
                conversation.id,
                conversation.messages.len()
            )
        );
        for message in &conversation.messages {
            self.emit(format_args!("  {}: {}\n", message.role.label(), message.content));
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.flush()) {
            debug!("Terminal write failed: {}", e);
        }
    }

    fn clear_status(&mut self) {
        if self.status_shown {
            self.status_shown = false;
            self.emit(format_args!("\r{:width$}\r", "", width = SENDING.len()));
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn message_appended(&mut self, message: &Message) {
        match message.role {
            Role::User => {
                if self.echo_user {
                    self.emit(format_args!("{}: {}\n", Role::User.label(), message.content));
                }
            }
            Role::Assistant => {
                self.clear_status();
                self.emit(format_args!("{}: {}", Role::Assistant.label(), message.content));
                self.on_screen = Some(message.content.clone());
            }
        }
    }

    fn last_replaced(&mut self, _previous: &Message, current: &Message) {
        let shown = self.on_screen.take().unwrap_or_default();
        match current.content.strip_prefix(shown.as_str()) {
            Some(suffix) => {
                self.emit(format_args!("{}", suffix));
            }
            None => {
                self.emit(format_args!("\n{}: {}", current.role.label(), current.content));
            }
        }
        self.on_screen = Some(current.content.clone());
    }

    fn busy_changed(&mut self, busy: bool) {
        if busy {
            self.emit(format_args!("{}", SENDING));
            self.status_shown = true;
        } else {
            self.clear_status();
        }
    }

    fn exchange_finished(&mut self) {
        if self.on_screen.take().is_some() {
            self.emit(format_args!("\n\n"));
        }
    }

    fn notice(&mut self, text: &str) {
        self.emit(format_args!("[{}]\n", text));
    }
}
