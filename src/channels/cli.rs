//! CLI channel: stdin/stdout REPL for one conversation.

use std::io::Write;
use std::time::Duration;

use futures::{StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::LineStream;
use super::render::{options, render_message};
use crate::conversation::{Action, Conversation, DetailField, Message, Step, Turn};
use crate::error::{ChannelError, Result};

/// What a line typed at the prompt means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliInput {
    Quit,
    Empty,
    /// A number that is not one of the offered options.
    Invalid(String),
    Action(Action),
}

/// Interpret a typed line against the currently active step.
///
/// A bare number picks that option of the step; anything else is free text.
pub fn parse_input(line: &str, active: Option<&Step>) -> CliInput {
    let line = line.trim();
    if line.is_empty() {
        return CliInput::Empty;
    }
    if line == "/quit" || line == "/exit" {
        return CliInput::Quit;
    }

    if let Ok(n) = line.parse::<usize>() {
        let opts = active.map(options).unwrap_or_default();
        if opts.is_empty() {
            return CliInput::Action(Action::text(line));
        }
        return match n.checked_sub(1).and_then(|i| opts.get(i)) {
            Some(option) => CliInput::Action(option.action.clone()),
            None => CliInput::Invalid(format!("Pick a number between 1 and {}", opts.len())),
        };
    }

    CliInput::Action(Action::text(line))
}

/// A simple REPL that reads from stdin and writes to stdout.
pub struct CliChannel {
    reveal_delay: Duration,
}

impl CliChannel {
    pub fn new(reveal_delay: Duration) -> Self {
        Self { reveal_delay }
    }

    /// Run until EOF or `/quit`.
    pub async fn run(&self, conv: &mut Conversation) -> Result<()> {
        let mut lines = stdin_lines();

        for msg in conv.messages() {
            print_message(msg);
        }

        loop {
            if conv.active_step() == Some(&Step::DetailsForm) {
                if !self.collect_details(conv, &mut lines).await? {
                    break;
                }
                continue;
            }

            prompt("> ")?;
            let Some(line) = lines.next().await else {
                break; // EOF
            };

            match parse_input(&line, conv.active_step()) {
                CliInput::Quit => break,
                CliInput::Empty => continue,
                CliInput::Invalid(hint) => eprintln!("{hint}"),
                CliInput::Action(action) => self.take_turn(conv, action).await,
            }
        }

        tracing::info!(conversation_id = %conv.id(), "CLI session ended");
        Ok(())
    }

    async fn take_turn(&self, conv: &mut Conversation, action: Action) {
        match conv.begin(action) {
            Ok(Turn::Complete(messages)) => self.reveal(&messages).await,
            Ok(Turn::Pending(pending)) => {
                if let Some(user) = pending.history.last() {
                    print_message(user);
                }
                eprintln!("Ruby is typing...");
                let reply = conv.responder().respond(&pending.history).await;
                match conv.complete(pending, reply) {
                    Ok(messages) => {
                        for msg in messages.iter().skip(1) {
                            print_message(msg);
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Dropped assistant reply"),
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    /// Show the user message, then the scripted reply after the reveal delay.
    async fn reveal(&self, messages: &[Message]) {
        let Some((user, replies)) = messages.split_first() else {
            return;
        };
        print_message(user);
        if !self.reveal_delay.is_zero() {
            tokio::time::sleep(self.reveal_delay).await;
        }
        for msg in replies {
            print_message(msg);
        }
    }

    /// Prompt for every form field, then submit. Returns false on EOF.
    async fn collect_details(
        &self,
        conv: &mut Conversation,
        lines: &mut LineStream,
    ) -> std::result::Result<bool, ChannelError> {
        for field in DetailField::ALL {
            loop {
                prompt(&format!("{}: ", field.label()))?;
                let Some(line) = lines.next().await else {
                    return Ok(false);
                };
                let value = line.trim();
                if value == "/quit" || value == "/exit" {
                    return Ok(false);
                }
                if value.is_empty() {
                    eprintln!("{} is required", field.label());
                    continue;
                }
                conv.update_field(field, value);
                break;
            }
        }

        match conv.submit_details() {
            Ok(messages) => self.reveal(&messages).await,
            Err(e) => eprintln!("{e}"),
        }
        Ok(true)
    }
}

fn print_message(msg: &Message) {
    println!("\n{}\n", render_message(msg));
}

fn prompt(text: &str) -> std::result::Result<(), ChannelError> {
    eprint!("{text}");
    std::io::stderr().flush()?;
    Ok(())
}

/// Lines from stdin, read on a background task.
fn stdin_lines() -> LineStream {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        let reader = BufReader::new(tokio::io::stdin());
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    let stream = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|line| (line, rx)) });
    Box::pin(stream)
}
