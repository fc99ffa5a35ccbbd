//! An explicitly owned registry of commands and keywords.
//!
//! The registry dispatches one input line at a time, synchronously, in
//! registration order: first match wins for parsing, while auto-completion
//! aggregates every command's answer and then disambiguates. Both are
//! deterministic given registration order and input. It is a plain owned
//! value — construct one per embedding, no ambient globals.

use serde::Serialize;
use thiserror::Error;

use crate::command::{Command, Keyword};
use crate::grammar::complete::{Completion, MatchKind};
use crate::grammar::parse::{FailureReason, ParseOutcome, command_body_like_parse};

/// Host-layer programmer errors from registry wiring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A command with the same (case-insensitive) name is already
    /// registered. Dispatch is first-match-wins, so the duplicate could
    /// never run.
    #[error("command `{0}` is already registered")]
    DuplicateCommand(String),
}

/// What the registry made of one input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineDisposition {
    /// Some command accepted the line.
    Recognized {
        /// The accepting command's parse outcome.
        outcome: ParseOutcome,
    },
    /// No command's body matched the head of the line.
    UnknownCommand {
        /// The command-like head word of the line, for the host's
        /// "unknown command" message; falls back to the whole line.
        word: String,
    },
    /// A command matched but a required parameter was missing.
    MissingParam {
        /// The command that reported the failure.
        command: String,
        /// Furthest byte offset the parse reached. Diagnostic only.
        position: usize,
    },
    /// A command matched but an option did not validate.
    UnrecognizedOption {
        /// The command that reported the failure.
        command: String,
        /// Furthest byte offset the parse reached. Diagnostic only.
        position: usize,
    },
}

/// Ordered collection of registered commands and keywords.
#[derive(Default)]
pub struct Registry {
    commands: Vec<Box<dyn Command>>,
    keywords: Vec<Box<dyn Keyword>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Commands are consulted in registration order.
    pub fn register_command(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        if let Some(existing) = self
            .commands
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(command.name()))
        {
            return Err(RegistryError::DuplicateCommand(existing.name().to_string()));
        }
        self.commands.push(command);
        Ok(())
    }

    /// Register a keyword for completion seeding.
    pub fn register_keyword(&mut self, keyword: Box<dyn Keyword>) {
        self.keywords.push(keyword);
    }

    /// Names of all registered commands, in registration order.
    pub fn command_names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name().to_string()).collect()
    }

    /// Names of all registered keywords, in registration order.
    pub fn keyword_names(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.name().to_string()).collect()
    }

    /// Look up a command by exact name.
    pub fn find_command(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .map(Box::as_ref)
    }

    /// Dispatch an input line to the registered commands.
    ///
    /// Commands are tried in registration order until one either succeeds
    /// or fails with something more specific than
    /// [`FailureReason::WrongCommand`] — a missing parameter or a bad
    /// option means the line was *for* that command, just malformed, so no
    /// later command gets to see it.
    pub fn dispatch(&self, line: &str) -> LineDisposition {
        let mut last: Option<ParseOutcome> = None;
        for command in &self.commands {
            let outcome = command.parse(line);
            let stop = outcome.success || outcome.failure != Some(FailureReason::WrongCommand);
            last = Some(outcome);
            if stop {
                break;
            }
        }

        match last {
            Some(outcome) if outcome.success => LineDisposition::Recognized { outcome },
            Some(outcome) => {
                let command = outcome.command.clone().unwrap_or_default();
                match outcome.failure {
                    Some(FailureReason::MissingParam) => LineDisposition::MissingParam {
                        command,
                        position: outcome.position,
                    },
                    Some(FailureReason::UnrecognizedOption) => {
                        LineDisposition::UnrecognizedOption {
                            command,
                            position: outcome.position,
                        }
                    }
                    _ => LineDisposition::UnknownCommand {
                        word: head_word(line),
                    },
                }
            }
            None => LineDisposition::UnknownCommand {
                word: head_word(line),
            },
        }
    }

    /// Aggregate every command's completion of a partial line and
    /// disambiguate.
    ///
    /// A single [`MatchKind::AlreadyMatching`] answer wins outright — an
    /// exact match takes precedence over another command's guess. Failing
    /// that, a single partial answer (single or multiple candidates) is
    /// returned. Anything else completes to nothing.
    pub fn autocomplete(&self, line: &str) -> Completion {
        let results: Vec<Completion> = self
            .commands
            .iter()
            .map(|command| command.autocomplete(line))
            .collect();

        let mut already = results
            .iter()
            .filter(|r| r.kind == MatchKind::AlreadyMatching);
        if let Some(winner) = already.next() {
            if already.next().is_none() {
                return winner.clone();
            }
        }

        let mut partial = results.iter().filter(|r| {
            r.kind == MatchKind::SingleMatchFound || r.kind == MatchKind::MultipleMatchesFound
        });
        if let Some(winner) = partial.next() {
            if partial.next().is_none() {
                return winner.clone();
            }
        }
        Completion::none()
    }
}

/// The command-like head word of a line, for unknown-command messages.
fn head_word(line: &str) -> String {
    let extracted = command_body_like_parse(line);
    if extracted.success {
        extracted.command.unwrap_or_else(|| line.to_string())
    } else {
        line.to_string()
    }
}
