//! Capabilities the engine consumes from its host: commands, keywords, and
//! option vocabularies.

use serde::{Deserialize, Serialize};

use crate::grammar::complete::Completion;
use crate::grammar::parse::ParseOutcome;

/// A command the engine can recognize and complete.
///
/// The engine does not define commands; a host implements this trait
/// (typically by delegating to
/// [`CommandParser`](crate::grammar::parse::CommandParser) and
/// [`CommandAutoCompleter`](crate::grammar::complete::CommandAutoCompleter))
/// and registers the command with a [`Registry`](crate::registry::Registry).
pub trait Command {
    /// The command's name: one word, stable, compared case-insensitively.
    fn name(&self) -> &str;

    /// Decide whether the input line invokes this command, and extract its
    /// parameters and options if so.
    fn parse(&self, line: &str) -> ParseOutcome;

    /// Compute this command's best completion of a partial input line.
    fn autocomplete(&self, line: &str) -> Completion;
}

/// A word the host wants offered as a completion candidate.
pub trait Keyword {
    /// The keyword itself.
    fn name(&self) -> &str;
}

/// Definition of one option a command accepts, in short (`-x`) and/or long
/// (`--word`) form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDef {
    /// Short form: a single letter, stored without the dash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Long form: words joined by dashes, stored without the leading
    /// dashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
}

impl OptionDef {
    /// Definition with only a short form.
    pub fn short(letter: impl Into<String>) -> Self {
        Self {
            short: Some(letter.into()),
            long: None,
        }
    }

    /// Definition with only a long form.
    pub fn long(word: impl Into<String>) -> Self {
        Self {
            short: None,
            long: Some(word.into()),
        }
    }

    /// Definition with both forms.
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            short: Some(short.into()),
            long: Some(long.into()),
        }
    }

    /// Whether a parsed option token (dashless) satisfies this definition.
    /// Either form matches, regardless of which dash syntax produced the
    /// token.
    pub fn matches(&self, token: &str) -> bool {
        self.short.as_deref() == Some(token) || self.long.as_deref() == Some(token)
    }
}
