//! Shared fixtures for the engine's integration tests.

use cmdgram_core::command::{Command, Keyword};
use cmdgram_core::grammar::complete::{CommandAutoCompleter, Completion};
use cmdgram_core::grammar::parse::{CommandParser, ParseOutcome};

/// A command wired straight to a parser and a completer, the way a real
/// host implements the capability.
pub struct GrammarCommand {
    name: String,
    parser: CommandParser,
    completer: CommandAutoCompleter,
}

impl GrammarCommand {
    pub fn new(name: &str, parser: CommandParser, completer: CommandAutoCompleter) -> Self {
        Self {
            name: name.to_string(),
            parser,
            completer,
        }
    }

    /// A command with no options and no parameters.
    pub fn bare(name: &str) -> Self {
        Self::new(
            name,
            CommandParser::new(name),
            CommandAutoCompleter::new(name),
        )
    }
}

impl Command for GrammarCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, line: &str) -> ParseOutcome {
        self.parser.parse(line)
    }

    fn autocomplete(&self, line: &str) -> Completion {
        self.completer.complete(line)
    }
}

/// A plain named keyword.
pub struct Kw(pub &'static str);

impl Keyword for Kw {
    fn name(&self) -> &str {
        self.0
    }
}
