//! JSON command-definition files.
//!
//! A definitions file declares a command vocabulary without writing any
//! Rust: command names, option definitions, and a parameter chain per
//! command. This module deserializes the file and builds the corresponding
//! combinator trees once, producing a ready-to-dispatch
//! [`Registry`].
//!
//! ```json
//! {
//!   "keywords": ["lantern", "lanyard"],
//!   "commands": [
//!     { "name": "man",
//!       "params": [{ "kind": "word", "candidates": ["man", "list"] }] },
//!     { "name": "take",
//!       "options": [{ "short": "q" }, { "long": "force" }],
//!       "params": [{ "kind": "word", "keywords": true }] }
//!   ]
//! }
//! ```

use serde::Deserialize;
use thiserror::Error;

use cmdgram_core::command::{Command, Keyword, OptionDef};
use cmdgram_core::grammar::complete::{
    CommandAutoCompleter, Completer, CompleterExt, Completion, NumberCompleter, WordListCompleter,
};
use cmdgram_core::grammar::parse::{
    CommandParser, NumberParameter, ParseOutcome, Parser, ParserExt, SingleWordTextParameter,
    TextParameter,
};
use cmdgram_core::registry::{Registry, RegistryError};

// ── Errors ──────────────────────────────────────────────────────────────

/// What can go wrong turning a definitions file into a registry.
#[derive(Debug, Error)]
pub(crate) enum DefsError {
    /// The file is not valid JSON, or does not match the schema.
    #[error("malformed definitions: {0}")]
    Parse(#[from] serde_json::Error),
    /// The definitions are well-formed but cannot be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// ── Schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Defs {
    #[serde(default)]
    commands: Vec<CommandDef>,
    /// Words offered as completion candidates to any parameter that opts
    /// in with `"keywords": true`.
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CommandDef {
    name: String,
    #[serde(default)]
    options: Vec<OptionDef>,
    #[serde(default)]
    params: Vec<ParamDef>,
}

/// One link of a command's parameter chain.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ParamDef {
    /// A single word. Completed against `candidates`.
    Word {
        #[serde(default)]
        candidates: Vec<String>,
        #[serde(default)]
        keywords: bool,
    },
    /// Greedy free text spanning words. Completed against `candidates`.
    Text {
        #[serde(default)]
        candidates: Vec<String>,
        #[serde(default)]
        keywords: bool,
    },
    /// A number, stored in canonical form. Never completed.
    Number,
}

// ── Tree building ───────────────────────────────────────────────────────

/// A command built from a [`CommandDef`]: a parser and a completer sharing
/// one name.
struct DefCommand {
    name: String,
    parser: CommandParser,
    completer: CommandAutoCompleter,
}

impl Command for DefCommand {
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

struct NamedKeyword(String);

impl Keyword for NamedKeyword {
    fn name(&self) -> &str {
        &self.0
    }
}

fn candidate_words(candidates: &[String], use_keywords: bool, keywords: &[String]) -> Vec<String> {
    let mut words = candidates.to_vec();
    if use_keywords {
        words.extend(keywords.iter().cloned());
    }
    words
}

fn param_chain(params: &[ParamDef]) -> Option<Box<dyn Parser>> {
    let mut chain: Option<Box<dyn Parser>> = None;
    for def in params {
        let next: Box<dyn Parser> = match def {
            ParamDef::Word { .. } => Box::new(SingleWordTextParameter),
            ParamDef::Text { .. } => Box::new(TextParameter),
            ParamDef::Number => Box::new(NumberParameter),
        };
        chain = Some(match chain {
            Some(prev) => Box::new(prev.then(next)),
            None => next,
        });
    }
    chain
}

fn completion_chain(params: &[ParamDef], keywords: &[String]) -> Option<Box<dyn Completer>> {
    let mut chain: Option<Box<dyn Completer>> = None;
    for def in params {
        let next: Box<dyn Completer> = match def {
            ParamDef::Word {
                candidates,
                keywords: use_keywords,
            } => Box::new(WordListCompleter::single_word(candidate_words(
                candidates,
                *use_keywords,
                keywords,
            ))),
            ParamDef::Text {
                candidates,
                keywords: use_keywords,
            } => Box::new(WordListCompleter::multi_word(candidate_words(
                candidates,
                *use_keywords,
                keywords,
            ))),
            ParamDef::Number => Box::new(NumberCompleter),
        };
        chain = Some(match chain {
            Some(prev) => Box::new(prev.then(next)),
            None => next,
        });
    }
    chain
}

fn build_command(def: CommandDef, keywords: &[String]) -> DefCommand {
    let mut parser = CommandParser::new(&def.name);
    if !def.options.is_empty() {
        parser = parser.with_options(def.options);
    }
    if let Some(chain) = param_chain(&def.params) {
        parser = parser.with_params(chain);
    }

    let mut completer = CommandAutoCompleter::new(&def.name);
    if let Some(chain) = completion_chain(&def.params, keywords) {
        completer = completer.with_params(chain);
    }

    DefCommand {
        name: def.name,
        parser,
        completer,
    }
}

/// Parse a definitions file and build the registry it describes.
pub(crate) fn load_registry(json: &str) -> Result<Registry, DefsError> {
    let Defs { commands, keywords } = serde_json::from_str(json)?;

    let mut registry = Registry::new();
    for word in &keywords {
        registry.register_keyword(Box::new(NamedKeyword(word.clone())));
    }
    for def in commands {
        registry.register_command(Box::new(build_command(def, &keywords)))?;
    }
    Ok(registry)
}
