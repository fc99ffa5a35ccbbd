//! cmdgram core library.
//!
//! A deterministic command-line grammar engine for terminal-style apps: a
//! small set of composable parsing primitives that recognize whether an
//! input line invokes a command with well-formed options and parameters,
//! and a parallel set of auto-completion primitives that compute the
//! furthest common completion of a partial line.
//!
//! The main entry points are [`CommandParser`] for parsing,
//! [`CommandAutoCompleter`] for completion, and [`Registry`] for dispatching
//! lines across a set of commands. Everything is pure, synchronous, and
//! allocation-per-call: combinator trees are immutable values built once and
//! evaluated repeatedly.

#![warn(missing_docs)]

/// Capabilities the engine consumes from its host.
pub mod command;
/// The grammar layer: lexer, parsing combinators, and auto-completion
/// combinators.
pub mod grammar;
/// Explicitly owned command/keyword registry.
pub mod registry;

// ── Convenience re-exports ──────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Parsing
pub use grammar::parse::{
    CommandParser, FailureReason, NumberParameter, ParseOutcome, Parser, ParserExt,
    SingleWordTextParameter, TextParameter, command_body_like_parse,
};

// Auto-completion
pub use grammar::complete::{
    CommandAutoCompleter, Completer, CompleterExt, Completion, MatchKind, NumberCompleter,
    WordListCompleter,
};

// Host capabilities
pub use command::{Command, Keyword, OptionDef};

// Registry
pub use registry::{LineDisposition, Registry, RegistryError};

// Serialization helpers
pub use grammar::dump::to_pretty_json;
