//! Parsing combinators: recognize whether an input line invokes a command
//! with well-formed options and parameters.
//!
//! Combinator nodes are immutable values built once (typically at command
//! registration) and evaluated repeatedly. Each node is a pure function of
//! `(input, prior state, start index)`: evaluation threads a [`ParseState`]
//! left to right and never mutates the node, so a tree is safe to share and
//! reuse across arbitrarily many input lines.
//!
//! Malformed input is never an `Err`: it is an ordinary state with
//! `success == false` and a [`FailureReason`].

use serde::Serialize;

use super::lexer;
use crate::command::OptionDef;

// ── Result model ────────────────────────────────────────────────────────

/// Why a parse attempt did not accept the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The input line does not invoke this command at all.
    WrongCommand,
    /// The command matched but a required parameter could not be recognized.
    MissingParam,
    /// An option-shaped token did not validate against the command's
    /// option definitions.
    UnrecognizedOption,
}

/// State threaded through a parser chain.
///
/// `position` is an exclusive byte cursor into the input: it only grows
/// along a successful chain. On failure it records the furthest offset the
/// failing leaf reached — useful for diagnostics, but not meaningful for
/// further chaining.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseState {
    /// Whether parsing has succeeded so far.
    pub success: bool,
    /// Set when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
    /// Name of the command the chain is parsing for, once the body matched
    /// (or failed to match).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Exclusive byte cursor into the input.
    pub position: usize,
    /// Parameters recognized so far, in input order.
    pub params: Vec<String>,
    /// Option tokens recognized so far, in input order, without dashes.
    pub options: Vec<String>,
    /// Internal signal: the options run ended because no option-shaped token
    /// was present (absent run), as opposed to a malformed one.
    #[serde(skip)]
    pub(crate) option_not_found: bool,
}

impl ParseState {
    /// The identity state a chain starts from: successful, at offset 0,
    /// nothing recognized yet.
    pub fn initial() -> Self {
        Self {
            success: true,
            failure: None,
            command: None,
            position: 0,
            params: Vec::new(),
            options: Vec::new(),
            option_not_found: false,
        }
    }

    fn failed(&self, reason: FailureReason, position: usize) -> Self {
        let mut state = self.clone();
        state.success = false;
        state.failure = Some(reason);
        state.position = position;
        state
    }
}

/// Public result of [`CommandParser::parse`] and
/// [`command_body_like_parse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    /// Whether the line invokes the command with well-formed options and
    /// parameters.
    pub success: bool,
    /// Set when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
    /// Name of the command that was parsed for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Recognized parameters, in input order.
    pub params: Vec<String>,
    /// Recognized option tokens, in input order, without dashes.
    pub options: Vec<String>,
    /// Furthest byte offset reached. Diagnostic only.
    pub position: usize,
}

impl ParseOutcome {
    /// Whether the outcome contains the given option token (short options
    /// are single letters, long options their dashless name).
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|found| found == option)
    }
}

impl From<ParseState> for ParseOutcome {
    fn from(state: ParseState) -> Self {
        Self {
            success: state.success,
            failure: state.failure,
            command: state.command,
            params: state.params,
            options: state.options,
            position: state.position,
        }
    }
}

// ── Combinator capability ───────────────────────────────────────────────

/// A parsing combinator node.
///
/// Implementations must be pure: no interior mutability, no per-call state.
pub trait Parser {
    /// Parse `input` starting at `index`, threading the prior chain state.
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState;
}

impl<P: Parser + ?Sized> Parser for &P {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        (**self).parse_at(input, prior, index)
    }
}

impl<P: Parser + ?Sized> Parser for Box<P> {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        (**self).parse_at(input, prior, index)
    }
}

/// Composition methods available on every parser node.
pub trait ParserExt: Parser + Sized {
    /// Sequence: run `self`, and if it succeeds run `next` from its end
    /// position. A failure of `self` propagates untouched.
    fn then<P: Parser>(self, next: P) -> Sequence<Self, P> {
        Sequence {
            first: self,
            second: next,
        }
    }

    /// Choice: run `self`, and if it fails retry `alt` from the original
    /// state and index. Nothing of the failed attempt leaks through.
    fn or<P: Parser>(self, alt: P) -> Choice<Self, P> {
        Choice {
            first: self,
            second: alt,
        }
    }

    /// Optional: a failure of `self` is swallowed and the prior state is
    /// returned unchanged. The failure reason is lost.
    fn optional(self) -> Opt<Self> {
        Opt { inner: self }
    }

    /// Repetition: run `self` until an attempt fails, keeping the last
    /// successful state.
    ///
    /// Must not wrap an [`Opt`]: an optional parser never fails, so the
    /// repetition would never terminate.
    fn repeat(self) -> Repeat<Self> {
        Repeat { inner: self }
    }
}

impl<P: Parser> ParserExt for P {}

// ── Combinators ─────────────────────────────────────────────────────────

/// Runs two parsers in sequence. See [`ParserExt::then`].
#[derive(Debug, Clone)]
pub struct Sequence<A, B> {
    first: A,
    second: B,
}

impl<A: Parser, B: Parser> Parser for Sequence<A, B> {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        let first = self.first.parse_at(input, prior, index);
        if !first.success {
            return first;
        }
        let at = first.position;
        self.second.parse_at(input, &first, at)
    }
}

/// Tries an alternative when the first parser fails. See [`ParserExt::or`].
#[derive(Debug, Clone)]
pub struct Choice<A, B> {
    first: A,
    second: B,
}

impl<A: Parser, B: Parser> Parser for Choice<A, B> {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        let first = self.first.parse_at(input, prior, index);
        if first.success {
            return first;
        }
        // Retry from the original state: the failed attempt's diagnostics
        // are discarded in favor of whatever the alternative produces.
        self.second.parse_at(input, prior, index)
    }
}

/// Converts failure of the inner parser into a no-op success.
/// See [`ParserExt::optional`].
#[derive(Debug, Clone)]
pub struct Opt<P> {
    inner: P,
}

impl<P: Parser> Parser for Opt<P> {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        let result = self.inner.parse_at(input, prior, index);
        if result.success {
            result
        } else {
            prior.clone()
        }
    }
}

/// Runs the inner parser until it fails. See [`ParserExt::repeat`].
#[derive(Debug, Clone)]
pub struct Repeat<P> {
    inner: P,
}

impl<P: Parser> Parser for Repeat<P> {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        let mut state = prior.clone();
        let mut at = index;
        loop {
            let next = self.inner.parse_at(input, &state, at);
            if !next.success {
                return state;
            }
            at = next.position;
            state = next;
        }
    }
}

// ── Leaf parsers ────────────────────────────────────────────────────────

/// Matches the leading word of the line against one command name,
/// case-insensitively and in full.
#[derive(Debug, Clone)]
pub struct CommandBody {
    name: String,
}

impl CommandBody {
    /// Body parser for the command called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Parser for CommandBody {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        match lexer::scan_command_word(input, index) {
            Some(scan) if scan.text.eq_ignore_ascii_case(&self.name) => {
                let mut state = prior.clone();
                state.success = true;
                state.failure = None;
                state.command = Some(self.name.clone());
                state.position = scan.end;
                state
            }
            Some(scan) => {
                let mut state = prior.failed(FailureReason::WrongCommand, scan.end);
                state.command = Some(self.name.clone());
                state
            }
            None => {
                let stop = lexer::skip_blanks(input, index);
                let mut state = prior.failed(FailureReason::WrongCommand, stop);
                state.command = Some(self.name.clone());
                state
            }
        }
    }
}

/// A single-word text parameter: a mandatory blank run, then a letter run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleWordTextParameter;

impl Parser for SingleWordTextParameter {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        match lexer::scan_single_word_param(input, index) {
            Some(scan) => {
                let mut state = prior.clone();
                state.params.push(scan.text.to_string());
                state.position = scan.end;
                state
            }
            None => prior.failed(FailureReason::MissingParam, lexer::skip_blanks(input, index)),
        }
    }
}

/// A greedy multi-word text parameter: a mandatory blank run, then a letter
/// followed by any run of letters or blanks.
///
/// The greedy run consumes to the end of the line, so the behavior of a
/// `TextParameter` followed by another parameter parser is not defined —
/// it will not split the remainder. Chain it last.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParameter;

impl Parser for TextParameter {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        match lexer::scan_text_param(input, index) {
            Some(scan) => {
                let mut state = prior.clone();
                state.params.push(scan.text.to_string());
                state.position = scan.end;
                state
            }
            None => prior.failed(FailureReason::MissingParam, lexer::skip_blanks(input, index)),
        }
    }
}

/// A number parameter: a mandatory blank run, then an integer or decimal.
///
/// The stored parameter is the number's canonical textual form (`"0.0"`
/// parses to `"0"`), not the raw token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberParameter;

/// Canonical textual form of a recognized number token.
pub(crate) fn restringify_number(token: &str) -> String {
    token
        .parse::<f64>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| token.to_string())
}

impl Parser for NumberParameter {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        match lexer::scan_number_param(input, index) {
            Some(scan) => {
                let mut state = prior.clone();
                state.params.push(restringify_number(scan.text));
                state.position = scan.end;
                state
            }
            None => prior.failed(FailureReason::MissingParam, lexer::skip_blanks(input, index)),
        }
    }
}

/// Consumes a run of short-option clusters and long options, validating each
/// against the command's option definitions.
///
/// Options are optional as a group: an absent run succeeds with zero options
/// consumed. But once an option-shaped token is present it must validate —
/// an unknown option fails the whole parse with
/// [`FailureReason::UnrecognizedOption`].
#[derive(Debug, Clone, Default)]
pub struct OptionsParser {
    defs: Vec<OptionDef>,
}

impl OptionsParser {
    /// Options parser over the given definitions. An empty definition list
    /// still accepts input with no options and rejects any option present.
    pub fn new(defs: Vec<OptionDef>) -> Self {
        Self { defs }
    }

    fn is_defined(&self, token: &str) -> bool {
        self.defs.iter().any(|def| def.matches(token))
    }

    /// Greedily consume option tokens. Ends either in an
    /// `UnrecognizedOption` failure or in an `option_not_found` failure
    /// marking the (possibly empty) end of the run.
    fn consume(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        if let Some(scan) = lexer::scan_short_option(input, index) {
            for letter in scan.text.chars() {
                if !self.is_defined(&letter.to_string()) {
                    return prior.failed(FailureReason::UnrecognizedOption, prior.position);
                }
            }
            let mut state = prior.clone();
            state
                .options
                .extend(scan.text.chars().map(|letter| letter.to_string()));
            state.position = scan.end;
            let at = state.position;
            return self.consume(input, &state, at);
        }
        if let Some(scan) = lexer::scan_long_option(input, index) {
            if !self.is_defined(scan.text) {
                return prior.failed(FailureReason::UnrecognizedOption, prior.position);
            }
            let mut state = prior.clone();
            state.options.push(scan.text.to_string());
            state.position = scan.end;
            let at = state.position;
            return self.consume(input, &state, at);
        }
        // No option-shaped token here: flag it so the caller can tell an
        // absent run apart from a malformed one.
        let mut state = prior.clone();
        state.success = false;
        state.option_not_found = true;
        state
    }
}

impl Parser for OptionsParser {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        let result = self.consume(input, prior, index);
        if !result.success && result.option_not_found {
            // The run simply ended; whatever was consumed stands.
            let mut state = result;
            state.success = true;
            state.failure = None;
            state.option_not_found = false;
            return state;
        }
        result
    }
}

/// Extracts whatever looks like a command word from the head of the line,
/// succeeding regardless of its content.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandBodyLike;

impl Parser for CommandBodyLike {
    fn parse_at(&self, input: &str, prior: &ParseState, index: usize) -> ParseState {
        match lexer::scan_command_word(input, index) {
            Some(scan) => {
                let mut state = prior.clone();
                state.command = Some(scan.text.to_string());
                state.position = scan.end;
                state
            }
            None => prior.failed(FailureReason::WrongCommand, lexer::skip_blanks(input, index)),
        }
    }
}

/// Parse the head of `input` for a command-like word.
///
/// Used to produce a readable "unknown command" message after no registered
/// command accepted a line; it says nothing about grammar correctness.
pub fn command_body_like_parse(input: &str) -> ParseOutcome {
    CommandBodyLike
        .parse_at(input, &ParseState::initial(), 0)
        .into()
}

// ── High-level facade ───────────────────────────────────────────────────

/// Parses a full command invocation: body, then options, then parameters.
///
/// Built once per command, evaluated per input line:
///
/// ```
/// use cmdgram_core::grammar::parse::{CommandParser, SingleWordTextParameter};
///
/// let man = CommandParser::new("man").with_params(SingleWordTextParameter);
/// let outcome = man.parse("man list");
/// assert!(outcome.success);
/// assert_eq!(outcome.params, vec!["list"]);
/// ```
pub struct CommandParser {
    body: CommandBody,
    options: Option<OptionsParser>,
    params: Option<Box<dyn Parser>>,
}

impl CommandParser {
    /// Parser for the command called `name`, with no options and no
    /// parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            body: CommandBody::new(name),
            options: None,
            params: None,
        }
    }

    /// Accept the given options between the body and the parameters.
    ///
    /// Without this, any option-shaped token after the body is simply left
    /// unconsumed (and trailing input never fails a parse).
    #[must_use]
    pub fn with_options(mut self, defs: Vec<OptionDef>) -> Self {
        self.options = Some(OptionsParser::new(defs));
        self
    }

    /// Parse parameters with the given chain after the body and options.
    #[must_use]
    pub fn with_params(mut self, chain: impl Parser + 'static) -> Self {
        self.params = Some(Box::new(chain));
        self
    }

    /// Attempt to parse an input line.
    pub fn parse(&self, input: &str) -> ParseOutcome {
        let mut state = self.body.parse_at(input, &ParseState::initial(), 0);
        if state.success {
            if let Some(options) = &self.options {
                let at = state.position;
                state = options.parse_at(input, &state, at);
            }
        }
        if state.success {
            if let Some(params) = &self.params {
                let at = state.position;
                state = params.parse_at(input, &state, at);
            }
        }
        state.into()
    }
}
