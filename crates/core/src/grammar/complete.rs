//! Auto-completion combinators: given a partial input line, compute the
//! furthest common completion and how confident that completion is.
//!
//! This algebra is structurally parallel to [`super::parse`] but deliberately
//! separate: it has four result states instead of a success flag, its
//! sequencing rule requires an exact match (not mere success) to continue,
//! and its options handling is permissive where the parser's is strict.
//! Unifying the two would hide those differences.

use serde::Serialize;

use super::lexer;
use super::parse::restringify_number;
use crate::command::Keyword;

// ── Result model ────────────────────────────────────────────────────────

/// How confidently a completion stage matched the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The input already fully matches a valid continuation.
    AlreadyMatching,
    /// Exactly one candidate extends the current input.
    SingleMatchFound,
    /// Several candidates extend the input; only their shared prefix is
    /// certain.
    MultipleMatchesFound,
    /// No candidate extends the input.
    NotMatching,
}

/// State threaded through a completer chain.
///
/// `fixed` is the accumulated best-known completion: it is append-only along
/// a chain — once a segment is emitted it is never retracted, only extended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteState {
    /// Confidence of the match so far.
    pub kind: MatchKind,
    /// Exclusive byte cursor into the input; advances only on
    /// [`MatchKind::AlreadyMatching`] stages.
    pub position: usize,
    /// Accumulated best-known completion of the line.
    pub fixed: String,
    /// Internal signal: the options run ended because no option-shaped token
    /// was present.
    #[serde(skip)]
    pub(crate) option_not_found: bool,
}

impl CompleteState {
    /// The identity state a chain starts from.
    pub fn initial() -> Self {
        Self {
            kind: MatchKind::AlreadyMatching,
            position: 0,
            fixed: String::new(),
            option_not_found: false,
        }
    }

    fn not_matching(&self) -> Self {
        let mut state = self.clone();
        state.kind = MatchKind::NotMatching;
        state
    }
}

/// Public result of [`CommandAutoCompleter::complete`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    /// Confidence of the match.
    pub kind: MatchKind,
    /// The furthest known completion of the input line.
    pub fixed: String,
}

impl Completion {
    /// The empty no-match completion.
    pub fn none() -> Self {
        Self {
            kind: MatchKind::NotMatching,
            fixed: String::new(),
        }
    }
}

impl From<CompleteState> for Completion {
    fn from(state: CompleteState) -> Self {
        Self {
            kind: state.kind,
            fixed: state.fixed,
        }
    }
}

// ── Combinator capability ───────────────────────────────────────────────

/// An auto-completion combinator node. Pure and reusable, like
/// [`super::parse::Parser`].
pub trait Completer {
    /// Complete `input` starting at `index`, threading the prior chain
    /// state.
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState;
}

impl<C: Completer + ?Sized> Completer for &C {
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        (**self).complete_at(input, prior, index)
    }
}

impl<C: Completer + ?Sized> Completer for Box<C> {
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        (**self).complete_at(input, prior, index)
    }
}

/// Composition methods available on every completer node.
pub trait CompleterExt: Completer + Sized {
    /// Sequence: run `next` only if `self` came back exactly
    /// [`MatchKind::AlreadyMatching`]. A genuine completion opportunity (or
    /// no match) terminates the chain — completing a later segment while an
    /// earlier one is ambiguous would be incoherent.
    fn then<C: Completer>(self, next: C) -> SequenceCompleter<Self, C> {
        SequenceCompleter {
            first: self,
            second: next,
        }
    }

    /// Choice: run `alt` only if `self` came back exactly
    /// [`MatchKind::NotMatching`].
    fn or<C: Completer>(self, alt: C) -> OrCompleter<Self, C> {
        OrCompleter {
            first: self,
            second: alt,
        }
    }
}

impl<C: Completer> CompleterExt for C {}

// ── Combinators ─────────────────────────────────────────────────────────

/// Runs two completers in sequence. See [`CompleterExt::then`].
#[derive(Debug, Clone)]
pub struct SequenceCompleter<A, B> {
    first: A,
    second: B,
}

impl<A: Completer, B: Completer> Completer for SequenceCompleter<A, B> {
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        let first = self.first.complete_at(input, prior, index);
        if first.kind == MatchKind::AlreadyMatching {
            let at = first.position;
            return self.second.complete_at(input, &first, at);
        }
        first
    }
}

/// Tries an alternative when the first completer finds no match.
/// See [`CompleterExt::or`].
#[derive(Debug, Clone)]
pub struct OrCompleter<A, B> {
    first: A,
    second: B,
}

impl<A: Completer, B: Completer> Completer for OrCompleter<A, B> {
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        let first = self.first.complete_at(input, prior, index);
        if first.kind == MatchKind::NotMatching {
            let at = first.position;
            return self.second.complete_at(input, &first, at);
        }
        first
    }
}

// ── Leaf completers ─────────────────────────────────────────────────────

/// `true` when `candidate` starts with `token`, ASCII case-insensitively.
fn starts_with_ignore_case(candidate: &str, token: &str) -> bool {
    candidate
        .as_bytes()
        .get(..token.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(token.as_bytes()))
}

/// Longest prefix shared by all candidates, compared ASCII
/// case-insensitively, spelled as the first candidate spells it.
///
/// The scan stops at the first divergent position or when any candidate is
/// exhausted.
fn common_prefix(candidates: &[&str]) -> String {
    let first = candidates[0];
    let mut end = 0;
    for (start, ch) in first.char_indices() {
        let next = start + ch.len_utf8();
        let segment = &first[start..next];
        let shared = candidates[1..]
            .iter()
            .all(|c| c.get(start..next).is_some_and(|s| s.eq_ignore_ascii_case(segment)));
        if !shared {
            break;
        }
        end = next;
    }
    first[..end].to_string()
}

/// Completes the leading word of the line against one command name.
///
/// Exact (case-insensitive) match is [`MatchKind::AlreadyMatching`]; the
/// input being a proper prefix of the name is
/// [`MatchKind::SingleMatchFound`] with the full name emitted.
#[derive(Debug, Clone)]
pub struct CommandBodyCompleter {
    name: String,
}

impl CommandBodyCompleter {
    /// Body completer for the command called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Completer for CommandBodyCompleter {
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        let Some(scan) = lexer::scan_command_word(input, index) else {
            return prior.not_matching();
        };
        if scan.text.eq_ignore_ascii_case(&self.name) {
            let mut state = prior.clone();
            state.kind = MatchKind::AlreadyMatching;
            state.fixed.push_str(&self.name);
            state.position = scan.end;
            state
        } else if starts_with_ignore_case(&self.name, scan.text) {
            let mut state = prior.clone();
            state.kind = MatchKind::SingleMatchFound;
            state.fixed.push_str(&self.name);
            state
        } else {
            prior.not_matching()
        }
    }
}

/// Completes a text parameter against a list of candidate words.
///
/// The first exact match wins; a single prefix candidate is a
/// [`MatchKind::SingleMatchFound`]; several prefix candidates yield their
/// longest shared prefix. Each emitted segment carries a leading separator
/// space.
#[derive(Debug, Clone)]
pub struct WordListCompleter {
    words: Vec<String>,
    single_word: bool,
}

impl WordListCompleter {
    /// Completer tokenizing greedily: the parameter may span several words,
    /// so a multi-word candidate can match in full.
    pub fn multi_word(words: Vec<String>) -> Self {
        Self {
            words,
            single_word: false,
        }
    }

    /// Completer tokenizing a single word only. Against the same candidates
    /// this produces different match sets than [`Self::multi_word`]: input
    /// `"foo bar"` can never exactly match the candidate `"foo bar"`.
    pub fn single_word(words: Vec<String>) -> Self {
        Self {
            words,
            single_word: true,
        }
    }

    /// Completer seeded from keyword names.
    pub fn from_keywords(keywords: &[&dyn Keyword]) -> Self {
        Self::multi_word(keywords.iter().map(|k| k.name().to_string()).collect())
    }

    fn scan<'a>(&self, input: &'a str, index: usize) -> Option<lexer::Scan<'a>> {
        if self.single_word {
            lexer::scan_single_word_param(input, index)
        } else {
            lexer::scan_text_param(input, index)
        }
    }
}

impl Completer for WordListCompleter {
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        let Some(scan) = self.scan(input, index) else {
            return prior.not_matching();
        };
        let token = scan.text;
        let mut exact: Vec<&str> = Vec::new();
        let mut partial: Vec<&str> = Vec::new();
        for word in &self.words {
            if word.eq_ignore_ascii_case(token) {
                exact.push(word);
            } else if starts_with_ignore_case(word, token) {
                partial.push(word);
            }
        }

        let mut state = prior.clone();
        if let Some(winner) = exact.first() {
            state.kind = MatchKind::AlreadyMatching;
            state.fixed.push(' ');
            state.fixed.push_str(winner);
            state.position = scan.end;
        } else if partial.len() == 1 {
            state.kind = MatchKind::SingleMatchFound;
            state.fixed.push(' ');
            state.fixed.push_str(partial[0]);
        } else if partial.len() > 1 {
            state.kind = MatchKind::MultipleMatchesFound;
            state.fixed.push(' ');
            state.fixed.push_str(&common_prefix(&partial));
        } else {
            state.kind = MatchKind::NotMatching;
        }
        state
    }
}

/// Accepts any syntactically valid number parameter as already matching.
/// Numbers are never completed, only accepted or rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberCompleter;

impl Completer for NumberCompleter {
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        match lexer::scan_number_param(input, index) {
            Some(scan) => {
                let mut state = prior.clone();
                state.kind = MatchKind::AlreadyMatching;
                state.fixed.push(' ');
                state.fixed.push_str(&restringify_number(scan.text));
                state.position = scan.end;
                state
            }
            None => prior.not_matching(),
        }
    }
}

/// Greedily accepts any option-shaped tokens without validating them.
///
/// Unlike the strict [`super::parse::OptionsParser`], completion never
/// rejects an option: anything option-shaped is passed through verbatim,
/// and an absent options run is still a match with nothing appended. A bad
/// option only surfaces when the line is submitted and parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionsCompleter;

impl OptionsCompleter {
    fn consume(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        if let Some(scan) = lexer::scan_short_option(input, index) {
            let mut state = prior.clone();
            state.kind = MatchKind::AlreadyMatching;
            state.fixed.push_str(" -");
            state.fixed.push_str(scan.text);
            state.position = scan.end;
            let at = state.position;
            return self.consume(input, &state, at);
        }
        if let Some(scan) = lexer::scan_long_option(input, index) {
            let mut state = prior.clone();
            state.kind = MatchKind::AlreadyMatching;
            state.fixed.push_str(" --");
            state.fixed.push_str(scan.text);
            state.position = scan.end;
            let at = state.position;
            return self.consume(input, &state, at);
        }
        let mut state = prior.not_matching();
        state.option_not_found = true;
        state
    }
}

impl Completer for OptionsCompleter {
    fn complete_at(&self, input: &str, prior: &CompleteState, index: usize) -> CompleteState {
        let result = self.consume(input, prior, index);
        if result.kind == MatchKind::NotMatching && result.option_not_found {
            // End of the (possibly empty) run: absence of options is never
            // a completion failure.
            let mut state = result;
            state.kind = MatchKind::AlreadyMatching;
            state.option_not_found = false;
            return state;
        }
        result
    }
}

// ── High-level facade ───────────────────────────────────────────────────

/// Completes a full command invocation: body, then options, then
/// parameters.
///
/// ```
/// use cmdgram_core::grammar::complete::{
///     CommandAutoCompleter, MatchKind, WordListCompleter,
/// };
///
/// let test = CommandAutoCompleter::new("test")
///     .with_params(WordListCompleter::multi_word(vec![
///         "fooBar".into(),
///         "fooFoo".into(),
///     ]));
/// let completion = test.complete("test fo");
/// assert_eq!(completion.kind, MatchKind::MultipleMatchesFound);
/// assert_eq!(completion.fixed, "test foo");
/// ```
pub struct CommandAutoCompleter {
    body: CommandBodyCompleter,
    params: Option<Box<dyn Completer>>,
}

impl CommandAutoCompleter {
    /// Completer for the command called `name`, with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            body: CommandBodyCompleter::new(name),
            params: None,
        }
    }

    /// Complete parameters with the given chain after the body and options.
    #[must_use]
    pub fn with_params(mut self, chain: impl Completer + 'static) -> Self {
        self.params = Some(Box::new(chain));
        self
    }

    /// Attempt to auto-complete an input line.
    pub fn complete(&self, input: &str) -> Completion {
        let mut state = self.body.complete_at(input, &CompleteState::initial(), 0);
        if state.kind == MatchKind::AlreadyMatching {
            let at = state.position;
            state = OptionsCompleter.complete_at(input, &state, at);
        }
        if state.kind == MatchKind::AlreadyMatching {
            if let Some(params) = &self.params {
                let at = state.position;
                state = params.complete_at(input, &state, at);
            }
        }
        state.into()
    }
}
