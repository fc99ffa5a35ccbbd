//! Character-class scanners underlying both combinator algebras.
//!
//! Every scanner starts at a byte offset into the full input line and either
//! matches, returning the semantic text together with the exclusive end
//! offset, or returns `None` without advancing. Matching is ASCII-based by
//! design: command words, options, and parameters are ASCII-letter tokens.

/// A successful scan: the semantic text of the token plus how far the scan
/// consumed.
///
/// `text` borrows directly from the source input — zero allocation. It covers
/// only the semantic part of the token (e.g. the letters of an option,
/// without the dashes or the leading blanks), while `end` is the byte offset
/// one past everything the scan consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scan<'a> {
    /// Borrowed slice of the source input holding the token's value.
    pub text: &'a str,
    /// Byte offset one past the last consumed character.
    pub end: usize,
}

/// Blank characters are space and tab only; newlines never appear in a
/// single input line.
fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Byte offset after a run of zero or more blanks starting at `from`.
///
/// # Safety of byte scanning
///
/// All character classes used here (blanks, ASCII letters, digits, dashes)
/// are single-byte ASCII values. UTF-8 continuation bytes are in the range
/// 0x80–0xBF and never match any of these tests, so scanning `as_bytes()`
/// without full UTF-8 decoding cannot split a multi-byte character into a
/// token.
pub fn skip_blanks(input: &str, from: usize) -> usize {
    let b = input.as_bytes();
    let mut i = from;
    while i < b.len() && is_blank(b[i]) {
        i += 1;
    }
    i
}

/// A run of one or more blanks. This is the mandatory separator between a
/// command body and its first parameter; zero blanks is a non-match.
fn scan_blanks1(input: &str, from: usize) -> Option<usize> {
    let end = skip_blanks(input, from);
    (end > from).then_some(end)
}

/// A run of one or more ASCII letters starting exactly at `from`.
fn scan_letters(input: &str, from: usize) -> Option<Scan<'_>> {
    let b = input.as_bytes();
    let mut i = from;
    while i < b.len() && b[i].is_ascii_alphabetic() {
        i += 1;
    }
    (i > from).then(|| Scan {
        text: &input[from..i],
        end: i,
    })
}

/// A command word: optional blanks, then a letter run.
///
/// This recognizes the leading word of an input line. The returned text is
/// the letter run only; `end` includes the skipped blanks.
pub fn scan_command_word(input: &str, from: usize) -> Option<Scan<'_>> {
    let start = skip_blanks(input, from);
    scan_letters(input, start)
}

/// A single-word parameter: one or more blanks, then a letter run.
///
/// The mandatory blank run is what separates a parameter from the token
/// before it; without it a zero-width parameter could piggyback on the
/// command body.
pub fn scan_single_word_param(input: &str, from: usize) -> Option<Scan<'_>> {
    let start = scan_blanks1(input, from)?;
    scan_letters(input, start)
}

/// A greedy text parameter: one or more blanks, then a letter followed by
/// any run of letters or blanks.
///
/// The run consumes to the last letter-or-blank, which in practice means to
/// the end of the line. Trailing blanks are part of the span.
pub fn scan_text_param(input: &str, from: usize) -> Option<Scan<'_>> {
    let start = scan_blanks1(input, from)?;
    let b = input.as_bytes();
    if start >= b.len() || !b[start].is_ascii_alphabetic() {
        return None;
    }
    let mut i = start + 1;
    while i < b.len() && (b[i].is_ascii_alphabetic() || is_blank(b[i])) {
        i += 1;
    }
    Some(Scan {
        text: &input[start..i],
        end: i,
    })
}

/// A lexical number starting exactly at `from`: optional minus sign, a digit
/// run, and an optional fraction (`.` followed by a digit run).
fn scan_number(input: &str, from: usize) -> Option<Scan<'_>> {
    let b = input.as_bytes();
    let mut i = from;
    if i < b.len() && b[i] == b'-' {
        i += 1;
    }
    let digits_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    if i < b.len() && b[i] == b'.' {
        let mut j = i + 1;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        // A bare trailing dot is not part of the number.
        if j > i + 1 {
            i = j;
        }
    }
    Some(Scan {
        text: &input[from..i],
        end: i,
    })
}

/// A number parameter: one or more blanks, then a lexical number.
pub fn scan_number_param(input: &str, from: usize) -> Option<Scan<'_>> {
    let start = scan_blanks1(input, from)?;
    scan_number(input, start)
}

/// A short-option cluster: one or more blanks, a single dash, then a letter
/// run. The text is the letter run (each letter is one option token).
///
/// The blank requirement means a dash glued to the previous token
/// (`list-a`) is not an option.
pub fn scan_short_option(input: &str, from: usize) -> Option<Scan<'_>> {
    let start = scan_blanks1(input, from)?;
    let b = input.as_bytes();
    if start >= b.len() || b[start] != b'-' {
        return None;
    }
    // A second dash means this is a long option, not a cluster.
    if start + 1 < b.len() && b[start + 1] == b'-' {
        return None;
    }
    scan_letters(input, start + 1)
}

/// A long option: one or more blanks, a double dash, then a letter followed
/// by any run of letters or dashes. The text is the option name without the
/// leading dashes.
pub fn scan_long_option(input: &str, from: usize) -> Option<Scan<'_>> {
    let start = scan_blanks1(input, from)?;
    let b = input.as_bytes();
    if start + 1 >= b.len() || b[start] != b'-' || b[start + 1] != b'-' {
        return None;
    }
    let name_start = start + 2;
    if name_start >= b.len() || !b[name_start].is_ascii_alphabetic() {
        return None;
    }
    let mut i = name_start + 1;
    while i < b.len() && (b[i].is_ascii_alphabetic() || b[i] == b'-') {
        i += 1;
    }
    Some(Scan {
        text: &input[name_start..i],
        end: i,
    })
}
