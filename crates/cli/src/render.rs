//! Result rendering for the `cmdgram` binary.
//!
//! Parse failures get coloured, caret-annotated output via ariadne when the
//! terminal is interactive; everything falls back to structured JSON when
//! the output is piped or when the user explicitly asks for it.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use cmdgram_core::grammar::complete::{Completion, MatchKind};
use cmdgram_core::grammar::dump::to_pretty_json;
use cmdgram_core::registry::LineDisposition;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for result rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, caret-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve an explicit request, or detect from whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Dispatch results ────────────────────────────────────────────────────

/// Render what the registry made of one line.
///
/// - `Pretty` → recognized outcomes to stdout, failures as caret reports on
///   stderr.
/// - `Json`   → one serialized [`LineDisposition`] object to stdout.
pub(crate) fn render_disposition(line: &str, disposition: &LineDisposition, format: Format) {
    if format == Format::Json {
        println!("{}", to_pretty_json(disposition));
        return;
    }

    match disposition {
        LineDisposition::Recognized { outcome } => {
            println!("ok: {}", outcome.command.as_deref().unwrap_or_default());
            if !outcome.params.is_empty() {
                println!("  params:  {}", outcome.params.join(", "));
            }
            if !outcome.options.is_empty() {
                println!("  options: {}", outcome.options.join(", "));
            }
        }
        LineDisposition::UnknownCommand { word } => {
            // No position to point at: the line matched no command at all.
            eprintln!("error: unknown command `{word}`");
        }
        LineDisposition::MissingParam { command, position } => {
            report_at(
                line,
                *position,
                &format!("`{command}` is missing a required parameter"),
            );
        }
        LineDisposition::UnrecognizedOption { command, position } => {
            report_at(
                line,
                *position,
                &format!("`{command}` does not accept this option"),
            );
        }
    }
}

/// Emit one ariadne report pointing at a byte offset of the input line.
fn report_at(line: &str, position: usize, message: &str) {
    // Clamp to the line length so a failure at end-of-input still renders.
    let start = position.min(line.len());
    let end = (start + 1).min(line.len()).max(start);

    let mut cache = ("<input>", Source::from(line));
    Report::build(ReportKind::Error, ("<input>", start..end))
        .with_message(message)
        .with_config(Config::default().with_compact(false))
        .with_label(
            Label::new(("<input>", start..end))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint(&mut cache)
        .ok();
}

// ── Completion results ──────────────────────────────────────────────────

/// Render an aggregated completion.
///
/// - `Pretty` → the completed line to stdout, notes to stderr.
/// - `Json`   → one serialized [`Completion`] object to stdout.
pub(crate) fn render_completion(completion: &Completion, format: Format) {
    if format == Format::Json {
        println!("{}", to_pretty_json(completion));
        return;
    }

    match completion.kind {
        MatchKind::NotMatching => eprintln!("no completion"),
        MatchKind::MultipleMatchesFound => {
            println!("{}", completion.fixed);
            eprintln!("note: multiple candidates share this prefix");
        }
        MatchKind::AlreadyMatching | MatchKind::SingleMatchFound => {
            println!("{}", completion.fixed);
        }
    }
}
