//! `cmdgram` — run the grammar engine from a shell.
//!
//! Loads a JSON definitions file (see [`defs`]), builds the combinator
//! trees once, and exposes dispatch and completion over single lines or a
//! batch of lines.
//!
//! Exit codes: 0 when the input was recognized or completed, 1 when it was
//! not, 2 on usage or definitions errors.

mod defs;
mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cmdgram_core::grammar::complete::MatchKind;
use cmdgram_core::registry::{LineDisposition, Registry};

use crate::render::{Format, render_completion, render_disposition};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "cmdgram",
    version,
    about = "Command grammar engine — parse and auto-complete command lines against a definitions file"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse one command line and print what the registry made of it.
    Parse {
        /// Path to the JSON definitions file.
        defs: String,
        /// The command line to parse (quote it).
        line: String,
    },

    /// Auto-complete a partial command line.
    Complete {
        /// Path to the JSON definitions file.
        defs: String,
        /// The partial command line to complete (quote it).
        line: String,
    },

    /// Parse every line of a file (or stdin), one JSON result per line.
    Batch {
        /// Path to the JSON definitions file.
        defs: String,
        /// Input file; reads stdin when omitted.
        file: Option<String>,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Parse { defs, line } => cmd_parse(&defs, &line, format),
        Cmd::Complete { defs, line } => cmd_complete(&defs, &line, format),
        Cmd::Batch { defs, file } => cmd_batch(&defs, file.as_deref())?,
    }

    Ok(())
}

/// Load the registry or exit with the usage/definitions error code.
fn load_registry(path: &str) -> Registry {
    let result = fs::read_to_string(path)
        .with_context(|| format!("reading definitions file `{path}`"))
        .and_then(|json| {
            defs::load_registry(&json)
                .with_context(|| format!("loading definitions from `{path}`"))
        });
    match result {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(2);
        }
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(defs_path: &str, line: &str, format: Format) {
    let registry = load_registry(defs_path);
    let disposition = registry.dispatch(line);
    render_disposition(line, &disposition, format);

    if !matches!(disposition, LineDisposition::Recognized { .. }) {
        process::exit(1);
    }
}

fn cmd_complete(defs_path: &str, line: &str, format: Format) {
    let registry = load_registry(defs_path);
    let completion = registry.autocomplete(line);
    render_completion(&completion, format);

    if completion.kind == MatchKind::NotMatching {
        process::exit(1);
    }
}

fn cmd_batch(defs_path: &str, file: Option<&str>) -> Result<()> {
    let registry = load_registry(defs_path);

    let input = match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading input file `{path}`"))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    // Batch output is line-oriented JSON regardless of --output, so it can
    // be piped into line-at-a-time consumers.
    let mut all_recognized = true;
    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let disposition = registry.dispatch(line);
        all_recognized &= matches!(disposition, LineDisposition::Recognized { .. });
        println!("{}", serde_json::to_string(&disposition)?);
    }

    if !all_recognized {
        process::exit(1);
    }
    Ok(())
}
