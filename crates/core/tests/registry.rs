//! Tests for registry dispatch and completion disambiguation.

mod common;

use cmdgram_core::command::OptionDef;
use cmdgram_core::grammar::complete::{CommandAutoCompleter, MatchKind, WordListCompleter};
use cmdgram_core::grammar::parse::{CommandParser, SingleWordTextParameter};
use cmdgram_core::registry::{LineDisposition, Registry, RegistryError};

use common::{GrammarCommand, Kw};

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|w| w.to_string()).collect()
}

/// man + list, the built-in pair most hosts start from.
fn man_list_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_command(Box::new(GrammarCommand::new(
            "man",
            CommandParser::new("man").with_params(SingleWordTextParameter),
            CommandAutoCompleter::new("man")
                .with_params(WordListCompleter::multi_word(words(&["man", "list"]))),
        )))
        .unwrap();
    registry
        .register_command(Box::new(GrammarCommand::bare("list")))
        .unwrap();
    registry
}

// ─── Registration ───────────────────────────────────────────────────────

#[test]
fn duplicate_names_are_rejected_case_insensitively() {
    let mut registry = Registry::new();
    registry
        .register_command(Box::new(GrammarCommand::bare("man")))
        .unwrap();
    let err = registry
        .register_command(Box::new(GrammarCommand::bare("Man")))
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateCommand("man".to_string()));
}

#[test]
fn lookup_is_exact_and_case_sensitive() {
    let registry = man_list_registry();
    assert!(registry.find_command("man").is_some());
    assert!(registry.find_command("Man").is_none());
    assert_eq!(registry.command_names(), vec!["man", "list"]);
}

#[test]
fn keywords_are_listed_in_registration_order() {
    let mut registry = Registry::new();
    registry.register_keyword(Box::new(Kw("lantern")));
    registry.register_keyword(Box::new(Kw("rope")));
    assert_eq!(registry.keyword_names(), vec!["lantern", "rope"]);
}

// ─── Dispatch ───────────────────────────────────────────────────────────

#[test]
fn dispatch_recognizes_a_well_formed_line() {
    let registry = man_list_registry();
    match registry.dispatch("man list") {
        LineDisposition::Recognized { outcome } => {
            assert_eq!(outcome.command.as_deref(), Some("man"));
            assert_eq!(outcome.params, vec!["list"]);
        }
        other => panic!("expected recognition, got {other:?}"),
    }
}

#[test]
fn dispatch_tries_commands_in_registration_order() {
    let registry = man_list_registry();
    match registry.dispatch("list") {
        LineDisposition::Recognized { outcome } => {
            assert_eq!(outcome.command.as_deref(), Some("list"));
        }
        other => panic!("expected recognition, got {other:?}"),
    }
}

#[test]
fn dispatch_reports_a_missing_parameter() {
    let registry = man_list_registry();
    match registry.dispatch("man") {
        LineDisposition::MissingParam { command, .. } => assert_eq!(command, "man"),
        other => panic!("expected missing-param, got {other:?}"),
    }
}

#[test]
fn dispatch_reports_an_unrecognized_option() {
    let mut registry = Registry::new();
    registry
        .register_command(Box::new(GrammarCommand::new(
            "list",
            CommandParser::new("list").with_options(vec![OptionDef::short("a")]),
            CommandAutoCompleter::new("list"),
        )))
        .unwrap();
    match registry.dispatch("list -z") {
        LineDisposition::UnrecognizedOption { command, .. } => assert_eq!(command, "list"),
        other => panic!("expected unrecognized-option, got {other:?}"),
    }
}

#[test]
fn dispatch_extracts_the_unknown_head_word() {
    let registry = man_list_registry();
    match registry.dispatch("frotz the lamp") {
        LineDisposition::UnknownCommand { word } => assert_eq!(word, "frotz"),
        other => panic!("expected unknown command, got {other:?}"),
    }
}

#[test]
fn dispatch_falls_back_to_the_whole_line() {
    let registry = man_list_registry();
    match registry.dispatch("?!") {
        LineDisposition::UnknownCommand { word } => assert_eq!(word, "?!"),
        other => panic!("expected unknown command, got {other:?}"),
    }
}

#[test]
fn empty_registry_knows_nothing() {
    let registry = Registry::new();
    match registry.dispatch("man") {
        LineDisposition::UnknownCommand { word } => assert_eq!(word, "man"),
        other => panic!("expected unknown command, got {other:?}"),
    }
}

// ─── Completion disambiguation ──────────────────────────────────────────

#[test]
fn one_exact_match_wins_over_a_prefix_match() {
    let mut registry = Registry::new();
    registry
        .register_command(Box::new(GrammarCommand::bare("bar")))
        .unwrap();
    registry
        .register_command(Box::new(GrammarCommand::bare("barn")))
        .unwrap();
    // "bar" matches the first command exactly and is a prefix of the
    // second; the exact match takes precedence.
    let completion = registry.autocomplete("bar");
    assert_eq!(completion.kind, MatchKind::AlreadyMatching);
    assert_eq!(completion.fixed, "bar");
}

#[test]
fn one_partial_match_is_returned() {
    let registry = man_list_registry();
    let completion = registry.autocomplete("lis");
    assert_eq!(completion.kind, MatchKind::SingleMatchFound);
    assert_eq!(completion.fixed, "list");
}

#[test]
fn competing_partial_matches_complete_to_nothing() {
    let mut registry = Registry::new();
    registry
        .register_command(Box::new(GrammarCommand::bare("list")))
        .unwrap();
    registry
        .register_command(Box::new(GrammarCommand::bare("listen")))
        .unwrap();
    let completion = registry.autocomplete("li");
    assert_eq!(completion.kind, MatchKind::NotMatching);
    assert_eq!(completion.fixed, "");
}

#[test]
fn no_match_at_all_completes_to_nothing() {
    let registry = man_list_registry();
    let completion = registry.autocomplete("xyzzy");
    assert_eq!(completion.kind, MatchKind::NotMatching);
    assert_eq!(completion.fixed, "");
}

#[test]
fn dispatch_and_completion_are_deterministic() {
    let registry = man_list_registry();
    assert_eq!(registry.dispatch("man li"), registry.dispatch("man li"));
    assert_eq!(registry.autocomplete("ma"), registry.autocomplete("ma"));
}
