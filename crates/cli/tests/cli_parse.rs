//! End-to-end tests for the `cmdgram parse` and `cmdgram batch` subcommands.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn cmdgram_cmd() -> Command {
    Command::new(cargo::cargo_bin!("cmdgram"))
}

fn write_temp_file(name: &str, content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write temp file");
    (dir, path.to_string_lossy().to_string())
}

const DEFS: &str = r#"{
  "keywords": ["lantern", "lanyard"],
  "commands": [
    { "name": "man",
      "params": [{ "kind": "word", "candidates": ["man", "list", "take"] }] },
    { "name": "list" },
    { "name": "take",
      "options": [{ "short": "q" }, { "long": "force" }],
      "params": [{ "kind": "word", "keywords": true }] },
    { "name": "wait",
      "params": [{ "kind": "number" }] }
  ]
}"#;

fn parse_json(defs_path: &str, line: &str) -> (Option<i32>, serde_json::Value) {
    let output = cmdgram_cmd()
        .args(["parse", defs_path, line, "--output", "json"])
        .output()
        .expect("run parse");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json = serde_json::from_str(&stdout).expect("valid parse json");
    (output.status.code(), json)
}

#[test]
fn parse_recognizes_a_well_formed_line() {
    let (_dir, defs) = write_temp_file("defs.json", DEFS);
    let (code, json) = parse_json(&defs, "man list");
    assert_eq!(code, Some(0));
    assert_eq!(json["kind"], "recognized");
    assert_eq!(json["outcome"]["command"], "man");
    assert_eq!(json["outcome"]["params"][0], "list");
}

#[test]
fn parse_collects_options_and_params() {
    let (_dir, defs) = write_temp_file("defs.json", DEFS);
    let (code, json) = parse_json(&defs, "take -q --force lantern");
    assert_eq!(code, Some(0));
    assert_eq!(json["outcome"]["options"][0], "q");
    assert_eq!(json["outcome"]["options"][1], "force");
    assert_eq!(json["outcome"]["params"][0], "lantern");
}

#[test]
fn parse_stores_numbers_in_canonical_form() {
    let (_dir, defs) = write_temp_file("defs.json", DEFS);
    let (code, json) = parse_json(&defs, "wait 5.0");
    assert_eq!(code, Some(0));
    assert_eq!(json["outcome"]["params"][0], "5");
}

#[test]
fn parse_reports_a_missing_parameter() {
    let (_dir, defs) = write_temp_file("defs.json", DEFS);
    let (code, json) = parse_json(&defs, "man");
    assert_eq!(code, Some(1));
    assert_eq!(json["kind"], "missing_param");
    assert_eq!(json["command"], "man");
}

#[test]
fn parse_reports_an_unrecognized_option() {
    let (_dir, defs) = write_temp_file("defs.json", DEFS);
    let (code, json) = parse_json(&defs, "take -z lantern");
    assert_eq!(code, Some(1));
    assert_eq!(json["kind"], "unrecognized_option");
    assert_eq!(json["command"], "take");
}

#[test]
fn parse_extracts_the_unknown_head_word() {
    let (_dir, defs) = write_temp_file("defs.json", DEFS);
    let (code, json) = parse_json(&defs, "frotz the lamp");
    assert_eq!(code, Some(1));
    assert_eq!(json["kind"], "unknown_command");
    assert_eq!(json["word"], "frotz");
}

#[test]
fn malformed_definitions_exit_with_usage_code() {
    let (_dir, defs) = write_temp_file("defs.json", "{ not json");
    let output = cmdgram_cmd()
        .args(["parse", &defs, "man", "--output", "json"])
        .output()
        .expect("run parse");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("malformed definitions"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn duplicate_definitions_exit_with_usage_code() {
    let (_dir, defs) = write_temp_file(
        "defs.json",
        r#"{ "commands": [{ "name": "man" }, { "name": "MAN" }] }"#,
    );
    let output = cmdgram_cmd()
        .args(["parse", &defs, "man"])
        .output()
        .expect("run parse");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn batch_emits_one_json_line_per_input_line() {
    let (_dir, defs) = write_temp_file("defs.json", DEFS);
    let (_input_dir, input) = write_temp_file("lines.txt", "man list\n\nfrotz\n");

    let output = cmdgram_cmd()
        .args(["batch", &defs, &input])
        .output()
        .expect("run batch");
    // One line failed to parse.
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "blank lines are skipped: {stdout}");

    let first: serde_json::Value = serde_json::from_str(lines[0]).expect("valid batch json");
    let second: serde_json::Value = serde_json::from_str(lines[1]).expect("valid batch json");
    assert_eq!(first["kind"], "recognized");
    assert_eq!(second["kind"], "unknown_command");
}

#[test]
fn batch_of_recognized_lines_succeeds() {
    let (_dir, defs) = write_temp_file("defs.json", DEFS);
    let (_input_dir, input) = write_temp_file("lines.txt", "list\ntake --force lanyard\n");

    let output = cmdgram_cmd()
        .args(["batch", &defs, &input])
        .output()
        .expect("run batch");
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
}
