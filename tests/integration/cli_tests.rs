//! Integration tests for the command-line binary

use std::io::Write;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::support::shipped_dir;

/// Config pointing at the shipped word lists, with no remote requirement
fn config_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "[blacklist]\ndir = {:?}\n",
        shipped_dir().to_string_lossy()
    )
    .unwrap();
    file
}

fn run(args: &[&str]) -> Output {
    let config = config_file();
    Command::new(env!("CARGO_BIN_EXE_content-guardrails"))
        .arg("--config")
        .arg(config.path())
        .arg("--blacklist-dir")
        .arg(shipped_dir())
        .args(args)
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("ANTHROPIC_MODEL")
        .env_remove("BLACKLIST_DIR")
        .env_remove("GUARDRAILS_KEYWORD_POLICY")
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_no_text_exits_with_usage() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_arguments_are_joined_into_one_text() {
    // "buy now" only matches once "Buy" and "now" are joined with a space
    let output = run(&["--rules-only", "Buy", "now", "http://x"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["status"], "BLOCKED");
    assert_eq!(json["source"], "rules");
    assert!(json["reason"].as_str().unwrap().contains("spam"));
}

#[test]
fn test_rules_only_reports_skipped() {
    let output = run(&["--rules-only", "Hello"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["skipped"], true);
    assert!(json.get("status").is_none());
    assert!(json.get("rules").is_none());
}

#[test]
fn test_explain_includes_rule_verdict() {
    let output = run(&["--rules-only", "--explain", "I hate all of you"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert!(json["rules"].is_object());
    assert_eq!(json["rules"]["flagged"]["hate_speech"]["keywords"][0], "hate");
}

#[test]
fn test_keyword_policy_flag_blocks_on_keywords() {
    let output = run(&["--rules-only", "--keyword-policy", "block", "you idiot"]);
    let json = stdout_json(&output);
    assert_eq!(json["status"], "BLOCKED");
    assert!(json["reason"].as_str().unwrap().contains("profanity via keywords"));
}

#[test]
fn test_missing_config_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_content-guardrails"))
        .args(["--config", "/nonexistent/content-guardrails.toml", "Hello"])
        .env_remove("ANTHROPIC_API_KEY")
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load config"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_required_remote_without_key_fails() {
    let mut config = config_file();
    write!(config, "\n[remote]\nrequired = true\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_content-guardrails"))
        .arg("--config")
        .arg(config.path())
        .arg("Hello")
        .env_remove("ANTHROPIC_API_KEY")
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ANTHROPIC_API_KEY"));
}
