//! Integration tests for configuration loading

use std::env;
use std::io::Write;

use content_guardrails::{Category, Config, KeywordPolicy, ModerationError, Moderator};
use tempfile::{NamedTempFile, TempDir};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
        [general]
        keyword_policy = "block"

        [blacklist]
        dir = "/srv/lists"

        [remote]
        model = "claude-3-haiku-20240307"
        timeout_secs = 10
        "#,
    );
    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.general.keyword_policy, KeywordPolicy::Block);
    assert_eq!(config.blacklist.dir, "/srv/lists");
    assert_eq!(config.remote.model, "claude-3-haiku-20240307");
    assert_eq!(config.remote.timeout_secs, 10);
    // Unset keys keep their defaults
    assert_eq!(config.remote.max_tokens, 400);
}

#[test]
fn test_invalid_toml_is_config_parse_error() {
    let file = write_config("[general\nkeyword_policy = ");
    let err = Config::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ModerationError::ConfigParse(_)));
}

#[test]
fn test_unknown_policy_is_rejected() {
    let file = write_config("[general]\nkeyword_policy = \"paranoid\"\n");
    assert!(Config::load_from(file.path()).is_err());
}

#[test]
fn test_configured_patterns_extend_registry() {
    let lists_dir = TempDir::new().unwrap();
    let file = write_config(&format!(
        r#"
        [blacklist]
        dir = "{}"

        [[rules.patterns]]
        category = "spam"
        pattern = "wire\\s+transfer\\s+fee"
        "#,
        lists_dir.path().display()
    ));
    let config = Config::load_from(file.path()).unwrap();
    let moderator = Moderator::rules_only(&config).unwrap();

    let verdict = moderator.check_rules("Pay the WIRE TRANSFER FEE today");
    assert!(verdict.is_blocked());
    assert!(verdict.is_flagged(Category::Spam));
    assert!(verdict.block_reasons()[0].contains("spam via regex"));
}

#[test]
fn test_invalid_configured_pattern_fails_construction() {
    let mut config = Config::default();
    config.rules.patterns.push(content_guardrails::config::PatternEntry {
        category: Category::Harassment,
        pattern: "[unterminated".to_string(),
    });
    let err = Moderator::rules_only(&config).err().unwrap();
    assert!(matches!(err, ModerationError::InvalidPattern { .. }));
}

#[test]
fn test_environment_overrides() {
    env::set_var("ANTHROPIC_MODEL", "claude-test-model");
    env::set_var("GUARDRAILS_KEYWORD_POLICY", "block");

    let mut config = Config::default();
    config.apply_env();

    env::remove_var("ANTHROPIC_MODEL");
    env::remove_var("GUARDRAILS_KEYWORD_POLICY");

    assert_eq!(config.remote.model, "claude-test-model");
    assert_eq!(config.general.keyword_policy, KeywordPolicy::Block);
}

#[test]
fn test_unreadable_word_list_fails_construction() {
    let lists_dir = TempDir::new().unwrap();
    std::fs::create_dir(lists_dir.path().join("spam.txt")).unwrap();

    let mut config = Config::default();
    config.blacklist.dir = lists_dir.path().to_string_lossy().into_owned();
    let err = Moderator::rules_only(&config).err().unwrap();
    assert!(matches!(err, ModerationError::Io(_)));
}
