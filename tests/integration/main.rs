//! Integration tests for content-guardrails

mod cli_tests;
mod config_tests;
mod remote_tests;
