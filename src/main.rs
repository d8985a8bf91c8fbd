//! content-guardrails - Layered text moderation
//!
//! # Usage
//!
//! ```bash
//! # All arguments are joined into one text, so quoting is optional
//! content-guardrails Buy now!!! http://spam.com
//!
//! # Rules only, with the rule evidence in the output
//! content-guardrails --rules-only --explain "I hate all of you"
//!
//! # Treat keyword hits as immediate blocks
//! content-guardrails --keyword-policy block "you idiot"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use content_guardrails::{Config, KeywordPolicy, ModerationReport, Moderator};

/// Moderate free-form text with local rules and a remote classifier.
#[derive(Parser)]
#[command(name = "content-guardrails", version, about)]
struct Cli {
    /// Text to moderate (all arguments are joined with spaces)
    text: Vec<String>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keyword policy: evidence or block
    #[arg(short = 'k', long, value_parser = parse_policy)]
    keyword_policy: Option<KeywordPolicy>,

    /// Directory containing <category>.txt word lists
    #[arg(short, long)]
    blacklist_dir: Option<PathBuf>,

    /// Skip the remote classifier
    #[arg(long)]
    rules_only: bool,

    /// Include the rule verdict in the output
    #[arg(short, long)]
    explain: bool,
}

fn parse_policy(s: &str) -> Result<KeywordPolicy, String> {
    KeywordPolicy::from_str(s).ok_or_else(|| format!("unknown keyword policy: {}", s))
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("content_guardrails=warn")),
        )
        .init();

    let cli = Cli::parse();

    let text = cli.text.join(" ");
    if text.trim().is_empty() {
        eprintln!("Usage: content-guardrails \"some text to moderate\"");
        return ExitCode::from(2);
    }

    // Load configuration. A named file must load; search paths fall back to defaults.
    let mut config = match cli.config {
        Some(ref path) => match Config::load_from(path) {
            Ok(mut config) => {
                config.apply_env();
                config
            }
            Err(e) => {
                eprintln!("Error: failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load(),
    };

    if let Some(policy) = cli.keyword_policy {
        config.general.keyword_policy = policy;
    }
    if let Some(dir) = cli.blacklist_dir {
        config.blacklist.dir = dir.to_string_lossy().into_owned();
    }

    let moderator = if cli.rules_only {
        Moderator::rules_only(&config)
    } else {
        Moderator::from_config(&config)
    };
    let moderator = match moderator {
        Ok(moderator) => moderator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let analysis = moderator.explain(&text);
    let mut report = ModerationReport::from_result(&analysis.result);
    if cli.explain {
        report = report.with_rules(analysis.rules);
    }

    println!("{}", report.to_json_pretty());
    ExitCode::SUCCESS
}
