//! TextShield CLI
//!
//! Runs the detection and decision pipeline from the command line. Results go
//! to stdout as JSON; logs go to stderr.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::ShieldConfig;
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use textshield_policy::Guard;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit status for `evaluate --fail-on-block` when the text is blocked
const BLOCKED_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(name = "textshield")]
#[command(about = "TextShield - sensitive data detection and enforcement for LLM traffic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TEXTSHIELD_CONFIG",
        global = true
    )]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate text and print the decision
    Evaluate {
        /// Text to evaluate (read from stdin when omitted)
        text: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Exit with status 2 when the decision is block
        #[arg(long)]
        fail_on_block: bool,
    },
    /// Print the normalized text and its resolved hits
    Detect {
        /// Text to scan (read from stdin when omitted)
        text: Option<String>,
    },
    /// Print the text with every detected value masked
    Redact {
        /// Text to redact (read from stdin when omitted)
        text: Option<String>,
    },
    /// Print the effective configuration
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ShieldConfig::from_file(path)?,
        None => ShieldConfig::default(),
    };

    // Merge environment variables (they override config file)
    config.merge_env();

    init_tracing(&config)?;

    if let Some(path) = &cli.config {
        info!("Loaded configuration from {}", path.display());
    }

    match cli.command {
        Commands::Evaluate {
            text,
            pretty,
            fail_on_block,
        } => {
            let text = read_input(text)?;
            let classifier = textshield_semantic::load_classifier(&config.semantic).await;
            let guard = Guard::new(config.guard_config(), classifier)?;

            let decision = guard.evaluate(&text).await;
            let output = if pretty {
                serde_json::to_string_pretty(&decision)?
            } else {
                serde_json::to_string(&decision)?
            };
            println!("{}", output);

            if fail_on_block && decision.is_blocked() {
                return Ok(ExitCode::from(BLOCKED_EXIT_CODE));
            }
        }
        Commands::Detect { text } => {
            let text = read_input(text)?;
            let guard = Guard::without_semantic(config.guard_config())?;

            let scan = guard.detect(&text);
            let heuristics = guard.heuristics().triggered_categories(&scan.text);
            let output = json!({
                "text": scan.text,
                "hits": scan.hits,
                "heuristics": heuristics,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Redact { text } => {
            let text = read_input(text)?;
            let guard = Guard::without_semantic(config.guard_config())?;
            println!("{}", guard.redact(&text));
        }
        Commands::CheckConfig => {
            println!("{}", serde_yaml::to_string(&config.redacted())?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// stderr subscriber; `RUST_LOG` wins over `logging.level`
fn init_tracing(config: &ShieldConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .with_context(|| format!("Invalid log level '{}'", config.logging.level))?;

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

fn read_input(text: Option<String>) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "textshield",
            "--config",
            "shield.yaml",
            "evaluate",
            "hello",
            "--pretty",
            "--fail-on-block",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("shield.yaml")));
        match cli.command {
            Commands::Evaluate {
                text,
                pretty,
                fail_on_block,
            } => {
                assert_eq!(text.as_deref(), Some("hello"));
                assert!(pretty);
                assert!(fail_on_block);
            }
            _ => panic!("expected evaluate"),
        }
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::try_parse_from(["textshield", "check-config"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig));
    }

    #[test]
    fn test_read_input_prefers_argument() {
        assert_eq!(read_input(Some("abc".to_string())).unwrap(), "abc");
    }
}
