//! Command-line interface argument parsing.
//!
//! The tracker takes no arguments that change what a run does; flags only
//! choose the config file and how chatty the logs are.

use clap::Parser;
use std::path::PathBuf;

/// Visibility Tracker - weekly brand visibility across AI assistants
///
/// Asks ChatGPT, Claude and Gemini a fixed set of buyer questions, counts
/// how often the brand is mentioned, stores the week's results and posts a
/// summary to Slack.
///
/// Requires OPENAI_API_KEY, ANTHROPIC_API_KEY, GEMINI_API_KEY and
/// SLACK_WEBHOOK_URL in the environment (or a .env file).
///
/// Examples:
///   visibility-tracker
///   visibility-tracker --config tracker.toml --verbose
///   visibility-tracker --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .visibility-tracker.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .visibility-tracker.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref config_path) = self.config {
            if !config_path.is_file() {
                return Err(format!(
                    "Config file does not exist: {}",
                    config_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
