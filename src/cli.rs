use clap::Parser;
use std::path::PathBuf;
use crate::error::{PollviewError, PollviewResult};

#[derive(Parser, Debug)]
#[command(
    name = "pollview",
    about = "Poll a JSON document and watch it change",
    version
)]
pub struct Cli {
    /// URL or file path of the JSON document (default: ./sample.json)
    pub source: Option<String>,

    /// Configuration file path (default: ./pollview.toml if present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Milliseconds between polls
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output file for logs
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print each new document as a JSON line instead of drawing a TUI
    #[arg(long, conflicts_with = "once")]
    pub headless: bool,

    /// Fetch once, print the document and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Tui,
    Headless,
    Once,
}

impl Cli {
    pub fn get_mode(&self) -> AppMode {
        if self.once {
            AppMode::Once
        } else if self.headless {
            AppMode::Headless
        } else {
            AppMode::Tui
        }
    }

    /// Validate CLI configuration and return appropriate error if invalid
    pub fn validate(&self) -> PollviewResult<()> {
        if let Some(level) = &self.log_level {
            parse_level(level)?;
        }

        if self.interval_ms == Some(0) {
            return Err(PollviewError::cli("--interval-ms must be greater than 0"));
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(PollviewError::cli(format!(
                    "Config file does not exist: {}",
                    config.display()
                )));
            }
        }

        Ok(())
    }
}

pub fn parse_level(level: &str) -> PollviewResult<tracing::Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(PollviewError::cli(format!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level
        ))),
    }
}
