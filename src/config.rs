use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{PollviewError, PollviewResult};
use crate::source::Source;

pub const CONFIG_FILE: &str = "pollview.toml";
pub const DEFAULT_SOURCE: &str = "./sample.json";
pub const POLL_INTERVAL_MS: u64 = 2500;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollConfig {
    /// URL or path of the JSON document.
    pub source: String,

    /// Milliseconds between polls. Fixed once the process has started.
    pub interval_ms: u64,

    /// Log level for tracing (e.g. "info", "debug").
    pub log_level: String,

    /// Log destination. TUI mode falls back to a rolling file in the cache dir.
    pub log_file: Option<PathBuf>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.into(),
            interval_ms: POLL_INTERVAL_MS,
            log_level: "info".into(),
            log_file: None,
        }
    }
}

impl PollConfig {
    pub fn parse(s: &str) -> PollviewResult<Self> {
        let cfg: PollConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> PollviewResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            PollviewError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&raw)
    }

    /// An explicit `--config` must exist; the default `pollview.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> PollviewResult<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::load_from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Config file, then CLI flags on top.
    pub fn resolve(cli: &Cli) -> PollviewResult<Self> {
        let mut cfg = Self::load(cli.config.as_deref())?;
        if let Some(source) = &cli.source {
            cfg.source = source.clone();
        }
        if let Some(ms) = cli.interval_ms {
            cfg.interval_ms = ms;
        }
        if let Some(level) = &cli.log_level {
            cfg.log_level = level.clone();
        }
        if let Some(file) = &cli.log_file {
            cfg.log_file = Some(file.clone());
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> PollviewResult<()> {
        if self.interval_ms == 0 {
            return Err(PollviewError::config("interval_ms must be greater than 0"));
        }
        self.parsed_source()?;
        Ok(())
    }

    pub fn parsed_source(&self) -> PollviewResult<Source> {
        self.source.parse()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
