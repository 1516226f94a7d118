use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_level, AppMode};
use crate::config::PollConfig;
use crate::error::{PollviewError, PollviewResult};

fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pollview")
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> PollviewResult<EnvFilter> {
    let level = parse_level(level)?;
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase())))
}

/// Installs the global subscriber. The TUI owns stdout, so it always logs to
/// a file; the other modes log to stderr unless a file is configured.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(cfg: &PollConfig, mode: AppMode) -> PollviewResult<Option<WorkerGuard>> {
    let filter = env_filter(&cfg.log_level)?;

    let appender = match (&cfg.log_file, mode) {
        (Some(path), _) => Some(file_appender(path)?),
        (None, AppMode::Tui) => {
            let dir = default_log_dir();
            std::fs::create_dir_all(&dir)?;
            Some(tracing_appender::rolling::daily(dir, "pollview.log"))
        }
        (None, _) => None,
    };

    let result = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map(|_| Some(guard))
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map(|_| None),
    };
    result.map_err(|e| PollviewError::config(format!("cannot install logger: {}", e)))
}

fn file_appender(path: &Path) -> PollviewResult<tracing_appender::rolling::RollingFileAppender> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| PollviewError::config(format!("log file has no name: {}", path.display())))?;
    std::fs::create_dir_all(&dir)?;
    Ok(tracing_appender::rolling::never(dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_level() {
        assert!(env_filter("chatty").is_err());
    }

    #[test]
    fn file_appender_creates_parent_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("pollview.log");
        file_appender(&path).unwrap();
        assert!(tmp.path().join("logs").is_dir());
    }

    #[test]
    fn directory_path_is_rejected() {
        assert!(file_appender(Path::new("/")).is_err());
    }
}
