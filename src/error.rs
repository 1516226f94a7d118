use thiserror::Error;

/// Why a single fetch of the source failed.
///
/// The poll loop never propagates these: a failed cycle is logged and the
/// previous state stays on screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Response is not valid JSON: {0}")]
    Decode(String),

    #[error("Could not read source file: {0}")]
    Io(String),
}

impl FetchError {
    pub fn network<S: Into<String>>(msg: S) -> Self {
        FetchError::Network(msg.into())
    }

    pub fn decode<S: Into<String>>(msg: S) -> Self {
        FetchError::Decode(msg.into())
    }

    pub fn io<S: Into<String>>(msg: S) -> Self {
        FetchError::Io(msg.into())
    }

    /// Short label for the status bar.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Status(_) => "status",
            FetchError::Decode(_) => "decode",
            FetchError::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::network(err.to_string())
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum PollviewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CLI argument error: {0}")]
    Cli(String),

    #[error("Invalid source: {0}")]
    Source(String),

    #[error("TUI error: {0}")]
    Tui(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PollviewError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PollviewError::Config(msg.into())
    }

    pub fn cli<S: Into<String>>(msg: S) -> Self {
        PollviewError::Cli(msg.into())
    }

    pub fn invalid_source<S: Into<String>>(msg: S) -> Self {
        PollviewError::Source(msg.into())
    }

    pub fn tui<S: Into<String>>(msg: S) -> Self {
        PollviewError::Tui(msg.into())
    }
}

/// Result type alias for pollview operations
pub type PollviewResult<T> = Result<T, PollviewError>;
