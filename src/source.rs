use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::error::PollviewError;

/// Where the JSON document is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(Url),
    File(PathBuf),
}

impl FromStr for Source {
    type Err = PollviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PollviewError::invalid_source("source must not be empty"));
        }

        // Bare paths ("./sample.json", "/tmp/x.json") never parse as URLs,
        // but Windows drive letters do ("C:\x.json"), so check the scheme.
        match Url::parse(s) {
            Ok(url) => match url.scheme().to_owned().as_str() {
                "http" | "https" => Ok(Source::Http(url)),
                "file" => url
                    .to_file_path()
                    .map(Source::File)
                    .map_err(|_| PollviewError::invalid_source(format!("not a local file URL: {}", s))),
                scheme if scheme.len() == 1 => Ok(Source::File(PathBuf::from(s))),
                scheme => Err(PollviewError::invalid_source(format!(
                    "unsupported scheme '{}' in {}",
                    scheme, s
                ))),
            },
            Err(_) => Ok(Source::File(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Http(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}
