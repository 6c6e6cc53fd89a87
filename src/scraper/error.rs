use std::path::PathBuf;
use thiserror::Error;

/// Why a single unit block could not be turned into a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not find {0}")]
    Missing(&'static str),

    #[error("could not parse {what}: {detail}")]
    Malformed { what: &'static str, detail: String },

    #[error("incorrect number of {what}: expected {expected}, found {found}")]
    Count {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unexpected content after {0}")]
    UnexpectedContent(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// An expected element is missing or has the wrong shape.
    Structural,
    /// The unit was recognised but its skill counts are wrong.
    DataIntegrity,
}

impl ParseError {
    pub fn malformed(what: &'static str, detail: impl Into<String>) -> Self {
        ParseError::Malformed {
            what,
            detail: detail.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseError::Count { .. } => ErrorCategory::DataIntegrity,
            _ => ErrorCategory::Structural,
        }
    }
}

/// A failure that makes the whole page unusable.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("could not find article content")]
    MissingContent,
}

/// Fetching or saving bytes failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl TransportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransportError::Io {
            path: path.into(),
            source,
        }
    }
}
