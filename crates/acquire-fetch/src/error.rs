//! Error types for acquire-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("query parameter '{0}' is required")]
    MissingParameter(&'static str),

    #[error("no snapshot versions in {0}")]
    NoSnapshotVersions(Url),

    #[error("invalid maven metadata at {url}: {source}")]
    InvalidMetadata {
        url: Url,
        #[source]
        source: roxmltree::Error,
    },

    #[error("{getter} does not support downloading a folder")]
    UnsupportedOperation { getter: &'static str },

    #[error("no getter registered for '{0}'")]
    UnsupportedScheme(String),

    #[error("invalid client mode, must be 'any', 'file', or 'dir': {0}")]
    InvalidMode(String),

    #[error("URL is not a local path: {0}")]
    NotALocalPath(Url),

    #[error("source path does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("destination {} already exists and is not a symlink", .0.display())]
    DestinationExists(PathBuf),

    #[error("bad response code {status} for {url}")]
    BadStatus { url: Url, status: u16 },

    #[cfg(feature = "reqwest")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("file I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
