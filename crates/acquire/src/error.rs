use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("relative source path '{0}' needs a working directory")]
    RelativePath(String),

    #[error("invalid source '{raw}': {source}")]
    InvalidSource {
        raw: String,
        #[source]
        source: url::ParseError,
    },

    #[error("download not supported for scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("unknown archive format '{0}'")]
    UnknownArchive(String),

    #[error("error creating temporary directory: {0}")]
    TempDir(#[source] io::Error),

    #[error("error creating {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Fetch(#[from] acquire_fetch::FetchError),

    #[error("error extracting archive: {0}")]
    Extract(#[from] acquire_archive::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
