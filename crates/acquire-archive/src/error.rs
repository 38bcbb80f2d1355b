use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty archive: {}", archive.display())]
    EmptyArchive { archive: PathBuf },

    #[error("expected a single file, found '{}' in {}", entry.display(), archive.display())]
    UnexpectedEntryKind { archive: PathBuf, entry: PathBuf },

    #[error("expected a single file, got multiple: {}", archive.display())]
    MultipleFiles { archive: PathBuf },

    #[error("archive entry '{}' escapes the destination directory", entry.display())]
    PathTraversal { entry: PathBuf },

    #[error("{format} archives can only be decompressed to a single file")]
    DirectoryUnsupported { format: &'static str },

    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read archive {}: {source}", archive.display())]
    Read { archive: PathBuf, source: io::Error },

    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to extract '{}': {source}", path.display())]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to set permissions on {}: {source}", path.display())]
    Permissions { path: PathBuf, source: io::Error },

    #[error("failed to set access and modification times on {}: {source}", path.display())]
    Times { path: PathBuf, source: io::Error },

    #[error("failed to create link '{}' -> '{}': {source}", link.display(), target.display())]
    LinkCreationFailed {
        target: PathBuf,
        link: PathBuf,
        source: io::Error,
    },

    #[cfg(feature = "zip")]
    #[error("zip archive {} is corrupted: {source}", archive.display())]
    Zip {
        archive: PathBuf,
        source: zip::result::ZipError,
    },

    #[cfg(feature = "zstd")]
    #[error("failed to initialize zstd decoder: {0}")]
    Decoder(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
