use std::path::PathBuf;

use sentitree_core::SentitreeError;
use thiserror::Error;

/// Errors raised while fetching or loading a corpus.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No registered source carries this name.
    #[error("unknown dataset: {0:?}")]
    UnknownDataset(String),

    /// The HTTP request failed or returned a non-success status.
    #[error("download of {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The archive could not be read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The archive extension is not one we can unpack.
    #[error("unsupported archive format: {}", .0.display())]
    UnsupportedArchive(PathBuf),

    /// A split file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of a split file failed to parse or map.
    #[error("{}:{line}: {source}", path.display())]
    Line {
        path: PathBuf,
        line: usize,
        #[source]
        source: SentitreeError,
    },

    #[error(transparent)]
    Core(#[from] SentitreeError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
