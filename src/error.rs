//! Error types for filtergen.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for filtergen operations.
///
/// Only the variants raised by [`crate::FilterBuilder::build`] abort a filter
/// directory. Unreadable includes, exclusions and revision files are logged
/// and absorbed where they happen.
#[derive(Error, Debug)]
pub enum Error {
    /// Template resource is missing
    #[error("template not found: {0}")]
    MissingTemplate(PathBuf),

    /// Metadata resource is missing
    #[error("metadata not found: {0}")]
    MissingMetadata(PathBuf),

    /// Metadata resource could not be parsed
    #[error("invalid metadata in {path}: {source}")]
    InvalidMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Root of a batch run is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Invalid dotted version string
    #[error("invalid version string: {0}")]
    InvalidVersion(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Download error
    #[error("download error: {0}")]
    Download(String),
}

/// Result type alias for filtergen operations.
pub type Result<T> = std::result::Result<T, Error>;
