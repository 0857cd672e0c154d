// src/error.rs

//! Error types for the recipe conversion engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by version parsing, recipe loading and conversion
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse AGP version '{0}'")]
    MalformedVersion(String),

    #[error("Missing recipe descriptor at {0}")]
    MissingDescriptor(PathBuf),

    #[error("Malformed recipe descriptor {path}: {reason}")]
    MalformedDescriptor { path: PathBuf, reason: String },

    #[error("destinationFolder value ('{value}') cannot contain a path separator ({recipe})")]
    InvalidDestination { value: String, recipe: PathBuf },

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Destination {0} is not empty, use --overwrite to overwrite it")]
    DestinationNotEmpty(PathBuf),

    #[error("Recipe {recipe} is not compliant with AGP {version}")]
    NonCompliantRecipe { recipe: String, version: String },

    #[error("Download failed: {0}")]
    DownloadFailure(String),

    #[error("Malformed release metadata feed: {0}")]
    MalformedFeed(String),

    #[error("Malformed version mapping (line {line}): {reason}")]
    MalformedVersionMapping { line: usize, reason: String },

    #[error("No version mapping for AGP {0}, make sure it's present in version_mappings.txt")]
    MissingVersionMapping(String),

    #[error("Unable to find a published AGP version for {0}")]
    MissingPublishedRelease(String),

    #[error("Missing file: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Gradle task execution failed: {0}")]
    TaskExecution(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
