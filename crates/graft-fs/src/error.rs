//! Error types for graft-fs

use std::path::PathBuf;

/// Result type for graft-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in graft-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} file at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error means the file (or a parent directory) is absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } => crate::io::is_missing(source),
            _ => false,
        }
    }
}

