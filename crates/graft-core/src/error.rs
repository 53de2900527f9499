//! Error types for graft-core

use std::path::PathBuf;

/// Result type for graft-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving packages and merging configuration
///
/// Every variant is fatal to the load that raised it. Absent files are never
/// reported here: a missing manifest, local config or override file is a
/// normal outcome handled by the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed top-level loader input
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A structured file exists but could not be parsed
    #[error("Failed to parse \"{path}\": {message}")]
    Parse { path: PathBuf, message: String },

    /// A manifest exists but has neither `namespace` nor `name`
    #[error("{path} is missing a `name` property")]
    MissingName { path: PathBuf },

    /// A declared dependency is not installed anywhere on the search path
    #[error("Dependency \"{dependency}\" required by \"{required_by}\" could not be found. Is it installed?")]
    DependencyNotFound {
        dependency: String,
        required_by: PathBuf,
    },

    /// Filesystem error from graft-fs
    #[error(transparent)]
    Fs(graft_fs::Error),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<graft_fs::Error> for Error {
    fn from(err: graft_fs::Error) -> Self {
        match err {
            graft_fs::Error::ConfigParse {
                path,
                format,
                message,
            } => Self::Parse {
                path,
                message: format!("invalid {format}: {message}"),
            },
            other => Self::Fs(other),
        }
    }
}
