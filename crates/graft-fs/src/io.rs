//! Blocking reads that tell "absent" apart from "unreadable"

use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Whether an I/O error means the path does not exist.
///
/// `NotADirectory` counts as missing: asking for `a/package.json` where `a`
/// is a regular file is the same as asking for a file that is not there.
pub fn is_missing(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}

/// Read the raw content of a file.
///
/// Decoding is left to the parser, so bad encoding surfaces as a parse
/// failure rather than an I/O error.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Read the raw content of a file, returning `None` when it does not exist.
///
/// Any other failure (permissions, reading a directory, ...) is an error.
pub fn read_bytes_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if is_missing(&e) => {
            tracing::trace!(path = %path.display(), "file absent");
            Ok(None)
        }
        Err(e) => Err(Error::io(path, e)),
    }
}
