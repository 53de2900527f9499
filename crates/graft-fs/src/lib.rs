//! Filesystem primitives for graft
//!
//! Provides structured-file loading with format detection, the missing vs.
//! malformed distinction every loader relies on, and real-path resolution.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigStore, Format};
pub use error::{Error, Result};
pub use path::{real_path, validate_relative_key};
