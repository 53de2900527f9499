//! Format-agnostic structured file loading

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{Error, Result, io};

/// Structured data formats understood by [`ConfigStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Detect the format from a file extension.
    ///
    /// - `.json` -> JSON
    /// - `.toml` -> TOML
    /// - `.yaml`, `.yml` -> YAML
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &[u8]) -> std::result::Result<T, String> {
        match self {
            Self::Json => serde_json::from_slice(content).map_err(|e| e.to_string()),
            Self::Toml => {
                let text = std::str::from_utf8(content).map_err(|e| e.to_string())?;
                toml::from_str(text).map_err(|e| e.to_string())
            }
            Self::Yaml => serde_yaml::from_slice(content).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Toml => f.write_str("TOML"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

/// Loads structured files, detecting the format from the file extension.
///
/// A file that does not exist is not an error for
/// [`ConfigStore::load_optional`]; a file that exists but cannot be parsed is.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and parse a file that must exist.
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = Format::from_path(path)?;
        let content = io::read_bytes(path)?;
        Self::parse_with(format, path, &content)
    }

    /// Load and parse a file, returning `None` if it does not exist.
    ///
    /// The format is detected before touching the disk, so an unsupported
    /// extension is reported even for an absent file.
    pub fn load_optional<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let format = Format::from_path(path)?;
        match io::read_bytes_optional(path)? {
            Some(content) => Self::parse_with(format, path, &content).map(Some),
            None => Ok(None),
        }
    }

    fn parse_with<T: DeserializeOwned>(format: Format, path: &Path, content: &[u8]) -> Result<T> {
        format.parse(content).map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        })
    }
}
