//! Explicit application context built at startup

use graft_core::{LoaderOptions, ResolvedConfig, load_config};
use serde_json::Value;

use crate::error::Result;

/// Namespace holding graft's own settings.
pub const SELF_NAMESPACE: &str = "graft";

/// Logging settings read from `graft.Log`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// An `EnvFilter` directive such as `debug` or `graft_core=trace`
    pub level: Option<String>,
}

impl LogSettings {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let level = config
            .pointer(&format!("/{SELF_NAMESPACE}/Log/Level"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { level }
    }
}

/// Everything the rest of the program needs, passed explicitly
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: ResolvedConfig,
    pub log: LogSettings,
}

impl AppContext {
    /// Load configuration and derive settings from it.
    pub fn bootstrap(options: &LoaderOptions) -> Result<Self> {
        let config = load_config(options)?;
        let log = LogSettings::from_config(&config);
        Ok(Self { config, log })
    }
}
