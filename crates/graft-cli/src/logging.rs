//! Tracing subscriber setup
//!
//! The filter is installed behind a reload handle: logging has to work
//! while configuration is loading, but the loaded configuration may itself
//! choose the level.

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use crate::context::LogSettings;
use crate::error::{CliError, Result};

const DEFAULT_FILTER: &str = "info";

/// Handle to the installed subscriber's filter.
pub struct Logging {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned: bool,
}

/// Initialize a tracing subscriber writing compact lines to stderr.
///
/// The level comes from `RUST_LOG`, or `debug` when `verbose` is set, or
/// defaults to `info`. Either of the first two pins the level so that
/// configuration cannot change it later. A `RUST_LOG` that does not parse
/// is an error.
pub fn init(verbose: bool) -> Result<Logging> {
    let from_env = match std::env::var_os(EnvFilter::DEFAULT_ENV) {
        Some(_) => Some(EnvFilter::try_from_default_env().map_err(|e| {
            CliError::user(format!("invalid {}: {e}", EnvFilter::DEFAULT_ENV))
        })?),
        None => None,
    };
    let pinned = verbose || from_env.is_some();

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        from_env.unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
    };
    let (filter_layer, handle) = reload::Layer::new(filter);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    Ok(Logging { handle, pinned })
}

impl Logging {
    /// Apply the level chosen by the loaded configuration, unless the
    /// environment or command line already chose one.
    pub fn configure(&self, settings: &LogSettings) -> Result<()> {
        if self.pinned {
            return Ok(());
        }
        let Some(level) = settings.level.as_deref() else {
            return Ok(());
        };

        let filter = EnvFilter::try_new(level)
            .map_err(|e| CliError::user(format!("invalid log level `{level}`: {e}")))?;
        self.handle
            .reload(filter)
            .map_err(|e| CliError::Logging(e.to_string()))?;
        tracing::debug!(level, "log level set from configuration");
        Ok(())
    }
}
