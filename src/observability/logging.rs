//! # Structured Logging
//!
//! Initializes the `tracing` subscriber. `RUST_LOG` takes precedence; otherwise the
//! level is `info`, or `debug` when verbose output is requested.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::errors::{Result, SmokeError};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = SmokeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(SmokeError::config(format!(
                "Unsupported log format: '{}'. Use 'text' or 'json'.",
                s
            ))),
        }
    }
}

/// Build the level filter, preferring `RUST_LOG` when it is set
pub fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber
pub fn init_logging(verbose: bool, format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_err() {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
}
