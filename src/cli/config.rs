//! Configuration file handling for the smoke-test CLI
//!
//! Manages loading and saving configuration from ~/.api-smoke/config.toml and
//! resolving run settings from flags, the config file, the environment and defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use crate::errors::{Result, SmokeError};
use crate::smoke::probes::DEFAULT_USER_ID;
use crate::DEFAULT_BASE_URL;

pub const BASE_URL_ENV: &str = "API_SMOKE_BASE_URL";
pub const TIMEOUT_ENV: &str = "API_SMOKE_TIMEOUT";
pub const USER_ID_ENV: &str = "API_SMOKE_USER_ID";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

/// CLI configuration stored in ~/.api-smoke/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmokeConfig {
    /// Base URL of the API under test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// User id probed by the user endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Fixed email instead of a generated one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Fixed password instead of the default one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl SmokeConfig {
    /// Get the default configuration file path (~/.api-smoke/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| SmokeError::config("Unable to determine home directory"))?;

        let mut path = PathBuf::from(home);
        path.push(".api-smoke");
        path.push("config.toml");

        Ok(path)
    }

    /// Load configuration from the default path, or from `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_from_path(&Self::config_path()?),
        }
    }

    /// Load configuration from a specific path; a missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            SmokeError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&contents).map_err(|e| {
            SmokeError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SmokeError::io(format!("Failed to create directory: {}", parent.display()), e)
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| SmokeError::config(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, contents).map_err(|e| {
            SmokeError::io(format!("Failed to write config file: {}", path.display()), e)
        })
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the base URL
///
/// Checks sources in the following priority order:
/// 1. --base-url command line flag
/// 2. config file
/// 3. API_SMOKE_BASE_URL environment variable
/// 4. Default deployment URL
pub fn resolve_base_url(flag: Option<String>, config: &SmokeConfig) -> Result<String> {
    resolve_base_url_from(flag, config, env_value(BASE_URL_ENV))
}

fn resolve_base_url_from(
    flag: Option<String>,
    config: &SmokeConfig,
    env: Option<String>,
) -> Result<String> {
    let url = if let Some(url) = flag {
        debug!("Using base URL from --base-url flag: {}", url);
        url
    } else if let Some(url) = config.base_url.clone().filter(|u| !u.is_empty()) {
        debug!("Using base URL from config file: {}", url);
        url
    } else if let Some(url) = env {
        debug!("Using base URL from {} environment variable: {}", BASE_URL_ENV, url);
        url
    } else {
        debug!("Using default base URL: {}", DEFAULT_BASE_URL);
        DEFAULT_BASE_URL.to_string()
    };

    validate_base_url(&url)?;
    Ok(url.trim_end_matches('/').to_string())
}

fn validate_base_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url)
        .map_err(|e| SmokeError::config(format!("Invalid base URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(SmokeError::config(format!(
            "Unsupported scheme '{}' in base URL '{}'; use http or https",
            scheme, url
        ))),
    }
}

/// Resolve the timeout
///
/// Checks sources in the following priority order:
/// 1. --timeout command line flag
/// 2. config file
/// 3. API_SMOKE_TIMEOUT environment variable
/// 4. Default: 30 seconds
pub fn resolve_timeout(flag: Option<u64>, config: &SmokeConfig) -> Result<u64> {
    resolve_timeout_from(flag, config, env_value(TIMEOUT_ENV))
}

fn resolve_timeout_from(
    flag: Option<u64>,
    config: &SmokeConfig,
    env: Option<String>,
) -> Result<u64> {
    if let Some(timeout) = flag.or(config.timeout) {
        debug!("Using timeout: {} seconds", timeout);
        return Ok(timeout);
    }

    if let Some(raw) = env {
        let timeout = raw.trim().parse::<u64>().map_err(|_| {
            SmokeError::config(format!(
                "{} must be a number of seconds, got '{}'",
                TIMEOUT_ENV, raw
            ))
        })?;
        debug!("Using timeout from {} environment variable: {} seconds", TIMEOUT_ENV, timeout);
        return Ok(timeout);
    }

    debug!("Using default timeout: {} seconds", DEFAULT_TIMEOUT);
    Ok(DEFAULT_TIMEOUT)
}

/// Resolve the user id probed by the user endpoints
///
/// Flag, then config file, then API_SMOKE_USER_ID, then the built-in id.
pub fn resolve_user_id(flag: Option<String>, config: &SmokeConfig) -> String {
    resolve_user_id_from(flag, config, env_value(USER_ID_ENV))
}

fn resolve_user_id_from(flag: Option<String>, config: &SmokeConfig, env: Option<String>) -> String {
    flag.or_else(|| config.user_id.clone())
        .or(env)
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
}
