//! Configuration management CLI commands
//!
//! Provides commands for managing ~/.api-smoke/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::smoke::session::REDACTED;

use super::config::SmokeConfig;
use super::output;

const KEYS: &str = "base_url, timeout, user_id, email, password";

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize configuration file with default values
    Init {
        /// Overwrite existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (base_url, timeout, user_id, email, or password)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get configuration file path
    Path,
}

/// Handle config commands against the file at `path`, or the default location
pub fn handle_config_command(command: ConfigCommands, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => SmokeConfig::config_path()?,
    };

    match command {
        ConfigCommands::Init { force } => init_config(&path, force)?,
        ConfigCommands::Show { output } => show_config(&path, &output)?,
        ConfigCommands::Set { key, value } => set_config(&path, &key, &value)?,
        ConfigCommands::Path => println!("{}", path.display()),
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    let config = SmokeConfig {
        base_url: Some(crate::DEFAULT_BASE_URL.to_string()),
        timeout: Some(super::config::DEFAULT_TIMEOUT),
        ..Default::default()
    };
    config.save_to_path(path)?;

    println!("Configuration file created at: {}", path.display());
    println!("\nYou can now set values using:");
    println!("  api-smoke config set base_url <api-url>");
    println!("  api-smoke config set user_id <uuid>");

    Ok(())
}

fn show_config(path: &Path, output_format: &str) -> Result<()> {
    if !path.exists() {
        println!("No configuration file found at: {}", path.display());
        println!("\nRun 'api-smoke config init' to create one");
        return Ok(());
    }

    let mut config = SmokeConfig::load_from_path(path)?;
    config.password = config.password.map(|_| REDACTED.to_string());

    if output_format == "table" {
        print_config_table(&config, path);
    } else {
        output::print_output(&config, output_format)?;
    }

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = SmokeConfig::load_from_path(path)?;
    let message = apply_setting(&mut config, key, value)?;
    config.save_to_path(path)?;

    println!("{}", message);
    println!("Configuration saved to: {}", path.display());
    Ok(())
}

/// Update one key of the configuration, returning a confirmation message
fn apply_setting(config: &mut SmokeConfig, key: &str, value: &str) -> Result<String> {
    let message = match key {
        "base_url" => {
            config.base_url = Some(value.to_string());
            format!("Base URL set to: {}", value)
        }
        "timeout" => {
            let timeout: u64 =
                value.parse().context("Invalid timeout value. Must be a number in seconds")?;
            config.timeout = Some(timeout);
            format!("Timeout set to: {} seconds", timeout)
        }
        "user_id" => {
            config.user_id = Some(value.to_string());
            format!("User id set to: {}", value)
        }
        "email" => {
            config.email = Some(value.to_string());
            format!("Email set to: {}", value)
        }
        "password" => {
            config.password = Some(value.to_string());
            "Password set".to_string()
        }
        _ => anyhow::bail!("Unknown configuration key: '{}'. Valid keys: {}", key, KEYS),
    };

    Ok(message)
}

fn print_config_table(config: &SmokeConfig, path: &Path) {
    let not_set = || "<not set>".to_string();

    output::print_table_header(&[("Key", 15), ("Value", 50)]);
    println!("{:<15} {}", "base_url", config.base_url.clone().unwrap_or_else(not_set));
    println!(
        "{:<15} {}",
        "timeout",
        config.timeout.map(|t| format!("{} seconds", t)).unwrap_or_else(not_set)
    );
    println!("{:<15} {}", "user_id", config.user_id.clone().unwrap_or_else(not_set));
    println!("{:<15} {}", "email", config.email.clone().unwrap_or_else(not_set));
    println!("{:<15} {}", "password", config.password.clone().unwrap_or_else(not_set));
    println!();
    println!("Config file: {}", path.display());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_setting() {
        let mut config = SmokeConfig::default();

        apply_setting(&mut config, "base_url", "http://localhost:3000").unwrap();
        apply_setting(&mut config, "timeout", "12").unwrap();
        let message = apply_setting(&mut config, "password", "hunter2").unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.timeout, Some(12));
        assert_eq!(config.password.as_deref(), Some("hunter2"));
        assert!(!message.contains("hunter2"));
    }

    #[test]
    fn test_apply_setting_rejects_bad_values() {
        let mut config = SmokeConfig::default();
        assert!(apply_setting(&mut config, "timeout", "soon").is_err());
        assert!(apply_setting(&mut config, "token", "abc").is_err());
    }

    #[test]
    fn test_init_and_set_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();

        set_config(&path, "user_id", "user-42").unwrap();

        let loaded = SmokeConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.user_id.as_deref(), Some("user-42"));
        assert_eq!(loaded.base_url.as_deref(), Some(crate::DEFAULT_BASE_URL));
    }
}
