//! # Command Line Interface
//!
//! `api-smoke` runs the probe suite against a deployed API (`run`, the default),
//! prints the probe catalog (`list`), and manages the config file (`config`).

pub mod config;
pub mod config_cmd;
pub mod output;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;

use crate::observability::{init_logging, LogFormat};
use crate::smoke::probes;
use crate::smoke::{ClientConfig, Identity, Session, SmokeClient, SmokeRunner};
use config::SmokeConfig;
use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "api-smoke")]
#[command(about = "Smoke-test a deployed REST API and assert status codes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: String,

    /// Path to the config file (default ~/.api-smoke/config.toml)
    #[arg(long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    /// Base URL of the API under test
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the probe suite (default)
    Run(RunArgs),

    /// List the probes in run order
    List(ListArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run only this probe (repeat for multiple probes)
    #[arg(long = "only", action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Skip this probe (repeat for multiple probes)
    #[arg(long = "skip", action = ArgAction::Append)]
    pub skip: Vec<String>,

    /// Also run the authorization and update read-back checks
    #[arg(long)]
    pub extended: bool,

    /// User id probed by the user endpoints
    #[arg(long)]
    pub user_id: Option<String>,

    /// Use this email instead of a generated one
    #[arg(long)]
    pub email: Option<String>,

    /// Use this password instead of the default one
    #[arg(long)]
    pub password: Option<String>,

    /// Report format (text, json, or yaml)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            only: Vec::new(),
            skip: Vec::new(),
            extended: false,
            user_id: None,
            email: None,
            password: None,
            format: "text".to_string(),
            no_color: false,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Include the extended checks
    #[arg(long)]
    pub extended: bool,

    /// Output format (text, json, or yaml)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// Run CLI commands, returning the process exit code
pub async fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.parse()?;
    init_logging(cli.verbose, log_format);

    match cli.command {
        Some(Commands::Config { command }) => {
            config_cmd::handle_config_command(command, cli.config_file)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::List(args)) => {
            let file = SmokeConfig::load(cli.config_file.as_deref())?;
            let session = build_session(&file, &RunArgs::default(), cli.base_url)?;
            list_probes(&session.redacted(), &args)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Run(args)) => {
            run_suite(cli.config_file, cli.base_url, cli.timeout, cli.verbose, args).await
        }
        None => {
            run_suite(cli.config_file, cli.base_url, cli.timeout, cli.verbose, RunArgs::default())
                .await
        }
    }
}

/// Resolve the session from flags, the config file and the environment
fn build_session(
    file: &SmokeConfig,
    args: &RunArgs,
    base_url: Option<String>,
) -> anyhow::Result<Session> {
    let base_url = config::resolve_base_url(base_url, file)?;
    let user_id = config::resolve_user_id(args.user_id.clone(), file);
    let identity = Identity::generate().with_overrides(
        args.email.clone().or_else(|| file.email.clone()),
        args.password.clone().or_else(|| file.password.clone()),
    );

    debug!(base_url = %base_url, user_id = %user_id, email = %identity.email, "Resolved session");
    Ok(Session::new(base_url, identity, user_id))
}

/// Catalog plus the extended checks when requested
fn probe_list(session: &Session, extended: bool) -> Vec<probes::Probe> {
    let mut list = probes::catalog(session);
    if extended {
        list.extend(probes::extended_checks(session));
    }
    list
}

fn list_probes(session: &Session, args: &ListArgs) -> anyhow::Result<()> {
    let list = probe_list(session, args.extended);

    match args.format.parse::<OutputFormat>()? {
        OutputFormat::Text => output::print_catalog(&list),
        OutputFormat::Json => output::print_json(&list)?,
        OutputFormat::Yaml => output::print_yaml(&list)?,
    }

    Ok(())
}

async fn run_suite(
    config_path: Option<PathBuf>,
    base_url: Option<String>,
    timeout: Option<u64>,
    verbose: bool,
    args: RunArgs,
) -> anyhow::Result<ExitCode> {
    let format: OutputFormat = args.format.parse()?;
    let file = SmokeConfig::load(config_path.as_deref())?;
    let session = build_session(&file, &args, base_url)?;
    let timeout = config::resolve_timeout(timeout, &file)?;

    let selected = probes::select(probe_list(&session, args.extended), &args.only, &args.skip)?;

    let client_config =
        ClientConfig { base_url: session.base_url().to_string(), timeout, verbose };
    let client = SmokeClient::new(client_config).context("Failed to create HTTP client")?;

    let mut runner = SmokeRunner::new(client, session, selected);

    let report = if format == OutputFormat::Text {
        let colored = !args.no_color && std::io::stdout().is_terminal();
        runner.run_with(|result| output::print_result_line(result, colored)).await
    } else {
        runner.run().await
    };

    output::print_report(&report, format)?;

    Ok(if report.success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_run() {
        let cli = Cli::try_parse_from(["api-smoke"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.log_format, "text");
    }

    #[test]
    fn test_cli_run_args() {
        let cli = Cli::try_parse_from([
            "api-smoke",
            "run",
            "--only",
            "health",
            "--only",
            "probe",
            "--skip",
            "seed",
            "--extended",
            "--base-url",
            "http://localhost:3000",
            "-f",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3000"));
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.only, vec!["health", "probe"]);
                assert_eq!(args.skip, vec!["seed"]);
                assert!(args.extended);
                assert_eq!(args.format, "json");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_config_subcommand() {
        let cli = Cli::try_parse_from(["api-smoke", "config", "set", "timeout", "10"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { .. })));
    }

    #[test]
    fn test_build_session_uses_overrides() {
        let file = SmokeConfig {
            email: Some("file@example.com".to_string()),
            ..Default::default()
        };
        let args = RunArgs {
            password: Some("Flag#Pass1".to_string()),
            user_id: Some("user-7".to_string()),
            ..Default::default()
        };

        let session =
            build_session(&file, &args, Some("http://localhost:3000/".to_string())).unwrap();

        assert_eq!(session.base_url(), "http://localhost:3000");
        assert_eq!(session.user_id(), "user-7");
        assert_eq!(session.identity().email, "file@example.com");
        assert_eq!(session.identity().password, "Flag#Pass1");
    }

    #[test]
    fn test_probe_list_extended() {
        let session = Session::new("http://localhost:3000", Identity::generate(), "user-1");
        assert_eq!(probe_list(&session, false).len(), 12);
        assert_eq!(probe_list(&session, true).len(), 14);
    }
}
