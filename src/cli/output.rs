//! Shared output formatting utilities for CLI commands
//!
//! Per-probe progress lines and the run summary are printed in a test-runner style;
//! whole reports can also be rendered as JSON or YAML.

use std::str::FromStr;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::smoke::probes::Probe;
use crate::smoke::runner::{ProbeOutcome, ProbeResult, RunReport};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => anyhow::bail!(
                "Unsupported output format: '{}'. Use 'text', 'json', or 'yaml'.",
                s
            ),
        }
    }
}

/// Print data in the specified format
pub fn print_output<T: Serialize>(data: &T, format: &str) -> Result<()> {
    match format.parse::<OutputFormat>()? {
        OutputFormat::Json => print_json(data),
        OutputFormat::Yaml => print_yaml(data),
        OutputFormat::Text => {
            anyhow::bail!("Text format requires custom implementation per data type")
        }
    }
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(data).context("Failed to serialize to YAML")?;
    println!("{}", yaml);
    Ok(())
}

/// Truncate string to maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Print a horizontal separator line
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    println!();
    let mut header = String::new();
    for (name, width) in columns {
        header.push_str(&format!("{:<width$} ", name, width = width));
    }
    println!("{}", header.trim());

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    print_separator(total_width.saturating_sub(1));
}

fn status_label(outcome: &ProbeOutcome, colored: bool) -> String {
    match (outcome, colored) {
        (ProbeOutcome::Passed, false) => "ok".to_string(),
        (ProbeOutcome::Passed, true) => "ok".green().to_string(),
        (ProbeOutcome::Failed { .. }, false) => "FAIL".to_string(),
        (ProbeOutcome::Failed { .. }, true) => "FAIL".red().to_string(),
        (ProbeOutcome::Errored { .. }, false) => "ERROR".to_string(),
        (ProbeOutcome::Errored { .. }, true) => "ERROR".yellow().to_string(),
    }
}

/// One progress line, e.g. `health (GET /health) ... ok`
pub fn format_result_line(result: &ProbeResult, colored: bool) -> String {
    format!(
        "{} ({} {}) ... {}",
        result.name,
        result.method,
        result.path,
        status_label(&result.outcome, colored)
    )
}

pub fn print_result_line(result: &ProbeResult, colored: bool) {
    println!("{}", format_result_line(result, colored));
}

/// Detail for a failed or errored probe, `None` when it passed
pub fn describe_outcome(outcome: &ProbeOutcome) -> Option<String> {
    match outcome {
        ProbeOutcome::Passed => None,
        ProbeOutcome::Failed { expected, actual, detail: None } => {
            Some(format!("expected status {}, got {}", expected, actual))
        }
        ProbeOutcome::Failed { expected, actual, detail: Some(detail) } => {
            Some(format!("expected status {}, got {}; {}", expected, actual, detail))
        }
        ProbeOutcome::Errored { message } => Some(message.clone()),
    }
}

/// Summary lines for the end of a text run
pub fn format_summary(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();

    for result in report.results.iter().filter(|r| !r.outcome.is_passed()) {
        let kind = match result.outcome {
            ProbeOutcome::Errored { .. } => "ERROR",
            _ => "FAIL",
        };
        lines.push(String::new());
        lines.push(format!("{}: {}", kind, result.name));
        if let Some(detail) = describe_outcome(&result.outcome) {
            lines.push(format!("    {}", detail));
        }
    }

    lines.push("-".repeat(70));
    lines.push(format!(
        "Ran {} probes against {} in {:.3}s",
        report.results.len(),
        report.base_url,
        report.elapsed_ms as f64 / 1000.0
    ));
    lines.push(String::new());

    if report.success() {
        lines.push("OK".to_string());
    } else {
        let mut counts = Vec::new();
        if report.failed() > 0 {
            counts.push(format!("failures={}", report.failed()));
        }
        if report.errored() > 0 {
            counts.push(format!("errors={}", report.errored()));
        }
        lines.push(format!("FAILED ({})", counts.join(", ")));
    }

    lines
}

pub fn print_summary(report: &RunReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}

/// Print a finished report in the requested format
pub fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Yaml => print_yaml(report),
        OutputFormat::Text => {
            print_summary(report);
            Ok(())
        }
    }
}

/// Print the probe catalog as a table
pub fn print_catalog(probes: &[Probe]) {
    print_table_header(&[
        ("Probe", 26),
        ("Method", 7),
        ("Path", 50),
        ("Auth", 5),
        ("Expect", 8),
    ]);

    for probe in probes {
        println!(
            "{:<26} {:<7} {:<50} {:<5} {}",
            probe.name,
            probe.method.as_str(),
            truncate(&probe.path, 50),
            if probe.requires_auth { "yes" } else { "no" },
            probe.expectation
        );
    }
}
