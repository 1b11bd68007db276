//! Sequential probe execution
//!
//! The runner performs an explicit setup phase (register, then login) before any
//! other probe, stores the resulting bearer token in the session, and then runs the
//! remaining probes one at a time. A failing or erroring probe never stops the run.
//!
//! Setup steps run even when not selected if a selected probe needs a token. They
//! are then left out of the report. A generated identity is registered before it
//! logs in; an identity with a supplied email is assumed to exist already.

use std::error::Error as StdError;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{Result, SmokeError};
use crate::smoke::auth;
use crate::smoke::client::{ProbeResponse, SmokeClient};
use crate::smoke::probes::{self, Probe, ProbeMethod, LOGIN, REGISTER};
use crate::smoke::session::{BearerToken, Session};

/// Result of evaluating a single probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Passed,
    Failed {
        expected: String,
        actual: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    Errored {
        message: String,
    },
}

impl ProbeOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ProbeOutcome::Passed)
    }

    fn errored(error: &SmokeError) -> Self {
        ProbeOutcome::Errored { message: error_chain(error) }
    }
}

/// A probe together with its outcome and timing
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub method: ProbeMethod,
    pub path: String,
    pub outcome: ProbeOutcome,
    pub elapsed_ms: u64,
}

/// Ordered results of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub email: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub results: Vec<ProbeResult>,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| matches!(r.outcome, ProbeOutcome::Failed { .. })).count()
    }

    pub fn errored(&self) -> usize {
        self.results.iter().filter(|r| matches!(r.outcome, ProbeOutcome::Errored { .. })).count()
    }

    /// True when no probe failed or errored
    pub fn success(&self) -> bool {
        self.failed() == 0 && self.errored() == 0
    }

    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Runs a selection of probes against one API
pub struct SmokeRunner {
    client: SmokeClient,
    session: Session,
    probes: Vec<Probe>,
}

impl SmokeRunner {
    pub fn new(client: SmokeClient, session: Session, probes: Vec<Probe>) -> Self {
        Self { client, session, probes }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Run every selected probe and collect the report
    pub async fn run(&mut self) -> RunReport {
        self.run_with(|_| {}).await
    }

    /// Run every selected probe, calling `on_result` as each one completes
    pub async fn run_with<F>(&mut self, mut on_result: F) -> RunReport
    where
        F: FnMut(&ProbeResult),
    {
        let started_at = Utc::now();
        let started = Instant::now();
        let selected = self.probes.clone();
        let mut results = Vec::with_capacity(selected.len());

        info!(
            base_url = %self.session.base_url(),
            email = %self.session.identity().email,
            probes = selected.len(),
            "Starting smoke run"
        );

        // Setup phase. Unselected setup steps still run, unreported, when a later
        // step depends on them.
        let login_selected = selected.iter().find(|p| p.name == LOGIN);
        let needs_login = login_selected.is_some() || selected.iter().any(|p| p.requires_auth);

        match selected.iter().find(|p| p.name == REGISTER) {
            Some(register) => {
                let result = self.execute(register).await;
                on_result(&result);
                results.push(result);
            }
            None if needs_login && !self.session.identity().is_pinned() => {
                if let Some(register) = self.setup_probe(REGISTER) {
                    let result = self.execute(&register).await;
                    if !result.outcome.is_passed() {
                        warn!(outcome = ?result.outcome, "Setup registration did not succeed");
                    }
                }
            }
            None => {}
        }

        match login_selected {
            Some(login) => {
                let result = self.login(login).await;
                on_result(&result);
                results.push(result);
            }
            None if needs_login => {
                if let Some(login) = self.setup_probe(LOGIN) {
                    let result = self.login(&login).await;
                    if !result.outcome.is_passed() {
                        warn!(outcome = ?result.outcome, "Setup login did not produce a token");
                    }
                }
            }
            None => {}
        }

        for probe in selected.iter().filter(|p| !p.is_setup()) {
            let result = self.execute(probe).await;
            on_result(&result);
            results.push(result);
        }

        let report = RunReport {
            base_url: self.session.base_url().to_string(),
            email: self.session.identity().email.clone(),
            started_at,
            elapsed_ms: started.elapsed().as_millis() as u64,
            results,
        };

        info!(
            passed = report.passed(),
            failed = report.failed(),
            errored = report.errored(),
            elapsed_ms = report.elapsed_ms,
            "Smoke run finished"
        );

        report
    }

    fn setup_probe(&self, name: &str) -> Option<Probe> {
        probes::catalog(&self.session).into_iter().find(|p| p.name == name)
    }

    /// Run the login probe and store the token it yields
    async fn login(&mut self, probe: &Probe) -> ProbeResult {
        let started = Instant::now();

        let outcome = match self.send(probe, None).await {
            Err(e) => ProbeOutcome::errored(&e),
            Ok(response) if !probe.expectation.matches(response.status) => ProbeOutcome::Failed {
                expected: probe.expectation.to_string(),
                actual: response.status.as_u16(),
                detail: None,
            },
            Ok(response) => match auth::extract_token(&response) {
                Ok(token) => {
                    self.session.set_token(token);
                    ProbeOutcome::Passed
                }
                Err(e) => ProbeOutcome::errored(&e),
            },
        };

        finish(probe, outcome, started)
    }

    /// Run a single non-login probe
    async fn execute(&self, probe: &Probe) -> ProbeResult {
        let started = Instant::now();

        let token = if probe.requires_auth {
            match self.session.token() {
                Some(token) => Some(token.clone()),
                None => {
                    let error = SmokeError::unauthenticated(probe.name);
                    return finish(probe, ProbeOutcome::errored(&error), started);
                }
            }
        } else {
            None
        };

        let outcome = match self.send(probe, token.as_ref()).await {
            Ok(response) => evaluate(probe, &response),
            Err(e) => ProbeOutcome::errored(&e),
        };

        finish(probe, outcome, started)
    }

    async fn send(&self, probe: &Probe, token: Option<&BearerToken>) -> Result<ProbeResponse> {
        self.client.send(probe.method.as_method(), &probe.path, probe.body.as_ref(), token).await
    }
}

/// Compare a response with a probe's expectation and optional body check
pub fn evaluate(probe: &Probe, response: &ProbeResponse) -> ProbeOutcome {
    let actual = response.status.as_u16();

    if !probe.expectation.matches(response.status) {
        return ProbeOutcome::Failed {
            expected: probe.expectation.to_string(),
            actual,
            detail: None,
        };
    }

    let Some(check) = &probe.body_check else {
        return ProbeOutcome::Passed;
    };

    match response.json_value() {
        Ok(body) if check.matches(&body) => ProbeOutcome::Passed,
        Ok(_) => ProbeOutcome::Failed {
            expected: probe.expectation.to_string(),
            actual,
            detail: Some(format!("body check failed: {}", check)),
        },
        Err(e) => ProbeOutcome::errored(&e),
    }
}

fn finish(probe: &Probe, outcome: ProbeOutcome, started: Instant) -> ProbeResult {
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &outcome {
        ProbeOutcome::Passed => debug!(probe = probe.name, elapsed_ms, "Probe passed"),
        ProbeOutcome::Failed { expected, actual, .. } => {
            debug!(probe = probe.name, expected = %expected, actual, "Probe failed")
        }
        ProbeOutcome::Errored { message } => {
            debug!(probe = probe.name, error = %message, "Probe errored")
        }
    }

    ProbeResult {
        name: probe.name.to_string(),
        method: probe.method,
        path: probe.path.clone(),
        outcome,
        elapsed_ms,
    }
}

/// Render an error with its source chain, e.g. "Transport error: ...: connection refused"
fn error_chain(error: &SmokeError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
