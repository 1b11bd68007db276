//! # Smoke Test Runner
//!
//! Probes a deployed REST API with a fixed, ordered list of HTTP requests and checks
//! each response status. The run is strictly sequential: one probe's request, response
//! and assertion complete before the next probe starts.
//!
//! ```text
//! Session ──► setup (register, login) ──► token ──► remaining probes ──► RunReport
//! ```

pub mod auth;
pub mod client;
pub mod probes;
pub mod runner;
pub mod session;

pub use client::{ClientConfig, ProbeResponse, SmokeClient};
pub use probes::{Expectation, Probe, ProbeMethod};
pub use runner::{ProbeOutcome, ProbeResult, RunReport, SmokeRunner};
pub use session::{BearerToken, Identity, Session};
