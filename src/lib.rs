//! # api-smoke
//!
//! Smoke-test harness for a deployed REST API. A run registers a fresh user, logs in,
//! and then walks a fixed list of HTTP probes, asserting the status code of each one.
//!
//! ## Architecture
//!
//! ```text
//! CLI ──► config resolution ──► Session ──► SmokeRunner ──► RunReport ──► output
//!                                              │
//!                                         SmokeClient (reqwest)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use api_smoke::smoke::{probes, ClientConfig, Identity, Session, SmokeClient, SmokeRunner};
//!
//! #[tokio::main]
//! async fn main() -> api_smoke::Result<()> {
//!     let session = Session::new("http://localhost:3000", Identity::generate(), "user-id");
//!     let client = SmokeClient::new(ClientConfig {
//!         base_url: session.base_url().to_string(),
//!         ..Default::default()
//!     })?;
//!
//!     let probes = probes::catalog(&session);
//!     let report = SmokeRunner::new(client, session, probes).run().await;
//!     println!("passed {}/{}", report.passed(), report.results.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod errors;
pub mod observability;
pub mod smoke;

pub use errors::{Result, SmokeError};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Deployment probed when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://deployment.api-nestjs.boilerplate.hng.tech";
