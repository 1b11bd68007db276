//! # Observability
//!
//! Structured logging for smoke runs. Logs go to stderr so that reports printed on
//! stdout stay machine-readable.

pub mod logging;

pub use logging::{init_logging, LogFormat};
