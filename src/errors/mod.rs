//! # Error Handling
//!
//! Error types for the smoke-test harness, defined with `thiserror`.
//! The binary edge wraps these in `anyhow` for context chaining.

pub mod types;

pub use types::{Result, SmokeError};
