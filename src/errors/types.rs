//! # Error Types
//!
//! Error types for the smoke-test harness using `thiserror`.

/// Custom result type for smoke-test operations
pub type Result<T> = std::result::Result<T, SmokeError>;

/// Main error type for the smoke-test harness
#[derive(thiserror::Error, Debug)]
pub enum SmokeError {
    /// Configuration errors (flags, config file, environment)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network transport errors: connect, DNS, TLS, timeout
    #[error("Transport error: {context}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A response did not carry a field its contract requires
    #[error("Response from {endpoint} is missing required field '{field}'")]
    MissingField { field: String, endpoint: String },

    /// A setup call returned a status other than the one it needs
    #[error("{endpoint} returned status {actual}, expected {expected}: {body}")]
    UnexpectedStatus { endpoint: String, expected: u16, actual: u16, body: String },

    /// An authenticated probe ran without a bearer token
    #[error("Probe '{probe}' requires a bearer token but login did not produce one")]
    Unauthenticated { probe: String },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl SmokeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a transport error with context
    pub fn transport<S: Into<String>>(context: S, source: reqwest::Error) -> Self {
        Self::Transport { context: context.into(), source }
    }

    /// Create a serialization error with context
    pub fn serialization<S: Into<String>>(context: S, source: serde_json::Error) -> Self {
        Self::Serialization { context: context.into(), source }
    }

    /// Create a missing-field error
    pub fn missing_field<F: Into<String>, E: Into<String>>(field: F, endpoint: E) -> Self {
        Self::MissingField { field: field.into(), endpoint: endpoint.into() }
    }

    /// Create an unexpected-status error
    pub fn unexpected_status<E: Into<String>, B: Into<String>>(
        endpoint: E,
        expected: u16,
        actual: u16,
        body: B,
    ) -> Self {
        Self::UnexpectedStatus { endpoint: endpoint.into(), expected, actual, body: body.into() }
    }

    /// Create an unauthenticated-probe error
    pub fn unauthenticated<S: Into<String>>(probe: S) -> Self {
        Self::Unauthenticated { probe: probe.into() }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Whether the error came from the network rather than from the response
    pub fn is_transport(&self) -> bool {
        matches!(self, SmokeError::Transport { .. })
    }

    /// Whether the request timed out
    pub fn is_timeout(&self) -> bool {
        match self {
            SmokeError::Transport { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for SmokeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { context: "JSON processing failed".to_string(), source: error }
    }
}

impl From<std::io::Error> for SmokeError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { context: "I/O operation failed".to_string(), source: error }
    }
}
