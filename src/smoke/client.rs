//! HTTP client for the smoke-test harness
//!
//! Wraps a single `reqwest::Client` for the whole run. Requests are built from the
//! configured base URL plus a probe path, with optional JSON body and bearer token.
//! Responses are returned with their status and raw body so that status mismatches
//! never turn into transport errors.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

use crate::errors::{Result, SmokeError};
use crate::smoke::session::BearerToken;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API under test (e.g., "https://api.example.com")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Enable verbose request/response logging
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: crate::DEFAULT_BASE_URL.to_string(), timeout: 30, verbose: false }
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ProbeResponse {
    /// Deserialize the body into a typed response contract
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            SmokeError::serialization(
                format!("Failed to deserialize response body: {}", truncate_body(&self.body)),
                e,
            )
        })
    }

    /// Parse the body as untyped JSON
    pub fn json_value(&self) -> Result<serde_json::Value> {
        self.json()
    }
}

/// HTTP client used by every probe in a run
#[derive(Debug, Clone)]
pub struct SmokeClient {
    client: Client,
    config: ClientConfig,
}

impl SmokeClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SmokeError::transport("Failed to build HTTP client", e))?;

        Ok(Self { client, config })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Join the base URL and a probe path
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Build a request, attaching the bearer token when one is given
    pub fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
    ) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, &url);
        match token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    /// Send a request with an optional JSON body and return status plus body
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
        token: Option<&BearerToken>,
    ) -> Result<ProbeResponse> {
        let mut builder = self.request(method.clone(), path, token);

        if let Some(body) = body {
            if self.config.verbose {
                let body_json = serde_json::to_string_pretty(body)
                    .unwrap_or_else(|_| "<unable to serialize>".to_string());
                trace!("Request body:\n{}", body_json);
            }
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SmokeError::transport(format!("Failed to send {} {}", method, path), e))?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| SmokeError::transport(format!("Failed to read body of {}", path), e))?;

        if self.config.verbose {
            trace!("Response body:\n{}", body);
        }

        Ok(ProbeResponse { status, body })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX).collect();
        format!("{}...", head)
    }
}
