//! Run-scoped session context
//!
//! A [`Session`] is created once per run and handed to every probe. It carries the
//! base URL, the identity generated for this run, the target user id, and the bearer
//! token produced by the setup phase's login.

use std::fmt;

use uuid::Uuid;

/// Password used for the generated identity. Register and login share it.
pub const DEFAULT_PASSWORD: &str = "wretyuTRY#n1@kels";

/// Domain for generated email addresses
pub const EMAIL_DOMAIN: &str = "example.com";

/// Placeholder shown instead of a password in printed output
pub const REDACTED: &str = "********";

/// Credentials and profile data for the user registered by this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pinned: bool,
}

impl Identity {
    /// Generate a fresh identity with a unique email address
    pub fn generate() -> Self {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        Self {
            email: format!("smoke-{}@{}", suffix, EMAIL_DOMAIN),
            password: DEFAULT_PASSWORD.to_string(),
            first_name: "Ria".to_string(),
            last_name: "Test".to_string(),
            pinned: false,
        }
    }

    /// Replace the generated email and/or password with caller-supplied values
    ///
    /// A caller-supplied email pins the identity to an existing account, so the
    /// setup phase does not register it on its own.
    pub fn with_overrides(mut self, email: Option<String>, password: Option<String>) -> Self {
        if let Some(email) = email {
            self.email = email;
            self.pinned = true;
        }
        if let Some(password) = password {
            self.password = password;
        }
        self
    }

    /// Whether the email was supplied rather than generated for this run
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Copy of this identity with the password masked, for printing
    pub fn redacted(&self) -> Self {
        Self { password: REDACTED.to_string(), ..self.clone() }
    }
}

/// Opaque credential returned by login
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Session state for a single smoke-test run
#[derive(Debug, Clone)]
pub struct Session {
    base_url: String,
    identity: Identity,
    user_id: String,
    token: Option<BearerToken>,
}

impl Session {
    pub fn new<B: Into<String>, U: Into<String>>(
        base_url: B,
        identity: Identity,
        user_id: U,
    ) -> Self {
        Self { base_url: base_url.into(), identity, user_id: user_id.into(), token: None }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// Store the token produced by login, replacing any previous one
    pub fn set_token(&mut self, token: BearerToken) {
        self.token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Copy of this session whose identity has its password masked
    pub fn redacted(&self) -> Self {
        Self { identity: self.identity.redacted(), ..self.clone() }
    }
}
