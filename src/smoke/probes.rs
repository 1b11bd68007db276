//! Probe definitions and the fixed probe catalog
//!
//! A probe is one HTTP request paired with an expectation on the response. The
//! catalog order matters only for token availability: `register` and `login` come
//! first and are run by the setup phase.

use std::fmt;

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{Result, SmokeError};
use crate::smoke::auth::{self, LOGIN_PATH, REGISTER_PATH};
use crate::smoke::session::Session;

/// User id probed by the user endpoints unless overridden
pub const DEFAULT_USER_ID: &str = "8f7ca676-52af-44d0-acc2-d43b68d90467";

pub const REGISTER: &str = "register";
pub const LOGIN: &str = "login";

/// Last name written by `update_user` and read back by `get_user_reflects_update`
pub const UPDATED_LAST_NAME: &str = "Doe";

/// HTTP methods used by probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeMethod {
    Get,
    Post,
    Patch,
}

impl ProbeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Get => "GET",
            ProbeMethod::Post => "POST",
            ProbeMethod::Patch => "PATCH",
        }
    }

    pub fn as_method(&self) -> Method {
        match self {
            ProbeMethod::Get => Method::GET,
            ProbeMethod::Post => Method::POST,
            ProbeMethod::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a probe's response must look like to pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    /// Exactly this status code
    Status { code: u16 },
    /// Any non-2xx status
    Rejected,
}

impl Expectation {
    pub fn matches(&self, status: StatusCode) -> bool {
        match self {
            Expectation::Status { code } => status.as_u16() == *code,
            Expectation::Rejected => !status.is_success(),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Status { code } => write!(f, "{}", code),
            Expectation::Rejected => f.write_str("non-2xx"),
        }
    }
}

/// Asserts that one of several JSON pointers in the response body holds a value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyCheck {
    pub pointers: Vec<&'static str>,
    pub expected: Value,
}

impl BodyCheck {
    pub fn matches(&self, body: &Value) -> bool {
        self.pointers.iter().any(|pointer| body.pointer(pointer) == Some(&self.expected))
    }
}

impl fmt::Display for BodyCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.pointers.join(" | "), self.expected)
    }
}

/// One HTTP request and the expectation on its response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Probe {
    pub name: &'static str,
    pub method: ProbeMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    pub requires_auth: bool,
    pub expectation: Expectation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_check: Option<BodyCheck>,
    pub extended: bool,
}

impl Probe {
    fn expecting<P: Into<String>>(
        name: &'static str,
        method: ProbeMethod,
        path: P,
        expectation: Expectation,
    ) -> Self {
        Self {
            name,
            method,
            path: path.into(),
            body: None,
            requires_auth: false,
            expectation,
            body_check: None,
            extended: false,
        }
    }

    fn new<P: Into<String>>(name: &'static str, method: ProbeMethod, path: P, code: u16) -> Self {
        Self::expecting(name, method, path, Expectation::Status { code })
    }

    /// A probe that passes on any non-2xx status
    fn rejecting<P: Into<String>>(name: &'static str, method: ProbeMethod, path: P) -> Self {
        Self::expecting(name, method, path, Expectation::Rejected)
    }

    fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    fn with_body_check(mut self, check: BodyCheck) -> Self {
        self.body_check = Some(check);
        self
    }

    fn extended(mut self) -> Self {
        self.extended = true;
        self
    }

    /// Whether this probe is run by the setup phase
    pub fn is_setup(&self) -> bool {
        self.name == REGISTER || self.name == LOGIN
    }
}

fn user_path(session: &Session) -> String {
    format!("/api/v1/users/{}", session.user_id())
}

/// Build the fixed probe list for a session
pub fn catalog(session: &Session) -> Vec<Probe> {
    let identity = session.identity();

    vec![
        Probe::new(REGISTER, ProbeMethod::Post, REGISTER_PATH, 201)
            .with_body(auth::register_body(identity)),
        Probe::new(LOGIN, ProbeMethod::Post, LOGIN_PATH, 200)
            .with_body(auth::login_body(identity)),
        Probe::new("root", ProbeMethod::Get, "/api", 200),
        Probe::new("version", ProbeMethod::Get, "/api/v1", 200),
        Probe::new("health", ProbeMethod::Get, "/health", 200),
        Probe::new("probe", ProbeMethod::Get, "/probe", 200),
        Probe::new("seed", ProbeMethod::Post, "/api/v1/seed", 201),
        Probe::new("squeeze", ProbeMethod::Post, "/api/v1/squeeze", 201)
            .with_body(squeeze_payload(&identity.email)),
        Probe::new("get_timezones", ProbeMethod::Get, "/api/v1/timezones", 200).authenticated(),
        Probe::new("get_user", ProbeMethod::Get, user_path(session), 200).authenticated(),
        Probe::new("update_user", ProbeMethod::Patch, user_path(session), 200)
            .with_body(json!({ "last_name": UPDATED_LAST_NAME }))
            .authenticated(),
        Probe::new("create_testimonial", ProbeMethod::Post, "/api/v1/testimonials", 201)
            .with_body(json!({
                "name": "John Doe",
                "content": "I am very happy with the service provided by the company"
            }))
            .authenticated(),
    ]
}

/// Opt-in checks for authorization enforcement and update read-back
pub fn extended_checks(session: &Session) -> Vec<Probe> {
    vec![
        Probe::rejecting("get_user_unauthenticated", ProbeMethod::Get, user_path(session))
            .extended(),
        Probe::new("get_user_reflects_update", ProbeMethod::Get, user_path(session), 200)
            .authenticated()
            .with_body_check(BodyCheck {
                pointers: vec!["/data/last_name", "/last_name"],
                expected: Value::String(UPDATED_LAST_NAME.to_string()),
            })
            .extended(),
    ]
}

/// Lead-capture payload for the squeeze endpoint
pub fn squeeze_payload(email: &str) -> Value {
    json!({
        "email": email,
        "first_name": "string",
        "last_name": "string",
        "phone": "string",
        "location": "string",
        "job_title": "string",
        "company": "string",
        "interests": ["string"],
        "referral_source": "string"
    })
}

/// Restrict probes to `only` (when non-empty) and drop those in `skip`
///
/// Unknown names in either list are a configuration error.
pub fn select(probes: Vec<Probe>, only: &[String], skip: &[String]) -> Result<Vec<Probe>> {
    for name in only.iter().chain(skip) {
        if !probes.iter().any(|p| p.name == name) {
            let known: Vec<&str> = probes.iter().map(|p| p.name).collect();
            return Err(SmokeError::config(format!(
                "Unknown probe '{}'. Known probes: {}",
                name,
                known.join(", ")
            )));
        }
    }

    Ok(probes
        .into_iter()
        .filter(|p| only.is_empty() || only.iter().any(|n| n == p.name))
        .filter(|p| !skip.iter().any(|n| n == p.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoke::session::Identity;

    fn session() -> Session {
        Session::new("http://localhost:3000", Identity::generate(), DEFAULT_USER_ID)
    }

    #[test]
    fn test_catalog_order_and_expectations() {
        let probes = catalog(&session());
        let summary: Vec<(&str, &str, u16)> = probes
            .iter()
            .map(|p| match p.expectation {
                Expectation::Status { code } => (p.name, p.method.as_str(), code),
                Expectation::Rejected => (p.name, p.method.as_str(), 0),
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("register", "POST", 201),
                ("login", "POST", 200),
                ("root", "GET", 200),
                ("version", "GET", 200),
                ("health", "GET", 200),
                ("probe", "GET", 200),
                ("seed", "POST", 201),
                ("squeeze", "POST", 201),
                ("get_timezones", "GET", 200),
                ("get_user", "GET", 200),
                ("update_user", "PATCH", 200),
                ("create_testimonial", "POST", 201),
            ]
        );
    }

    #[test]
    fn test_only_user_endpoints_use_user_id() {
        let probes = catalog(&session());
        let user_probes: Vec<&Probe> =
            probes.iter().filter(|p| p.path.starts_with("/api/v1/users/")).collect();

        assert_eq!(user_probes.len(), 2);
        for probe in user_probes {
            assert_eq!(probe.path, format!("/api/v1/users/{}", DEFAULT_USER_ID));
            assert!(probe.requires_auth);
        }
    }

    #[test]
    fn test_auth_requirements() {
        let authed: Vec<&str> =
            catalog(&session()).iter().filter(|p| p.requires_auth).map(|p| p.name).collect();
        assert_eq!(authed, vec!["get_timezones", "get_user", "update_user", "create_testimonial"]);
    }

    #[test]
    fn test_seed_has_no_body() {
        let probes = catalog(&session());
        let seed = probes.iter().find(|p| p.name == "seed").unwrap();
        assert!(seed.body.is_none());
    }

    #[test]
    fn test_register_and_login_bodies_share_credentials() {
        let probes = catalog(&session());
        let register = probes[0].body.as_ref().unwrap();
        let login = probes[1].body.as_ref().unwrap();

        assert!(register.is_object() && login.is_object());
        assert_eq!(register["email"], login["email"]);
        assert_eq!(register["password"], login["password"]);
        assert_eq!(register["first_name"], "Ria");
        assert_eq!(register["last_name"], "Test");
        assert!(probes[0].is_setup());
        assert!(probes[1].is_setup());
        assert!(!probes[2].is_setup());
    }

    #[test]
    fn test_squeeze_payload_uses_session_email() {
        let payload = squeeze_payload("lead@example.com");
        assert_eq!(payload["email"], "lead@example.com");
        assert_eq!(payload["interests"], json!(["string"]));
    }

    #[test]
    fn test_expectation_matches() {
        let created = Expectation::Status { code: 201 };
        assert!(created.matches(StatusCode::CREATED));
        assert!(!created.matches(StatusCode::OK));

        assert!(Expectation::Rejected.matches(StatusCode::UNAUTHORIZED));
        assert!(Expectation::Rejected.matches(StatusCode::FORBIDDEN));
        assert!(!Expectation::Rejected.matches(StatusCode::OK));
        assert_eq!(Expectation::Rejected.to_string(), "non-2xx");
    }

    #[test]
    fn test_body_check_pointers() {
        let check = BodyCheck {
            pointers: vec!["/data/last_name", "/last_name"],
            expected: json!("Doe"),
        };

        assert!(check.matches(&json!({ "data": { "last_name": "Doe" } })));
        assert!(check.matches(&json!({ "last_name": "Doe" })));
        assert!(!check.matches(&json!({ "data": { "last_name": "Test" } })));
    }

    #[test]
    fn test_select_only_and_skip() {
        let selected =
            select(catalog(&session()), &["health".to_string(), "probe".to_string()], &[])
                .unwrap();
        assert_eq!(selected.iter().map(|p| p.name).collect::<Vec<_>>(), vec!["health", "probe"]);

        let skipped = select(catalog(&session()), &[], &["seed".to_string()]).unwrap();
        assert_eq!(skipped.len(), 11);
        assert!(skipped.iter().all(|p| p.name != "seed"));
    }

    #[test]
    fn test_select_unknown_name() {
        let err = select(catalog(&session()), &["nope".to_string()], &[]).unwrap_err();
        assert!(err.to_string().contains("Unknown probe 'nope'"));
    }

    #[test]
    fn test_extended_checks() {
        let checks = extended_checks(&session());
        assert_eq!(checks.len(), 2);
        assert!(checks.iter().all(|p| p.extended));
        assert_eq!(checks[0].expectation, Expectation::Rejected);
        assert_eq!(
            serde_json::to_value(checks[0].expectation).unwrap(),
            json!({ "kind": "rejected" })
        );
        assert!(!checks[0].requires_auth);
        assert!(checks[1].requires_auth);
        assert!(checks[1].body_check.is_some());
    }
}
