//! Shared helpers for smoke-run integration tests
//!
//! `MockApi` stands up a wiremock server that behaves like a healthy deployment of
//! the API: registration and login succeed for the session's identity, protected
//! endpoints require the issued bearer token, and everything else answers with the
//! documented status codes.

#![allow(dead_code)]

use api_smoke::smoke::probes::{self, DEFAULT_USER_ID};
use api_smoke::smoke::{ClientConfig, Identity, Probe, Session, SmokeClient, SmokeRunner};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.smoke.token";

pub struct MockApi {
    pub server: MockServer,
    pub identity: Identity,
}

impl MockApi {
    /// Start a server where every probe succeeds
    pub async fn healthy() -> Self {
        let api = Self::bare().await;
        api.mount_register(201).await;
        api.mount_login(json!({ "message": "Login successful", "access_token": TOKEN })).await;
        api.mount_public(201).await;
        api.mount_protected().await;
        api
    }

    /// Start a server with nothing mounted
    pub async fn bare() -> Self {
        let server = MockServer::start().await;
        let identity = Identity::generate();
        Self { server, identity }
    }

    pub fn session(&self) -> Session {
        Session::new(self.server.uri(), self.identity.clone(), DEFAULT_USER_ID)
    }

    pub fn client(&self) -> SmokeClient {
        client_for(&self.server.uri())
    }

    pub fn runner(&self, probes: Vec<Probe>) -> SmokeRunner {
        SmokeRunner::new(self.client(), self.session(), probes)
    }

    pub fn catalog(&self) -> Vec<Probe> {
        probes::catalog(&self.session())
    }

    pub async fn mount_register(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .and(body_partial_json(json!({
                "email": self.identity.email,
                "first_name": "Ria",
                "last_name": "Test",
                "password": self.identity.password,
            })))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": "ok" })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_login(&self, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_json(json!({
                "email": self.identity.email,
                "password": self.identity.password,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Unauthenticated endpoints; `seed_status` lets tests break the seed probe
    pub async fn mount_public(&self, seed_status: u16) {
        for route in ["/api", "/api/v1", "/health", "/probe"] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
                .mount(&self.server)
                .await;
        }

        Mock::given(method("POST"))
            .and(path("/api/v1/seed"))
            .respond_with(ResponseTemplate::new(seed_status))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/squeeze"))
            .and(body_partial_json(json!({ "email": self.identity.email })))
            .respond_with(ResponseTemplate::new(201))
            .mount(&self.server)
            .await;
    }

    /// Token-protected endpoints; requests without the issued token get 401
    pub async fn mount_protected(&self) {
        let bearer = format!("Bearer {}", TOKEN);
        let user_path = format!("/api/v1/users/{}", DEFAULT_USER_ID);

        Mock::given(method("GET"))
            .and(path("/api/v1/timezones"))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "timezones": [] })))
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(user_path.as_str()))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status_code": 200,
                "data": { "id": DEFAULT_USER_ID, "last_name": "Doe" }
            })))
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(method("PATCH"))
            .and(path(user_path.as_str()))
            .and(header("Authorization", bearer.as_str()))
            .and(body_json(json!({ "last_name": "Doe" })))
            .respond_with(ResponseTemplate::new(200))
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/testimonials"))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(201))
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(wiremock::matchers::any())
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })),
            )
            .with_priority(10)
            .mount(&self.server)
            .await;
    }
}

pub fn client_for(base_url: &str) -> SmokeClient {
    SmokeClient::new(ClientConfig { base_url: base_url.to_string(), timeout: 5, verbose: true })
        .expect("build client")
}
