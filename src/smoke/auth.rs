//! Authentication contracts for the register and login endpoints
//!
//! The login response is treated as a typed contract: a successful login must carry
//! a non-empty `access_token`, otherwise the run fails fast with a descriptive error
//! instead of sending malformed `Authorization` headers later on.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::{Result, SmokeError};
use crate::smoke::client::ProbeResponse;
use crate::smoke::session::{BearerToken, Identity};

pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Field of the login response holding the bearer token
pub const TOKEN_FIELD: &str = "access_token";

/// Request body for user registration
pub fn register_body(identity: &Identity) -> Value {
    json!({
        "email": identity.email,
        "first_name": identity.first_name,
        "last_name": identity.last_name,
        "password": identity.password,
    })
}

/// Request body for login; uses the same credential pair as registration
pub fn login_body(identity: &Identity) -> Value {
    json!({
        "email": identity.email,
        "password": identity.password,
    })
}

/// Login response contract. Other fields the API returns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl LoginResponse {
    pub fn into_token(self) -> Result<BearerToken> {
        match self.access_token {
            Some(token) if !token.trim().is_empty() => Ok(BearerToken::new(token)),
            _ => Err(SmokeError::missing_field(TOKEN_FIELD, LOGIN_PATH)),
        }
    }
}

/// Extract the bearer token from a login response
///
/// The response must have status 200 and a JSON body with a non-empty
/// `access_token` string.
pub fn extract_token(response: &ProbeResponse) -> Result<BearerToken> {
    if response.status.as_u16() != 200 {
        return Err(SmokeError::unexpected_status(
            LOGIN_PATH,
            200,
            response.status.as_u16(),
            response.body.clone(),
        ));
    }

    let token = response.json::<LoginResponse>()?.into_token()?;
    debug!("Obtained bearer token from {}", LOGIN_PATH);
    Ok(token)
}
