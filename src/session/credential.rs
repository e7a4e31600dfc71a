// Authentication credential.
// The API hands out a bearer token; older clients persisted a user record instead.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FitlogError, Result};

/// Proof of authentication held by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credential {
    /// Opaque bearer token (a JWT in practice).
    Token(String),
    /// User record, optionally carrying its own access token.
    User(UserRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    pub fn token(token: impl Into<String>) -> Self {
        Credential::Token(token.into())
    }

    /// Token to send as `Authorization: Bearer <token>`, if this credential has one.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = match self {
            Credential::Token(token) => Some(token.as_str()),
            Credential::User(user) => user.access.as_deref(),
        };
        token.filter(|t| !t.trim().is_empty())
    }

    /// Email of the signed-in user, for display only.
    pub fn email(&self) -> Option<String> {
        match self {
            Credential::User(user) => Some(user.email.clone()),
            Credential::Token(token) => jwt_claim(token, "email"),
        }
    }

    /// Serialize for persistence: a JSON string for tokens, an object for user records.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parse a persisted credential, rejecting anything that cannot authorize a request
/// or identify a user.
pub fn decode_credential(raw: &str) -> Result<Credential> {
    let credential: Credential = serde_json::from_str(raw)
        .map_err(|e| FitlogError::MalformedSession(e.to_string()))?;

    if let Credential::Token(token) = &credential {
        if token.trim().is_empty() {
            return Err(FitlogError::MalformedSession("empty token".to_string()));
        }
    }
    Ok(credential)
}

/// Read a string claim from a JWT payload. The signature is not checked.
fn jwt_claim(token: &str, claim: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims.get(claim)?.as_str().map(str::to_string)
}

#[cfg(test)]
pub(crate) fn test_jwt(email: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":"u1","email":"{}"}}"#, email));
    format!("{}.{}.signature", header, payload)
}
