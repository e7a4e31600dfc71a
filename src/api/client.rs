// Workout API HTTP client.
// Builds requests against the configured base URL and maps failures into FitlogError.

use reqwest::{
    Client, Method, RequestBuilder, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, warn};

use crate::error::{FitlogError, Result};
use crate::session::Credential;

use super::types::message_field;

/// Status and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// HTTP client for the workout API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (no trailing slash).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("fitlog-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FitlogError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Unauthenticated request.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Request carrying the credential as a bearer token. Fails before any I/O
    /// when the credential has no token.
    pub(crate) fn authorized(
        &self,
        method: Method,
        path: &str,
        credential: &Credential,
    ) -> Result<RequestBuilder> {
        let token = credential
            .bearer_token()
            .ok_or(FitlogError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    /// Send a request and read the whole body.
    pub(crate) async fn dispatch(&self, request: RequestBuilder) -> Result<RawResponse> {
        let response = request.send().await.map_err(FitlogError::Http)?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "api response");
        let body = response.text().await.map_err(FitlogError::Http)?;
        Ok(RawResponse { status, body })
    }
}

/// Error for a rejected login or registration: the server's message, else `fallback`.
pub fn auth_failure(response: &RawResponse, fallback: &str) -> FitlogError {
    warn!(status = response.status.as_u16(), "authentication rejected");
    FitlogError::Authentication(message_field(&response.body).unwrap_or_else(|| fallback.to_string()))
}

/// Error for a failed workout call: the server's message, else the status text.
pub fn fetch_failure(response: &RawResponse, action: &str) -> FitlogError {
    warn!(status = response.status.as_u16(), action, "workout request failed");
    let detail = message_field(&response.body).unwrap_or_else(|| status_text(response.status));
    FitlogError::fetch(action, detail)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_url_building() {
        let client = ApiClient::new("http://localhost:4000/").unwrap();
        assert_eq!(
            client.url("/workouts/getMyWorkouts"),
            "http://localhost:4000/workouts/getMyWorkouts"
        );
    }

    #[test]
    fn test_authorized_requires_token() {
        let client = ApiClient::new("http://localhost:4000").unwrap();
        let anonymous = Credential::User(crate::session::credential::UserRecord {
            email: "a@b.com".to_string(),
            access: None,
            extra: Default::default(),
        });
        let err = client
            .authorized(Method::GET, "/workouts/getMyWorkouts", &anonymous)
            .unwrap_err();
        assert!(matches!(err, FitlogError::NotAuthenticated));

        let request = client
            .authorized(Method::GET, "/workouts/getMyWorkouts", &Credential::token("tok"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer tok"
        );
    }

    #[test]
    fn test_auth_failure_prefers_server_message() {
        let err = auth_failure(&response(401, r#"{"message":"Incorrect email or password"}"#), "Login failed");
        assert_eq!(err.to_string(), "Incorrect email or password");

        let err = auth_failure(&response(500, "oops"), "Login failed! Please check your credentials.");
        assert_eq!(err.to_string(), "Login failed! Please check your credentials.");
    }

    #[test]
    fn test_fetch_failure_uses_status_text() {
        let err = fetch_failure(&response(401, ""), "fetch workouts");
        assert_eq!(err.to_string(), "Failed to fetch workouts: Unauthorized");

        let err = fetch_failure(&response(404, r#"{"error":"Workout not found"}"#), "delete workout");
        assert_eq!(err.to_string(), "Failed to delete workout: Workout not found");
    }
}
