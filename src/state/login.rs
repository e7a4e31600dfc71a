// Login view controller.
// Validates the form, exchanges credentials for a token and starts the session.

use tracing::{info, warn};

use crate::error::Result;
use crate::session::{Credential, SessionStore};

use super::form::{Field, Form};
use super::navigation::Route;
use super::validation::validate_login;

/// Validated login request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginController {
    pub form: Form,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl Default for LoginController {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginController {
    pub const EMAIL: usize = 0;
    pub const PASSWORD: usize = 1;

    pub fn new() -> Self {
        Self {
            form: Form::new(vec![Field::text("Email"), Field::secret("Password")]),
            loading: false,
            error: None,
            notice: None,
        }
    }

    /// Login view opened with an informational line, e.g. after registering.
    pub fn with_notice(notice: impl Into<String>) -> Self {
        Self {
            notice: Some(notice.into()),
            ..Self::new()
        }
    }

    /// Login view opened with an error already showing.
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Validate and mark the form in flight. `None` while a request is already
    /// outstanding or when validation fails (the message is kept in `error`).
    pub fn begin(&mut self) -> Option<LoginRequest> {
        if self.loading {
            return None;
        }
        self.error = None;

        let email = self.form.value(Self::EMAIL).trim().to_string();
        let password = self.form.value(Self::PASSWORD).to_string();
        if let Err(e) = validate_login(&email, &password) {
            self.error = Some(e.to_string());
            return None;
        }

        self.loading = true;
        self.notice = None;
        Some(LoginRequest { email, password })
    }

    /// Apply the server's answer. On success the credential becomes the session
    /// and the workouts view is returned as the next route.
    pub fn complete(
        &mut self,
        result: Result<Credential>,
        session: &mut SessionStore,
    ) -> Option<Route> {
        self.loading = false;

        let outcome = result.and_then(|credential| session.login(credential));
        match outcome {
            Ok(()) => {
                info!("logged in");
                self.form.clear();
                Some(Route::Workouts)
            }
            Err(e) => {
                warn!("login failed: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Run a whole login round trip in place.
    #[cfg(test)]
    pub async fn submit<A>(&mut self, api: &A, session: &mut SessionStore) -> Option<Route>
    where
        A: crate::api::WorkoutApi + ?Sized,
    {
        let request = self.begin()?;
        let result = api.login(&request.email, &request.password).await;
        self.complete(result, session)
    }
}
