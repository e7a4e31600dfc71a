// Register view controller.
// Creating an account does not log in; success sends the user to the login form.

use tracing::{info, warn};

use crate::api::RegisterConfirmation;
use crate::error::Result;

use super::form::{Field, Form};
use super::navigation::Route;
use super::validation::validate_registration;

const DEFAULT_CONFIRMATION: &str = "Registration successful! Please log in.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegisterController {
    pub form: Form,
    loading: bool,
    error: Option<String>,
    confirmation: Option<String>,
}

impl Default for RegisterController {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterController {
    pub const EMAIL: usize = 0;
    pub const PASSWORD: usize = 1;
    pub const CONFIRM: usize = 2;

    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                Field::text("Email"),
                Field::secret("Password"),
                Field::secret("Confirm Password"),
            ]),
            loading: false,
            error: None,
            confirmation: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message to show on the login view after a successful registration.
    pub fn take_confirmation(&mut self) -> Option<String> {
        self.confirmation.take()
    }

    pub fn begin(&mut self) -> Option<RegisterRequest> {
        if self.loading {
            return None;
        }
        self.error = None;

        let email = self.form.value(Self::EMAIL).trim().to_string();
        let password = self.form.value(Self::PASSWORD).to_string();
        let confirmation = self.form.value(Self::CONFIRM);
        if let Err(e) = validate_registration(&email, &password, confirmation) {
            self.error = Some(e.to_string());
            return None;
        }

        self.loading = true;
        Some(RegisterRequest { email, password })
    }

    pub fn complete(&mut self, result: Result<RegisterConfirmation>) -> Option<Route> {
        self.loading = false;
        match result {
            Ok(confirmation) => {
                info!("registration succeeded");
                self.form.clear();
                self.confirmation = Some(
                    confirmation
                        .message
                        .unwrap_or_else(|| DEFAULT_CONFIRMATION.to_string()),
                );
                Some(Route::Login)
            }
            Err(e) => {
                warn!("registration failed: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    #[cfg(test)]
    pub async fn submit<A>(&mut self, api: &A) -> Option<Route>
    where
        A: crate::api::WorkoutApi + ?Sized,
    {
        let request = self.begin()?;
        let result = api.register(&request.email, &request.password).await;
        self.complete(result)
    }
}
