// Client-side form validation.
// Runs before any request is built; a failure never reaches the network.

use std::sync::LazyLock;

use regex::Regex;

use crate::api::WorkoutDraft;
use crate::error::{FitlogError, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

pub const MSG_REQUIRED: &str = "Please fill in all fields.";
pub const MSG_EMAIL: &str = "Please enter a valid email address.";
pub const MSG_PASSWORD_LEN: &str = "Password must be at least 6 characters.";
pub const MSG_MISMATCH: &str = "Passwords do not match.";
pub const MSG_DRAFT: &str = "Please provide both name and duration for the workout.";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Login needs both fields and something shaped like an email.
pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(FitlogError::validation(MSG_REQUIRED));
    }
    if !is_email(email) {
        return Err(FitlogError::validation(MSG_EMAIL));
    }
    Ok(())
}

/// Registration checks, in the order their messages take priority.
pub fn validate_registration(email: &str, password: &str, confirmation: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() || confirmation.is_empty() {
        return Err(FitlogError::validation(MSG_REQUIRED));
    }
    if password != confirmation {
        return Err(FitlogError::validation(MSG_MISMATCH));
    }
    if !is_email(email) {
        return Err(FitlogError::validation(MSG_EMAIL));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FitlogError::validation(MSG_PASSWORD_LEN));
    }
    Ok(())
}

/// Trimmed draft, or an error if either field is blank.
pub fn validate_draft(name: &str, duration: &str) -> Result<WorkoutDraft> {
    let (name, duration) = (name.trim(), duration.trim());
    if name.is_empty() || duration.is_empty() {
        return Err(FitlogError::validation(MSG_DRAFT));
    }
    Ok(WorkoutDraft::new(name, duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email("a@b.com"));
        assert!(is_email(" runner@example.co.uk "));
        assert!(!is_email("a@b"));
        assert!(!is_email("ab.com"));
        assert!(!is_email("a b@c.com"));
    }

    #[test]
    fn test_login_rules() {
        assert!(validate_login("a@b.com", "secret1").is_ok());
        assert_eq!(message(validate_login("", "secret1")), MSG_REQUIRED);
        assert_eq!(message(validate_login("a@b.com", "")), MSG_REQUIRED);
        assert_eq!(message(validate_login("nope", "secret1")), MSG_EMAIL);
    }

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration("a@b.com", "secret1", "secret1").is_ok());
        assert_eq!(message(validate_registration("a@b.com", "secret1", "")), MSG_REQUIRED);
        assert_eq!(
            message(validate_registration("a@b.com", "secret1", "secret2")),
            MSG_MISMATCH
        );
        // Mismatch is reported before length
        assert_eq!(message(validate_registration("a@b.com", "abc", "abd")), MSG_MISMATCH);
        assert_eq!(message(validate_registration("a@b", "secret1", "secret1")), MSG_EMAIL);
        assert_eq!(message(validate_registration("a@b.com", "abc", "abc")), MSG_PASSWORD_LEN);
    }

    #[test]
    fn test_draft_rules() {
        assert_eq!(
            validate_draft("  Run ", " 30 mins").unwrap(),
            WorkoutDraft::new("Run", "30 mins")
        );
        assert_eq!(validate_draft("Run", "   ").unwrap_err().to_string(), MSG_DRAFT);
    }
}
