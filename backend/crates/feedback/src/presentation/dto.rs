//! Form DTOs
//!
//! Every field defaults to empty so a missing field becomes a field error
//! rather than a rejected request. None of these derive `Debug`, since two
//! of them carry a password.

use serde::Deserialize;

use crate::application::authenticator::RegisterInput;
use crate::application::feedback_service::FeedbackInput;
use crate::error::FieldErrors;

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterForm {
    /// Split into re-renderable values and the use case input
    pub fn into_parts(self) -> (RegisterValues, RegisterInput) {
        let values = RegisterValues {
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        };
        let input = RegisterInput {
            user_name: self.username,
            password: self.password,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
        };
        (values, input)
    }
}

/// Non-secret registration values echoed back into the form
#[derive(Debug, Clone, Default)]
pub struct RegisterValues {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Presence checks only; credentials are checked by the authenticator
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            errors.push("username", "This field is required.");
        }
        if self.password.trim().is_empty() {
            errors.push("password", "This field is required.");
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub title: String,
    pub content: String,
}

impl From<FeedbackForm> for FeedbackInput {
    fn from(form: FeedbackForm) -> Self {
        FeedbackInput {
            title: form.title,
            content: form.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let form: LoginForm = serde_json::from_str("{}").unwrap();
        let errors = form.validate();
        assert_eq!(errors.get("username"), Some("This field is required."));
        assert_eq!(errors.get("password"), Some("This field is required."));
    }

    #[test]
    fn test_register_values_exclude_password() {
        let form = RegisterForm {
            username: "alice".into(),
            password: "pw1".into(),
            email: "a@x.io".into(),
            first_name: "A".into(),
            last_name: "L".into(),
        };
        let (values, input) = form.into_parts();
        assert_eq!(values.username, "alice");
        assert!(!format!("{:?}", values).contains("pw1"));
        assert_eq!(input.password, "pw1");
    }
}
