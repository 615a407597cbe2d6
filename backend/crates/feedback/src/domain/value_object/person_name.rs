//! Person Name Value Object
//!
//! Used for both first and last name.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

/// Maximum name length in characters
pub const PERSON_NAME_MAX_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("This field is required."));
        }

        if trimmed.chars().count() > PERSON_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Field must be at most {} characters long.",
                PERSON_NAME_MAX_LENGTH
            )));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters."));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
