//! User Name Value Object
//!
//! The user name is the account's primary key and appears verbatim in URL
//! paths (`/users/{username}`), so the accepted alphabet is URL-safe.
//!
//! ## Invariants
//! - NFKC-normalized and trimmed
//! - 1 to 20 characters
//! - ASCII letters, digits and `_ . -` only
//! - At least one letter or digit (no `.` / `..` path segments)
//! - Case is preserved and significant

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 20;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Validated user name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("This field is required."));
        }

        if trimmed.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }

        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(&c))
        {
            return Err(AppError::bad_request(
                "Username may only contain letters, digits, '_', '.' and '-'",
            ));
        }

        if !trimmed.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::bad_request(
                "Username must contain at least one letter or digit",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Restore from a database value (validated on the way in)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UserName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UserName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
