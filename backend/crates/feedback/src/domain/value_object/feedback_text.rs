//! Feedback Title and Content
//!
//! Both are stored and rendered verbatim apart from trimming the title.
//! Escaping happens at render time, never here.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

pub const FEEDBACK_TITLE_MAX_LENGTH: usize = 100;
pub const FEEDBACK_CONTENT_MAX_LENGTH: usize = 10_000;

// Line breaks and tabs are the only control characters a body may carry
fn has_forbidden_control(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
}

/// Feedback title (1 to 100 characters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackTitle(String);

impl FeedbackTitle {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("This field is required."));
        }

        if trimmed.chars().count() > FEEDBACK_TITLE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Field must be at most {} characters long.",
                FEEDBACK_TITLE_MAX_LENGTH
            )));
        }

        if has_forbidden_control(trimmed) {
            return Err(AppError::bad_request("Title contains invalid characters."));
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

impl fmt::Display for FeedbackTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Feedback body
///
/// Line breaks and surrounding whitespace are kept; only an all-blank body
/// is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackContent(String);

impl FeedbackContent {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();

        if raw.trim().is_empty() {
            return Err(AppError::bad_request("This field is required."));
        }

        if raw.chars().count() > FEEDBACK_CONTENT_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Field must be at most {} characters long.",
                FEEDBACK_CONTENT_MAX_LENGTH
            )));
        }

        if has_forbidden_control(&raw) {
            return Err(AppError::bad_request("Content contains invalid characters."));
        }

        Ok(Self(raw))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedbackContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert_eq!(FeedbackTitle::new(" hi ").unwrap().as_str(), "hi");
        assert!(FeedbackTitle::new("").is_err());
        assert!(FeedbackTitle::new("t".repeat(FEEDBACK_TITLE_MAX_LENGTH)).is_ok());
        assert!(FeedbackTitle::new("t".repeat(FEEDBACK_TITLE_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_content_kept_verbatim() {
        let content = FeedbackContent::new("line one\n  <b>line two</b>\n").unwrap();
        assert_eq!(content.as_str(), "line one\n  <b>line two</b>\n");
    }

    #[test]
    fn test_content_bounds() {
        assert!(FeedbackContent::new(" \n\t").is_err());
        assert!(FeedbackContent::new("c".repeat(FEEDBACK_CONTENT_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_nul_and_other_controls_rejected() {
        assert!(FeedbackTitle::new("a\u{0}b").is_err());
        assert!(FeedbackTitle::new("bell\u{7}").is_err());
        assert!(FeedbackContent::new("x\u{0}y").is_err());
        assert!(FeedbackContent::new("esc \u{1b}[31m").is_err());
    }

    #[test]
    fn test_content_keeps_line_breaks_and_tabs() {
        assert!(FeedbackContent::new("one\r\ntwo\tthree").is_ok());
        assert!(FeedbackTitle::new("a\tb").is_ok());
    }
}
