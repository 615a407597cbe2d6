//! Feedback Board Error Types
//!
//! Board-specific error variants that integrate with `kernel::error`.
//! Rendering as a response depends on the variant: authorization failures
//! become a redirect to `/login` with a flash, the rest become HTML pages.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::presentation::{flash::Flash, views};

/// Board-specific result type alias
pub type FeedbackResult<T> = Result<T, FeedbackError>;

/// Per-field validation messages, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    /// Record the error (if any) and hand back the value
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, AppError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(field, e.message().to_string());
                None
            }
        }
    }

    /// First message recorded for `field`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

/// Board-specific error variants
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("User name already exists")]
    DuplicateUsername,

    #[error("Invalid username/password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Feedback not found")]
    FeedbackNotFound,

    /// No session on a protected route
    #[error("Please login first!")]
    Unauthenticated,

    /// Logged in, but not the owner
    #[error("You don't have permission to perform this action")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FeedbackError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedbackError::DuplicateUsername => ErrorKind::Conflict,
            FeedbackError::InvalidCredentials | FeedbackError::Unauthenticated => {
                ErrorKind::Unauthorized
            }
            FeedbackError::UserNotFound | FeedbackError::FeedbackNotFound => ErrorKind::NotFound,
            FeedbackError::Forbidden => ErrorKind::Forbidden,
            FeedbackError::Validation(_) => ErrorKind::UnprocessableEntity,
            FeedbackError::Database(_) | FeedbackError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            FeedbackError::Database(e) => {
                tracing::error!(error = %e, "Board database error");
            }
            FeedbackError::Internal(msg) => {
                tracing::error!(message = %msg, "Board internal error");
            }
            FeedbackError::Forbidden => {
                tracing::warn!("Rejected action on a resource owned by someone else");
            }
            _ => {
                tracing::debug!(error = %self, "Board error");
            }
        }
    }
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        self.log();

        match &self {
            FeedbackError::Unauthenticated | FeedbackError::Forbidden => {
                Flash::error(self.to_string()).redirect("/login")
            }
            FeedbackError::UserNotFound | FeedbackError::FeedbackNotFound => (
                StatusCode::NOT_FOUND,
                views::message_page("Not Found", &self.to_string()),
            )
                .into_response(),
            // Server-side details stay in the log
            FeedbackError::Database(_) | FeedbackError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                views::message_page("Server Error", "Something went wrong. Please try again."),
            )
                .into_response(),
            _ => {
                let err = self.to_app_error();
                (
                    self.status_code(),
                    views::message_page(err.kind().as_str(), err.message()),
                )
                    .into_response()
            }
        }
    }
}

impl From<AppError> for FeedbackError {
    fn from(err: AppError) -> Self {
        FeedbackError::Internal(err.to_string())
    }
}
