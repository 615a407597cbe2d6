//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in `infra`.

use kernel::id::SessionId;

use crate::domain::entity::{
    feedback::{Feedback, NewFeedback},
    session::UserSession,
    user::User,
};
use crate::domain::value_object::{
    feedback_id::FeedbackId,
    feedback_text::{FeedbackContent, FeedbackTitle},
    user_name::UserName,
};
use crate::error::FeedbackResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user; `DuplicateUsername` if the name is taken
    async fn create_user(&self, user: &User) -> FeedbackResult<()>;

    async fn find_user(&self, user_name: &UserName) -> FeedbackResult<Option<User>>;

    /// Delete the user together with all of their feedback and sessions
    ///
    /// All-or-nothing. Returns `false` if the user did not exist.
    async fn delete_user_cascade(&self, user_name: &UserName) -> FeedbackResult<bool>;
}

/// Feedback repository trait
#[trait_variant::make(FeedbackRepository: Send)]
pub trait LocalFeedbackRepository {
    /// Insert and return the stored row with its assigned id
    async fn create_feedback(&self, feedback: &NewFeedback) -> FeedbackResult<Feedback>;

    async fn find_feedback(&self, feedback_id: FeedbackId) -> FeedbackResult<Option<Feedback>>;

    /// Returns `false` if the row vanished
    async fn update_feedback(
        &self,
        feedback_id: FeedbackId,
        title: &FeedbackTitle,
        content: &FeedbackContent,
    ) -> FeedbackResult<bool>;

    async fn delete_feedback(&self, feedback_id: FeedbackId) -> FeedbackResult<bool>;

    /// All feedback owned by a user, oldest first
    async fn list_feedback_by_user(&self, user_name: &UserName) -> FeedbackResult<Vec<Feedback>>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create_session(&self, session: &UserSession) -> FeedbackResult<()>;

    async fn find_session(&self, session_id: SessionId) -> FeedbackResult<Option<UserSession>>;

    async fn delete_session(&self, session_id: SessionId) -> FeedbackResult<()>;

    /// Remove expired sessions, returning how many were deleted
    async fn cleanup_expired_sessions(&self) -> FeedbackResult<u64>;
}

/// Everything the web layer needs from a single store
pub trait BoardRepository:
    UserRepository + FeedbackRepository + SessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> BoardRepository for T where
    T: UserRepository + FeedbackRepository + SessionRepository + Clone + Send + Sync + 'static
{
}
