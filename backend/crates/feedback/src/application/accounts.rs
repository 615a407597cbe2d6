//! Account Service
//!
//! Profile lookup and account deletion.

use std::sync::Arc;

use crate::application::authorizer::ensure_can_mutate_user;
use crate::application::session_manager::Identity;
use crate::domain::entity::{feedback::Feedback, user::User};
use crate::domain::repository::{FeedbackRepository, UserRepository};
use crate::domain::value_object::user_name::UserName;
use crate::error::{FeedbackError, FeedbackResult};

/// A user with their feedback, as shown on the profile page
pub struct Profile {
    pub user: User,
    pub feedback: Vec<Feedback>,
}

pub struct AccountService<R>
where
    R: UserRepository + FeedbackRepository,
{
    repo: Arc<R>,
}

impl<R> AccountService<R>
where
    R: UserRepository + FeedbackRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Look up a user by the raw path segment
    ///
    /// A name that could never be registered is simply not found.
    pub async fn get_user(&self, user_name: &str) -> FeedbackResult<User> {
        let user_name = UserName::new(user_name).map_err(|_| FeedbackError::UserNotFound)?;
        self.repo
            .find_user(&user_name)
            .await?
            .ok_or(FeedbackError::UserNotFound)
    }

    pub async fn profile(&self, user_name: &str) -> FeedbackResult<Profile> {
        let user = self.get_user(user_name).await?;
        let feedback = self.repo.list_feedback_by_user(&user.user_name).await?;
        Ok(Profile { user, feedback })
    }

    /// Delete `target` with all of their feedback and sessions
    ///
    /// Unknown targets are `UserNotFound` before any permission check.
    pub async fn delete_account(&self, identity: &Identity, target: &str) -> FeedbackResult<()> {
        let user = self.get_user(target).await?;
        ensure_can_mutate_user(Some(identity), &user.user_name)?;

        if !self.repo.delete_user_cascade(&user.user_name).await? {
            return Err(FeedbackError::UserNotFound);
        }

        tracing::info!(user_name = %user.user_name, "Account deleted");
        Ok(())
    }
}
