//! Feedback Service
//!
//! Create, read, update and delete feedback with ownership checks.
//! Lookups come first, so a missing id is `FeedbackNotFound` for everyone.

use std::sync::Arc;

use crate::application::authorizer::ensure_can_mutate_feedback;
use crate::application::session_manager::Identity;
use crate::domain::entity::feedback::{Feedback, NewFeedback};
use crate::domain::repository::FeedbackRepository;
use crate::domain::value_object::{
    feedback_id::FeedbackId,
    feedback_text::{FeedbackContent, FeedbackTitle},
};
use crate::error::{FeedbackError, FeedbackResult, FieldErrors};

/// Title and content as submitted
pub struct FeedbackInput {
    pub title: String,
    pub content: String,
}

impl FeedbackInput {
    fn validate(&self) -> FeedbackResult<(FeedbackTitle, FeedbackContent)> {
        let mut errors = FieldErrors::new();
        let title = errors.check("title", FeedbackTitle::new(&self.title));
        let content = errors.check("content", FeedbackContent::new(self.content.as_str()));

        match (title, content) {
            (Some(title), Some(content)) => Ok((title, content)),
            _ => Err(FeedbackError::Validation(errors)),
        }
    }
}

pub struct FeedbackService<F>
where
    F: FeedbackRepository,
{
    feedback_repo: Arc<F>,
}

impl<F> FeedbackService<F>
where
    F: FeedbackRepository,
{
    pub fn new(feedback_repo: Arc<F>) -> Self {
        Self { feedback_repo }
    }

    /// Post new feedback; the owner is always the caller
    pub async fn add(&self, identity: &Identity, input: FeedbackInput) -> FeedbackResult<Feedback> {
        let (title, content) = input.validate()?;

        let feedback = self
            .feedback_repo
            .create_feedback(&NewFeedback {
                title,
                content,
                user_name: identity.user_name().clone(),
            })
            .await?;

        tracing::info!(
            feedback_id = %feedback.feedback_id,
            user_name = %feedback.user_name,
            "Feedback created"
        );
        Ok(feedback)
    }

    pub async fn get(&self, feedback_id: FeedbackId) -> FeedbackResult<Feedback> {
        self.feedback_repo
            .find_feedback(feedback_id)
            .await?
            .ok_or(FeedbackError::FeedbackNotFound)
    }

    /// Fetch feedback for its edit form (owner only)
    pub async fn get_for_edit(
        &self,
        identity: &Identity,
        feedback_id: FeedbackId,
    ) -> FeedbackResult<Feedback> {
        let feedback = self.get(feedback_id).await?;
        ensure_can_mutate_feedback(Some(identity), &feedback.user_name)?;
        Ok(feedback)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        feedback_id: FeedbackId,
        input: FeedbackInput,
    ) -> FeedbackResult<Feedback> {
        let mut feedback = self.get_for_edit(identity, feedback_id).await?;
        let (title, content) = input.validate()?;

        if !self
            .feedback_repo
            .update_feedback(feedback_id, &title, &content)
            .await?
        {
            return Err(FeedbackError::FeedbackNotFound);
        }

        feedback.edit(title, content);
        tracing::info!(feedback_id = %feedback_id, "Feedback updated");
        Ok(feedback)
    }

    pub async fn delete(&self, identity: &Identity, feedback_id: FeedbackId) -> FeedbackResult<()> {
        let feedback = self.get(feedback_id).await?;
        ensure_can_mutate_feedback(Some(identity), &feedback.user_name)?;

        if !self.feedback_repo.delete_feedback(feedback_id).await? {
            return Err(FeedbackError::FeedbackNotFound);
        }

        tracing::info!(feedback_id = %feedback_id, "Feedback deleted");
        Ok(())
    }
}
