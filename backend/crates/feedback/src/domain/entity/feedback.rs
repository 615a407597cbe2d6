//! Feedback Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    feedback_id::FeedbackId,
    feedback_text::{FeedbackContent, FeedbackTitle},
    user_name::UserName,
};

/// A posted note, owned by exactly one user
#[derive(Debug, Clone)]
pub struct Feedback {
    pub feedback_id: FeedbackId,
    pub title: FeedbackTitle,
    pub content: FeedbackContent,
    pub user_name: UserName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    /// Replace title and content; owner and id never change
    pub fn edit(&mut self, title: FeedbackTitle, content: FeedbackContent) {
        self.title = title;
        self.content = content;
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user_name: &UserName) -> bool {
        &self.user_name == user_name
    }
}

/// Feedback not yet persisted (the store assigns the id)
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub title: FeedbackTitle,
    pub content: FeedbackContent,
    pub user_name: UserName,
}
