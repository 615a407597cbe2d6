//! Authorization Rules
//!
//! A user may mutate only their own account and their own feedback.
//! Reading profiles is open to any logged-in user and is not checked here.

use crate::application::session_manager::Identity;
use crate::domain::value_object::user_name::UserName;
use crate::error::{FeedbackError, FeedbackResult};

/// True iff someone is logged in and it is `target`
pub fn can_mutate_user(identity: Option<&Identity>, target: &UserName) -> bool {
    identity.is_some_and(|identity| identity.user_name() == target)
}

/// True iff someone is logged in and owns the feedback
pub fn can_mutate_feedback(identity: Option<&Identity>, owner: &UserName) -> bool {
    can_mutate_user(identity, owner)
}

/// `Unauthenticated` without a session, `Forbidden` for anyone else
pub fn ensure_can_mutate_user(identity: Option<&Identity>, target: &UserName) -> FeedbackResult<()> {
    check(identity, target, can_mutate_user)
}

pub fn ensure_can_mutate_feedback(
    identity: Option<&Identity>,
    owner: &UserName,
) -> FeedbackResult<()> {
    check(identity, owner, can_mutate_feedback)
}

fn check(
    identity: Option<&Identity>,
    owner: &UserName,
    rule: fn(Option<&Identity>, &UserName) -> bool,
) -> FeedbackResult<()> {
    match identity {
        None => Err(FeedbackError::Unauthenticated),
        Some(_) if rule(identity, owner) => Ok(()),
        Some(identity) => {
            tracing::warn!(
                identity = %identity,
                owner = %owner,
                "Mutation of another user's resource denied"
            );
            Err(FeedbackError::Forbidden)
        }
    }
}
