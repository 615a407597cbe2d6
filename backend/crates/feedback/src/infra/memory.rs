//! In-Memory Repository
//!
//! Single-process store used by tests and `BOARD_STORAGE=memory`.
//! One lock guards every table, so the cascading delete is atomic.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use kernel::id::SessionId;
use tokio::sync::Mutex;

use crate::domain::entity::{
    feedback::{Feedback, NewFeedback},
    session::UserSession,
    user::User,
};
use crate::domain::repository::{FeedbackRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{
    feedback_id::FeedbackId,
    feedback_text::{FeedbackContent, FeedbackTitle},
    user_name::UserName,
};
use crate::error::{FeedbackError, FeedbackResult};

#[derive(Default)]
struct Tables {
    users: HashMap<UserName, User>,
    feedback: BTreeMap<FeedbackId, Feedback>,
    sessions: HashMap<SessionId, UserSession>,
    last_feedback_id: i64,
}

#[derive(Clone, Default)]
pub struct InMemoryBoardRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryBoardRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryBoardRepository {
    async fn create_user(&self, user: &User) -> FeedbackResult<()> {
        let mut tables = self.tables.lock().await;
        if tables.users.contains_key(&user.user_name) {
            return Err(FeedbackError::DuplicateUsername);
        }
        tables.users.insert(user.user_name.clone(), user.clone());
        Ok(())
    }

    async fn find_user(&self, user_name: &UserName) -> FeedbackResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(user_name).cloned())
    }

    async fn delete_user_cascade(&self, user_name: &UserName) -> FeedbackResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.users.remove(user_name).is_none() {
            return Ok(false);
        }
        tables.feedback.retain(|_, f| &f.user_name != user_name);
        tables.sessions.retain(|_, s| &s.user_name != user_name);
        Ok(true)
    }
}

impl FeedbackRepository for InMemoryBoardRepository {
    async fn create_feedback(&self, feedback: &NewFeedback) -> FeedbackResult<Feedback> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&feedback.user_name) {
            return Err(FeedbackError::UserNotFound);
        }

        tables.last_feedback_id += 1;
        let now = Utc::now();
        let stored = Feedback {
            feedback_id: FeedbackId::new(tables.last_feedback_id),
            title: feedback.title.clone(),
            content: feedback.content.clone(),
            user_name: feedback.user_name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.feedback.insert(stored.feedback_id, stored.clone());
        Ok(stored)
    }

    async fn find_feedback(&self, feedback_id: FeedbackId) -> FeedbackResult<Option<Feedback>> {
        Ok(self.tables.lock().await.feedback.get(&feedback_id).cloned())
    }

    async fn update_feedback(
        &self,
        feedback_id: FeedbackId,
        title: &FeedbackTitle,
        content: &FeedbackContent,
    ) -> FeedbackResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.feedback.get_mut(&feedback_id) {
            Some(feedback) => {
                feedback.edit(title.clone(), content.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_feedback(&self, feedback_id: FeedbackId) -> FeedbackResult<bool> {
        Ok(self
            .tables
            .lock()
            .await
            .feedback
            .remove(&feedback_id)
            .is_some())
    }

    async fn list_feedback_by_user(&self, user_name: &UserName) -> FeedbackResult<Vec<Feedback>> {
        Ok(self
            .tables
            .lock()
            .await
            .feedback
            .values()
            .filter(|f| &f.user_name == user_name)
            .cloned()
            .collect())
    }
}

impl SessionRepository for InMemoryBoardRepository {
    async fn create_session(&self, session: &UserSession) -> FeedbackResult<()> {
        self.tables
            .lock()
            .await
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: SessionId) -> FeedbackResult<Option<UserSession>> {
        Ok(self.tables.lock().await.sessions.get(&session_id).cloned())
    }

    async fn delete_session(&self, session_id: SessionId) -> FeedbackResult<()> {
        self.tables.lock().await.sessions.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired_sessions(&self) -> FeedbackResult<u64> {
        let mut tables = self.tables.lock().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| !s.is_expired());
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        email::Email,
        person_name::PersonName,
        user_password::{RawPassword, UserPassword},
    };

    fn user(name: &str) -> User {
        User::new(
            UserName::new(name).unwrap(),
            UserPassword::from_raw(&RawPassword::new("pw1".to_string()).unwrap(), None).unwrap(),
            Email::new("a@x.io").unwrap(),
            PersonName::new("A").unwrap(),
            PersonName::new("L").unwrap(),
        )
    }

    fn note(owner: &str, title: &str) -> NewFeedback {
        NewFeedback {
            title: FeedbackTitle::new(title).unwrap(),
            content: FeedbackContent::new("body").unwrap(),
            user_name: UserName::new(owner).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let repo = InMemoryBoardRepository::new();
        repo.create_user(&user("alice")).await.unwrap();

        let first = repo.create_feedback(&note("alice", "one")).await.unwrap();
        assert!(repo.delete_feedback(first.feedback_id).await.unwrap());
        let second = repo.create_feedback(&note("alice", "two")).await.unwrap();

        assert!(second.feedback_id > first.feedback_id);
        assert!(repo.find_feedback(first.feedback_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_feedback_requires_existing_owner() {
        let repo = InMemoryBoardRepository::new();
        let err = repo.create_feedback(&note("ghost", "x")).await.unwrap_err();
        assert!(matches!(err, FeedbackError::UserNotFound));
    }

    #[tokio::test]
    async fn test_cascade_only_touches_the_target() {
        let repo = InMemoryBoardRepository::new();
        repo.create_user(&user("alice")).await.unwrap();
        repo.create_user(&user("bob")).await.unwrap();
        repo.create_feedback(&note("alice", "a")).await.unwrap();
        let kept = repo.create_feedback(&note("bob", "b")).await.unwrap();

        let session = UserSession::new(UserName::new("alice").unwrap(), 60_000);
        repo.create_session(&session).await.unwrap();

        let alice = UserName::new("alice").unwrap();
        assert!(repo.delete_user_cascade(&alice).await.unwrap());
        assert!(repo.find_user(&alice).await.unwrap().is_none());
        assert!(repo.list_feedback_by_user(&alice).await.unwrap().is_empty());
        assert!(repo.find_session(session.session_id).await.unwrap().is_none());
        assert!(repo.find_feedback(kept.feedback_id).await.unwrap().is_some());

        assert!(!repo.delete_user_cascade(&alice).await.unwrap());
    }

    #[tokio::test]
    async fn test_cleanup_expired_sessions() {
        let repo = InMemoryBoardRepository::new();
        let name = UserName::new("alice").unwrap();
        repo.create_session(&UserSession::new(name.clone(), -1)).await.unwrap();
        let live = UserSession::new(name, 60_000);
        repo.create_session(&live).await.unwrap();

        assert_eq!(repo.cleanup_expired_sessions().await.unwrap(), 1);
        assert!(repo.find_session(live.session_id).await.unwrap().is_some());
    }
}
