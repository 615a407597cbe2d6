//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::SessionId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    feedback::{Feedback, NewFeedback},
    session::UserSession,
    user::User,
};
use crate::domain::repository::{FeedbackRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    feedback_id::FeedbackId,
    feedback_text::{FeedbackContent, FeedbackTitle},
    person_name::PersonName,
    user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{FeedbackError, FeedbackResult};

/// PostgreSQL-backed board repository
#[derive(Clone)]
pub struct PgBoardRepository {
    pool: PgPool,
}

impl PgBoardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgBoardRepository {
    async fn create_user(&self, user: &User) -> FeedbackResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                username,
                password,
                email,
                first_name,
                last_name,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_name.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.email.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                FeedbackError::DuplicateUsername
            }
            other => FeedbackError::Database(other),
        })?;

        Ok(())
    }

    async fn find_user(&self, user_name: &UserName) -> FeedbackResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                username,
                password,
                email,
                first_name,
                last_name,
                created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn delete_user_cascade(&self, user_name: &UserName) -> FeedbackResult<bool> {
        let mut tx = self.pool.begin().await?;

        let feedback_deleted = sqlx::query("DELETE FROM feedback WHERE username = $1")
            .bind(user_name.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let sessions_deleted = sqlx::query("DELETE FROM user_sessions WHERE username = $1")
            .bind(user_name.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let users_deleted = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(user_name.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if users_deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        tracing::debug!(
            user_name = %user_name,
            feedback_deleted,
            sessions_deleted,
            "User rows deleted"
        );
        Ok(true)
    }
}

// ============================================================================
// Feedback Repository Implementation
// ============================================================================

impl FeedbackRepository for PgBoardRepository {
    async fn create_feedback(&self, feedback: &NewFeedback) -> FeedbackResult<Feedback> {
        let row = sqlx::query_as::<_, FeedbackRow>(
            r#"
            INSERT INTO feedback (title, content, username)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, username, created_at, updated_at
            "#,
        )
        .bind(feedback.title.as_str())
        .bind(feedback.content.as_str())
        .bind(feedback.user_name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                FeedbackError::UserNotFound
            }
            other => FeedbackError::Database(other),
        })?;

        Ok(row.into_feedback())
    }

    async fn find_feedback(&self, feedback_id: FeedbackId) -> FeedbackResult<Option<Feedback>> {
        let row = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT id, title, content, username, created_at, updated_at
            FROM feedback
            WHERE id = $1
            "#,
        )
        .bind(feedback_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FeedbackRow::into_feedback))
    }

    async fn update_feedback(
        &self,
        feedback_id: FeedbackId,
        title: &FeedbackTitle,
        content: &FeedbackContent,
    ) -> FeedbackResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE feedback
            SET title = $2, content = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(feedback_id.value())
        .bind(title.as_str())
        .bind(content.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_feedback(&self, feedback_id: FeedbackId) -> FeedbackResult<bool> {
        let deleted = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(feedback_id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_feedback_by_user(&self, user_name: &UserName) -> FeedbackResult<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT id, title, content, username, created_at, updated_at
            FROM feedback
            WHERE username = $1
            ORDER BY id
            "#,
        )
        .bind(user_name.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedbackRow::into_feedback).collect())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgBoardRepository {
    async fn create_session(&self, session: &UserSession) -> FeedbackResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (session_id, username, expires_at_ms, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.user_name.as_str())
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: SessionId) -> FeedbackResult<Option<UserSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, username, expires_at_ms, created_at
            FROM user_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete_session(&self, session_id: SessionId) -> FeedbackResult<()> {
        sqlx::query("DELETE FROM user_sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired_sessions(&self) -> FeedbackResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM user_sessions WHERE expires_at_ms <= $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    username: String,
    password: String,
    email: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> FeedbackResult<User> {
        Ok(User {
            user_name: UserName::from_db(self.username),
            password_hash: UserPassword::from_phc_string(self.password)?,
            email: Email::from_db(self.email),
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: i64,
    title: String,
    content: String,
    username: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FeedbackRow {
    fn into_feedback(self) -> Feedback {
        Feedback {
            feedback_id: FeedbackId::new(self.id),
            title: FeedbackTitle::from_db(self.title),
            content: FeedbackContent::from_db(self.content),
            user_name: UserName::from_db(self.username),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    username: String,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> UserSession {
        UserSession {
            session_id: SessionId::from_uuid(self.session_id),
            user_name: UserName::from_db(self.username),
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        }
    }
}
