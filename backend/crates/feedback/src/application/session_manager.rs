//! Session Manager
//!
//! Binds a logged-in user to a browser. The cookie carries
//! `session_id.hmac`; the server-side row carries the user and expiry, so
//! logout and account deletion take effect immediately.

use std::fmt;
use std::sync::Arc;

use kernel::id::SessionId;
use platform::crypto::{sign_token, verify_token};

use crate::application::config::BoardConfig;
use crate::domain::entity::session::UserSession;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::FeedbackResult;

/// The user name of the logged-in user for the current request
///
/// Only obtainable from a verified session (or in-crate tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(UserName);

impl Identity {
    pub(crate) fn new(user_name: UserName) -> Self {
        Self(user_name)
    }

    pub fn user_name(&self) -> &UserName {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A freshly issued session
pub struct IssuedSession {
    /// Signed value for the session cookie
    pub token: String,
    pub identity: Identity,
}

pub struct SessionManager<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<BoardConfig>,
}

impl<S> SessionManager<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<BoardConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Start a session for `user_name`
    ///
    /// Always a new session id, so a pre-login token can never be promoted.
    pub async fn set_identity(&self, user_name: &UserName) -> FeedbackResult<IssuedSession> {
        let purged = self.session_repo.cleanup_expired_sessions().await?;
        if purged > 0 {
            tracing::debug!(count = purged, "Expired sessions purged");
        }

        let session = UserSession::new(user_name.clone(), self.config.session_ttl_ms());
        self.session_repo.create_session(&session).await?;

        tracing::info!(user_name = %user_name, "Session started");

        Ok(IssuedSession {
            token: sign_token(&self.config.session_secret, &session.session_id.to_string()),
            identity: Identity::new(session.user_name),
        })
    }

    /// Start a session for `user_name`, ending the one behind `previous`
    ///
    /// Used when the browser may already hold a session cookie, so that a
    /// later logout cannot leave an older session alive.
    pub async fn replace_identity(
        &self,
        previous: Option<&str>,
        user_name: &UserName,
    ) -> FeedbackResult<IssuedSession> {
        self.clear_identity(previous).await?;
        self.set_identity(user_name).await
    }

    /// Resolve the cookie value to an identity
    ///
    /// Missing, forged, unknown and expired tokens all yield `None`.
    /// Expired rows are deleted on sight.
    pub async fn current_identity(&self, token: Option<&str>) -> FeedbackResult<Option<Identity>> {
        let Some(session_id) = token.and_then(|t| self.parse_session_token(t)) else {
            return Ok(None);
        };

        let Some(session) = self.session_repo.find_session(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            self.session_repo.delete_session(session_id).await?;
            tracing::debug!(session_id = %session_id, "Expired session removed");
            return Ok(None);
        }

        Ok(Some(Identity::new(session.user_name)))
    }

    /// End the session behind `token`, if any
    pub async fn clear_identity(&self, token: Option<&str>) -> FeedbackResult<()> {
        if let Some(session_id) = token.and_then(|t| self.parse_session_token(t)) {
            self.session_repo.delete_session(session_id).await?;
            tracing::info!(session_id = %session_id, "Session ended");
        }
        Ok(())
    }

    fn parse_session_token(&self, token: &str) -> Option<SessionId> {
        verify_token(&self.config.session_secret, token)?.parse().ok()
    }
}
