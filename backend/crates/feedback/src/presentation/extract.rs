//! Identity Extractors
//!
//! Resolve the session cookie into an [`Identity`] for handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use platform::cookie::extract_cookie;

use crate::application::session_manager::{Identity, SessionManager};
use crate::domain::repository::BoardRepository;
use crate::error::FeedbackError;
use crate::presentation::handlers::BoardAppState;

/// Identity if logged in, `None` otherwise
pub struct MaybeIdentity(pub Option<Identity>);

impl<R> FromRequestParts<BoardAppState<R>> for MaybeIdentity
where
    R: BoardRepository,
{
    type Rejection = FeedbackError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &BoardAppState<R>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_cookie(&parts.headers, &state.config.session_cookie_name);
        let sessions = SessionManager::new(state.repo.clone(), state.config.clone());
        Ok(Self(sessions.current_identity(token.as_deref()).await?))
    }
}

/// Identity of a logged-in user; rejects with `Unauthenticated`
pub struct RequireIdentity(pub Identity);

impl<R> FromRequestParts<BoardAppState<R>> for RequireIdentity
where
    R: BoardRepository,
{
    type Rejection = FeedbackError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &BoardAppState<R>,
    ) -> Result<Self, Self::Rejection> {
        let MaybeIdentity(identity) = MaybeIdentity::from_request_parts(parts, state).await?;
        identity.map(Self).ok_or(FeedbackError::Unauthenticated)
    }
}
