//! User Session Entity
//!
//! Server-side record behind the signed session cookie.

use chrono::{DateTime, Utc};
use kernel::id::SessionId;

use crate::domain::value_object::user_name::UserName;

#[derive(Debug, Clone)]
pub struct UserSession {
    pub session_id: SessionId,
    pub user_name: UserName,
    /// Absolute expiry (Unix ms)
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_name: UserName, ttl_ms: i64) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            user_name,
            expires_at_ms: now.timestamp_millis() + ttl_ms,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() >= self.expires_at_ms
    }
}
