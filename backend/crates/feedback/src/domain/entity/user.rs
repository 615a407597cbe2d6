//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_name::UserName, user_password::UserPassword,
};

/// Registered account
///
/// Immutable after registration; the only lifecycle transition is deletion.
#[derive(Debug, Clone)]
pub struct User {
    pub user_name: UserName,
    pub password_hash: UserPassword,
    pub email: Email,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_name: UserName,
        password_hash: UserPassword,
        email: Email,
        first_name: PersonName,
        last_name: PersonName,
    ) -> Self {
        Self {
            user_name,
            password_hash,
            email,
            first_name,
            last_name,
            created_at: Utc::now(),
        }
    }
}
