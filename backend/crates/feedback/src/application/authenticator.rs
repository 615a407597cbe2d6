//! Authenticator
//!
//! Registration and credential checks. Passwords are hashed with Argon2id
//! via `platform::password`; the clear text never leaves this module.

use std::sync::Arc;

use crate::application::config::BoardConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{FeedbackError, FeedbackResult, FieldErrors};

/// Registration input, straight from the form
pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct Authenticator<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<BoardConfig>,
}

impl<U> Authenticator<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<BoardConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Create an account
    ///
    /// Every field is validated before anything is written, and all field
    /// errors are reported together. Uniqueness is enforced by the store.
    pub async fn register(&self, input: RegisterInput) -> FeedbackResult<User> {
        let mut errors = FieldErrors::new();
        let user_name = errors.check("username", UserName::new(&input.user_name));
        let password = errors.check("password", RawPassword::new(input.password));
        let email = errors.check("email", Email::new(&input.email));
        let first_name = errors.check("first_name", PersonName::new(&input.first_name));
        let last_name = errors.check("last_name", PersonName::new(&input.last_name));

        let (Some(user_name), Some(password), Some(email), Some(first_name), Some(last_name)) =
            (user_name, password, email, first_name, last_name)
        else {
            return Err(FeedbackError::Validation(errors));
        };

        let password_hash = UserPassword::from_raw(&password, self.config.pepper())?;
        let user = User::new(user_name, password_hash, email, first_name, last_name);

        self.user_repo.create_user(&user).await?;

        tracing::info!(user_name = %user.user_name, "User registered");
        Ok(user)
    }

    /// Check credentials
    ///
    /// `None` for an unknown user, a wrong password, or input that could
    /// never match. The caller cannot tell these apart.
    pub async fn authenticate(
        &self,
        user_name: &str,
        password: String,
    ) -> FeedbackResult<Option<User>> {
        let (Ok(user_name), Ok(password)) = (UserName::new(user_name), RawPassword::new(password))
        else {
            return Ok(None);
        };

        match self.user_repo.find_user(&user_name).await? {
            Some(user) if user.password_hash.verify(&password, self.config.pepper()) => {
                tracing::info!(user_name = %user.user_name, "User authenticated");
                Ok(Some(user))
            }
            Some(_) => {
                tracing::warn!(user_name = %user_name, "Invalid login attempt");
                Ok(None)
            }
            None => {
                password.verify_dummy(self.config.pepper());
                tracing::warn!(user_name = %user_name, "Login attempt for unknown user");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryBoardRepository;

    fn authenticator() -> Authenticator<InMemoryBoardRepository> {
        Authenticator::new(
            Arc::new(InMemoryBoardRepository::new()),
            Arc::new(BoardConfig::development()),
        )
    }

    fn input(user_name: &str, password: &str) -> RegisterInput {
        RegisterInput {
            user_name: user_name.to_string(),
            password: password.to_string(),
            email: "a@x.io".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let auth = authenticator();
        let user = auth.register(input("alice", "pw1")).await.unwrap();
        assert_eq!(user.user_name, "alice");
        assert_ne!(user.password_hash.as_phc_string(), "pw1");

        let found = auth.authenticate("alice", "pw1".to_string()).await.unwrap();
        assert_eq!(found.map(|u| u.user_name), Some(user.user_name));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let auth = authenticator();
        auth.register(input("alice", "pw1")).await.unwrap();

        assert!(auth.authenticate("alice", "nope".to_string()).await.unwrap().is_none());
        assert!(auth.authenticate("zed", "pw1".to_string()).await.unwrap().is_none());
        assert!(auth.authenticate("", "".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_name_is_case_sensitive() {
        let auth = authenticator();
        auth.register(input("alice", "pw1")).await.unwrap();
        assert!(auth.authenticate("Alice", "pw1".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_name() {
        let auth = authenticator();
        auth.register(input("alice", "pw1")).await.unwrap();

        let err = auth.register(input("alice", "pw2")).await.unwrap_err();
        assert!(matches!(err, FeedbackError::DuplicateUsername));

        // The original password still works
        assert!(auth.authenticate("alice", "pw1".to_string()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_all_field_errors_are_reported() {
        let auth = authenticator();
        let err = auth
            .register(RegisterInput {
                user_name: String::new(),
                password: String::new(),
                email: "nope".to_string(),
                first_name: "x".repeat(31),
                last_name: "L".to_string(),
            })
            .await
            .unwrap_err();

        let FeedbackError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.get("username").is_some());
        assert!(errors.get("password").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("first_name").is_some());
        assert!(errors.get("last_name").is_none());
    }
}
