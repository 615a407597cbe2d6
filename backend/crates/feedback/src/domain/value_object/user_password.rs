//! User Password Value Object
//!
//! Domain wrappers over `platform::password`. Only the Argon2id PHC string
//! is ever stored.
//!
//! ```rust
//! use feedback::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! let raw = RawPassword::new("pw1".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordPolicyError, verify_against_dummy,
};
use std::fmt;

/// Password as typed by the user, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("This field is required.")
            }
            PasswordPolicyError::TooLong { max, .. } => {
                AppError::bad_request(format!("Password must be at most {} characters", max))
            }
            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// Burn one verification's worth of work for an unknown account
    pub fn verify_dummy(&self, pepper: Option<&[u8]>) {
        verify_against_dummy(&self.0, pepper);
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored password hash
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        raw.0
            .hash(pepper)
            .map(Self)
            .map_err(|e| AppError::internal("Failed to hash password").with_source(e))
    }

    pub fn from_phc_string(phc: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AppError::internal("Stored password hash is malformed").with_source(e))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_empty_password_is_required() {
        let err = RawPassword::new("  ".to_string()).unwrap_err();
        assert_eq!(err.message(), "This field is required.");
    }

    #[test]
    fn test_hash_verify_and_restore() {
        let raw = RawPassword::new("pw1".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert_ne!(hashed.as_phc_string(), "pw1");

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, None));
        assert!(!restored.verify(&RawPassword::new("pw2".to_string()).unwrap(), None));
    }

    #[test]
    fn test_malformed_phc_is_internal_error() {
        let err = UserPassword::from_phc_string("plaintext").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }
}
