//! Feedback Board Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Registration, sessions, authorization, feedback use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, server-rendered views, router
//!
//! ## Features
//! - Account registration and username + password login
//! - Server-side sessions behind a signed cookie
//! - Short feedback notes that only their author may edit or delete
//! - Account deletion that removes the user's feedback and sessions with it
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Failed logins do not reveal whether the user name exists
//! - Every mutation is checked against the session identity

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::BoardConfig;
pub use error::{FeedbackError, FeedbackResult};
pub use infra::{memory::InMemoryBoardRepository, postgres::PgBoardRepository};
pub use presentation::router::{board_router, board_router_generic};
