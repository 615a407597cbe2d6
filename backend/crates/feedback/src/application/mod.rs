//! Application Layer
//!
//! Use cases over the repository traits.

pub mod accounts;
pub mod authenticator;
pub mod authorizer;
pub mod config;
pub mod feedback_service;
pub mod session_manager;
