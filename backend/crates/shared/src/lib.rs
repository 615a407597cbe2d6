//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by every crate:
//! - Common error types and result aliases
//! - Typed identifier wrappers
//!
//! Only things that are hard to change and mean the same thing everywhere
//! belong here.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;
