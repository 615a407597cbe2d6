//! Infrastructure Layer
//!
//! Repository implementations.

pub mod memory;
pub mod postgres;
