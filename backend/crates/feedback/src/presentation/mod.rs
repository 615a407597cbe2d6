//! Presentation Layer
//!
//! HTTP handlers, server-rendered views and routing.

pub mod dto;
pub mod extract;
pub mod flash;
pub mod handlers;
pub mod router;
pub mod views;
