pub mod feedback;
pub mod session;
pub mod user;
