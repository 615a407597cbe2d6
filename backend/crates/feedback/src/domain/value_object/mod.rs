pub mod email;
pub mod feedback_id;
pub mod feedback_text;
pub mod person_name;
pub mod user_name;
pub mod user_password;
