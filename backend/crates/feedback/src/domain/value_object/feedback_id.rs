//! Feedback ID Value Object
//!
//! Store-assigned, positive, never reused.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedbackId(i64);

impl FeedbackId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse a path segment; anything but a positive integer is `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.parse::<i64>() {
            Ok(value) if value > 0 => Some(Self(value)),
            _ => None,
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(FeedbackId::parse("42"), Some(FeedbackId::new(42)));
        assert_eq!(FeedbackId::parse("0"), None);
        assert_eq!(FeedbackId::parse("-3"), None);
        assert_eq!(FeedbackId::parse("abc"), None);
        assert_eq!(FeedbackId::parse(""), None);
    }
}
